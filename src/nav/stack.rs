//! Navigator-of-navigators.
//!
//! Whichever navigator sits on top receives input. A navigator that delegates
//! closes itself and is replaced by its target; a navigator opened by the host
//! over another one covers it until it closes, then the one below speaks again.

use crate::core::input_result::InputResult;
use crate::core::menu_actions::NavCommand;

/// Type-erased navigator, so domains with different entry types can share a stack
pub trait ActiveNavigator {
    fn name(&self) -> &str;
    fn open(&mut self) -> InputResult;
    fn handle(&mut self, command: NavCommand) -> InputResult;
    fn is_open(&self) -> bool;
    fn depth(&self) -> usize;
    fn announce(&self) -> Option<String>;
}

#[derive(Default)]
pub struct NavigatorStack {
    navigators: Vec<Box<dyn ActiveNavigator>>,
}

impl NavigatorStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Is any navigator taking input?
    pub fn is_active(&self) -> bool {
        !self.navigators.is_empty()
    }

    pub fn len(&self) -> usize {
        self.navigators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.navigators.is_empty()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.navigators.last().map(|n| n.name())
    }

    /// Open `navigator` on top. It is only kept if it actually opened.
    pub fn open(&mut self, mut navigator: Box<dyn ActiveNavigator>) -> InputResult {
        let mut result = navigator.open();
        // Opening never hands off; drop anything a misbehaving domain returned
        result.handoff = None;
        if navigator.is_open() {
            tracing::debug!("Navigator stack: push {}", navigator.name());
            self.navigators.push(navigator);
        }
        result.closed = !self.is_active();
        result
    }

    /// Route one command to the top navigator
    pub fn handle(&mut self, command: NavCommand) -> InputResult {
        let Some(top) = self.navigators.last_mut() else {
            return InputResult::ignored();
        };

        let mut result = top.handle(command);
        let top_open = top.is_open();

        if !top_open {
            if let Some(closed) = self.navigators.pop() {
                tracing::debug!("Navigator stack: pop {}", closed.name());
            }
        }

        if let Some(target) = result.handoff.take() {
            let opened = self.open(target);
            result.announcement = join(result.announcement.take(), opened.announcement);
            result.cue = opened.cue.or(result.cue);
        } else if !top_open {
            // Resume whatever was underneath
            if let Some(parent) = self.navigators.last() {
                result.announcement = join(result.announcement.take(), parent.announce());
            }
        }

        result.closed = !self.is_active();
        result
    }

    pub fn close_all(&mut self) {
        for mut navigator in self.navigators.drain(..).rev() {
            navigator.handle(NavCommand::Close);
        }
    }
}

fn join(first: Option<String>, second: Option<String>) -> Option<String> {
    match (first, second) {
        (Some(a), Some(b)) => Some(format!("{} {}", a, b)),
        (a, b) => a.or(b),
    }
}
