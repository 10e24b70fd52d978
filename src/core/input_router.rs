//! Input routing for accessible menus
//!
//! Routes keyboard input to the navigator on top of the stack:
//! - Configured keybinds turn a `KeyEvent` into a `NavCommand`
//! - The navigator's `InputResult` goes to the feedback sink (speech, cues)
//! - Keys are only consumed while a navigator is open

use crate::config::NavKeybinds;
use crate::core::input_result::{Cue, InputResult};
use crate::core::menu_actions::NavCommand;
use crate::nav::{ActiveNavigator, Hints, NavigatorStack};
use crossterm::event::{KeyEvent, KeyEventKind};

/// Where announcements and cues end up
pub trait Feedback {
    fn announce(&mut self, text: &str);
    fn cue(&mut self, cue: Cue);
}

pub struct InputRouter<F: Feedback> {
    stack: NavigatorStack,
    keybinds: NavKeybinds,
    feedback: F,
}

impl<F: Feedback> InputRouter<F> {
    pub fn new(keybinds: NavKeybinds, feedback: F) -> Self {
        Self {
            stack: NavigatorStack::new(),
            keybinds,
            feedback,
        }
    }

    /// Hints for navigators created against this router's keys
    pub fn hints(&self) -> Hints {
        self.keybinds.hints()
    }

    pub fn is_active(&self) -> bool {
        self.stack.is_active()
    }

    pub fn stack(&self) -> &NavigatorStack {
        &self.stack
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    /// Open a navigator over whatever is active. Returns whether it opened.
    pub fn open(&mut self, navigator: Box<dyn ActiveNavigator>) -> bool {
        let result = self.stack.open(navigator);
        if let Some(name) = self.stack.active_name() {
            tracing::debug!("Active menu: {}", name);
        }
        self.emit(&result);
        !result.closed
    }

    /// Route a key press. Returns true if a navigator consumed it.
    pub fn route_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release || !self.stack.is_active() {
            return false;
        }
        match self.keybinds.resolve(key) {
            Some(command) => {
                self.send(command);
                true
            }
            None => false,
        }
    }

    /// Feed one command to the active navigator
    pub fn send(&mut self, command: NavCommand) {
        let result = self.stack.handle(command);
        self.emit(&result);
        if result.closed {
            tracing::debug!("All navigators closed");
        }
    }

    pub fn close_all(&mut self) {
        self.stack.close_all();
    }

    fn emit(&mut self, result: &InputResult) {
        if let Some(cue) = result.cue {
            self.feedback.cue(cue);
        }
        if let Some(text) = result.announcement.as_deref() {
            self.feedback.announce(text);
        }
    }
}
