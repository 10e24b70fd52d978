//! What a navigator hands back after every command.
//!
//! The router stays agnostic of which menu is open; it just speaks the
//! announcement, plays the cue, and honours a handoff to another navigator.

use crate::nav::ActiveNavigator;
use std::fmt;

/// Non-text feedback the host may render as a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Selection moved
    Move,
    /// Something was opened or executed
    Click,
    /// Nothing to show, empty list, or a failed action
    Reject,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Move => "move",
            Cue::Click => "click",
            Cue::Reject => "reject",
        }
    }
}

/// Result of handling one command
#[derive(Default)]
pub struct InputResult {
    /// Text for the screen reader, if anything changed
    pub announcement: Option<String>,
    pub cue: Option<Cue>,
    /// The navigator has no levels left
    pub closed: bool,
    /// Another navigator takes over input
    pub handoff: Option<Box<dyn ActiveNavigator>>,
}

impl InputResult {
    /// Nothing happened
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn announce(text: impl Into<String>, cue: Cue) -> Self {
        Self {
            announcement: Some(text.into()),
            cue: Some(cue),
            ..Self::default()
        }
    }

    /// User-facing refusal: empty list, failed action
    pub fn reject(text: impl Into<String>) -> Self {
        Self::announce(text, Cue::Reject)
    }

    /// Navigator closed, optionally with a last word
    pub fn closed(text: Option<String>) -> Self {
        Self {
            announcement: text,
            cue: Some(Cue::Click),
            closed: true,
            handoff: None,
        }
    }

    pub fn handoff(target: Box<dyn ActiveNavigator>) -> Self {
        Self {
            closed: true,
            handoff: Some(target),
            ..Self::default()
        }
    }

    /// Put `text` in front of the announcement ("Dropped rifle. Rifle, 1 of 3")
    pub fn with_prefix(mut self, text: Option<String>) -> Self {
        if let Some(prefix) = text {
            self.announcement = Some(match self.announcement.take() {
                Some(rest) => format!("{} {}", prefix, rest),
                None => prefix,
            });
        }
        self
    }

    pub fn is_closing(&self) -> bool {
        self.closed
    }

    pub fn is_transition(&self) -> bool {
        self.handoff.is_some()
    }
}

impl fmt::Debug for InputResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputResult")
            .field("announcement", &self.announcement)
            .field("cue", &self.cue)
            .field("closed", &self.closed)
            .field("handoff", &self.handoff.as_ref().map(|n| n.name().to_string()))
            .finish()
    }
}
