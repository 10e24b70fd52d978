//! Input layer shared by every menu
//!
//! Commands, what navigators hand back, and the router connecting key
//! presses to the active navigator. No terminal or rendering code here.

pub mod input_result;
pub mod input_router;
pub mod menu_actions;

pub use input_result::{Cue, InputResult};
pub use input_router::{Feedback, InputRouter};
pub use menu_actions::NavCommand;
