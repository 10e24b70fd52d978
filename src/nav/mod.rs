//! Hierarchical menu navigation: the generic engine, the announcer, and the
//! stack that lets one navigator hand input to another.

pub mod announcer;
pub mod engine;
pub mod stack;

pub use announcer::{Hints, LevelKind};
pub use engine::{LeafOutcome, MenuDomain, Navigator};
pub use stack::{ActiveNavigator, NavigatorStack};
