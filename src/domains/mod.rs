//! Concrete menus built on the navigator engine.
//!
//! Each domain talks to the host game through a small collaborator trait, so
//! the menus can be driven by a live game, a snapshot, or a test double.

pub mod character;
pub mod gear;
pub mod inspection;
pub mod scan_menu;
pub mod skills;
pub mod slaughter;
pub mod storage;
pub mod trade;

use std::rc::Rc;

pub use character::{CharacterMenu, CharacterSource};
pub use gear::{GearMenu, GearSource};
pub use inspection::{InspectSource, InspectionMenu};
pub use scan_menu::{CursorControl, ScanMenu};
pub use skills::{SkillSource, SkillsMenu};
pub use slaughter::{SlaughterMenu, SlaughterTable};
pub use storage::{StorageMenu, StorageSettings};
pub use trade::{TradeMenu, TradeSession};

/// Host access needed for the per-pawn menus reachable from inspection
#[derive(Clone)]
pub struct PawnServices {
    pub gear: Rc<dyn GearSource>,
    pub skills: Rc<dyn SkillSource>,
    pub character: Rc<dyn CharacterSource>,
}
