//! Gear management: a pawn's equipment, apparel and inventory, and what can
//! be done with each item.

use crate::nav::{LeafOutcome, LevelKind, MenuDomain};
use crate::world::EntityId;
use anyhow::{Context, Result};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GearSlot {
    Equipment,
    Apparel,
    Inventory,
}

impl GearSlot {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Equipment => "equipped",
            Self::Apparel => "worn",
            Self::Inventory => "carried",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GearItem {
    pub id: EntityId,
    pub label: String,
    pub slot: GearSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GearAction {
    Equip,
    Unequip,
    Drop,
    Consume,
    Info,
}

impl GearAction {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Equip => "Equip",
            Self::Unequip => "Put away",
            Self::Drop => "Drop",
            Self::Consume => "Consume",
            Self::Info => "Info",
        }
    }

    /// Removes the item from the pawn's gear list
    pub fn consumes_item(&self) -> bool {
        matches!(self, Self::Drop | Self::Consume)
    }
}

/// Host access to one pawn's gear
pub trait GearSource {
    fn gear(&self, pawn: EntityId) -> Result<Vec<GearItem>>;
    fn actions(&self, pawn: EntityId, item: &GearItem) -> Result<Vec<GearAction>>;
    /// Perform `action`, returning what to tell the user
    fn perform(&self, pawn: EntityId, item: &GearItem, action: GearAction) -> Result<String>;
    fn describe(&self, item: &GearItem) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum GearEntry {
    Item(GearItem),
    Action(GearAction),
    Detail(String),
}

pub struct GearMenu {
    pawn: EntityId,
    source: Rc<dyn GearSource>,
}

impl GearMenu {
    pub fn new(pawn: EntityId, source: Rc<dyn GearSource>) -> Self {
        Self { pawn, source }
    }
}

impl MenuDomain for GearMenu {
    type Entry = GearEntry;

    fn name(&self) -> &str {
        "Gear"
    }

    fn build(&mut self, path: &[GearEntry]) -> Result<Vec<GearEntry>> {
        match path {
            [] => {
                let mut items = self.source.gear(self.pawn)?;
                // Stable: host order within a slot is kept
                items.sort_by_key(|item| item.slot);
                Ok(items.into_iter().map(GearEntry::Item).collect())
            }
            [GearEntry::Item(item)] => Ok(self
                .source
                .actions(self.pawn, item)?
                .into_iter()
                .map(GearEntry::Action)
                .collect()),
            [GearEntry::Item(item), GearEntry::Action(GearAction::Info)] => {
                let text = self.source.describe(item)?;
                Ok(vec![GearEntry::Detail(text)])
            }
            _ => Ok(Vec::new()),
        }
    }

    fn label(&self, entry: &GearEntry) -> String {
        match entry {
            GearEntry::Item(item) => format!("{}, {}", item.label, item.slot.display_name()),
            GearEntry::Action(action) => action.display_name().to_string(),
            GearEntry::Detail(text) => text.clone(),
        }
    }

    fn has_children(&self, entry: &GearEntry) -> bool {
        matches!(
            entry,
            GearEntry::Item(_) | GearEntry::Action(GearAction::Info)
        )
    }

    fn activate(&mut self, path: &[GearEntry]) -> Result<LeafOutcome> {
        let [.., GearEntry::Item(item), GearEntry::Action(action)] = path else {
            return Ok(LeafOutcome::Stay { message: None });
        };
        let message = self
            .source
            .perform(self.pawn, item, *action)
            .with_context(|| format!("Could not {} {}", action.display_name().to_lowercase(), item.label))?;

        tracing::debug!("Gear action {:?} on {}", action, item.label);
        if action.consumes_item() {
            // Back to the item list; the engine clamps the selection
            Ok(LeafOutcome::back(message))
        } else {
            Ok(LeafOutcome::stay(message))
        }
    }

    fn level_kind(&self, path: &[GearEntry]) -> LevelKind {
        match path.last() {
            Some(GearEntry::Action(GearAction::Info)) => LevelKind::Detail,
            _ => LevelKind::List,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::nav::Navigator;
    use std::cell::RefCell;

    /// Gear store shared with the inspection tests
    pub struct FakeGear {
        pub items: RefCell<Vec<GearItem>>,
        pub fail_drop: bool,
    }

    impl FakeGear {
        pub fn new() -> Self {
            let item = |id, label: &str, slot| GearItem {
                id,
                label: label.to_string(),
                slot,
            };
            Self {
                items: RefCell::new(vec![
                    item(1, "parka", GearSlot::Apparel),
                    item(2, "assault rifle", GearSlot::Equipment),
                    item(3, "packaged survival meal", GearSlot::Inventory),
                ]),
                fail_drop: false,
            }
        }
    }

    impl GearSource for FakeGear {
        fn gear(&self, _pawn: EntityId) -> Result<Vec<GearItem>> {
            Ok(self.items.borrow().clone())
        }

        fn actions(&self, _pawn: EntityId, item: &GearItem) -> Result<Vec<GearAction>> {
            Ok(match item.slot {
                GearSlot::Inventory => vec![GearAction::Consume, GearAction::Drop, GearAction::Info],
                _ => vec![GearAction::Drop, GearAction::Info],
            })
        }

        fn perform(&self, _pawn: EntityId, item: &GearItem, action: GearAction) -> Result<String> {
            if self.fail_drop && action == GearAction::Drop {
                anyhow::bail!("pawn is downed");
            }
            if action.consumes_item() {
                self.items.borrow_mut().retain(|i| i.id != item.id);
            }
            Ok(format!("{} {}.", action.display_name(), item.label))
        }

        fn describe(&self, item: &GearItem) -> Result<String> {
            Ok(format!("A {}. Nothing special.", item.label))
        }
    }

    fn nav(source: FakeGear) -> Navigator<GearMenu> {
        let mut nav = Navigator::new(GearMenu::new(7, Rc::new(source)));
        nav.open();
        nav
    }

    #[test]
    fn test_items_sorted_by_slot() {
        let nav = nav(FakeGear::new());
        let labels: Vec<_> = nav.entries().iter().map(|e| nav.domain().label(e)).collect();
        assert_eq!(
            labels,
            vec![
                "assault rifle, equipped",
                "parka, worn",
                "packaged survival meal, carried"
            ]
        );
    }

    #[test]
    fn test_drop_returns_to_item_list() {
        let mut nav = nav(FakeGear::new());
        nav.select_previous(); // meal
        nav.drill_down();
        nav.select_next(); // Drop
        let result = nav.drill_down();

        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.entries().len(), 2);
        assert_eq!(nav.selected_index(), Some(1));
        let text = result.announcement.unwrap();
        assert!(text.starts_with("Drop packaged survival meal. parka, worn."), "{}", text);
    }

    #[test]
    fn test_info_is_detail_view() {
        let mut nav = nav(FakeGear::new());
        nav.drill_down();
        nav.select_next(); // Info
        let text = nav.drill_down().announcement.unwrap();
        assert_eq!(text, "A assault rifle. Nothing special. Escape to go back.");
    }

    #[test]
    fn test_failed_action_keeps_state() {
        let mut source = FakeGear::new();
        source.fail_drop = true;
        let mut nav = nav(source);
        nav.drill_down();
        let result = nav.drill_down(); // Drop
        assert_eq!(nav.depth(), 2);
        assert_eq!(nav.entries().len(), 2);
        assert!(result
            .announcement
            .unwrap()
            .starts_with("Could not drop assault rifle"));
    }
}
