//! Scan results as a menu: categories, subcategories, items, group members.
//!
//! Selecting a single item (or one member of a group) moves the host's cursor
//! there and closes the menu.

use crate::format;
use crate::nav::{LeafOutcome, MenuDomain};
use crate::scan::{ScanResult, ScanTarget};
use crate::world::GridPos;
use anyhow::{Context, Result};

/// Host cursor the user is exploring with
pub trait CursorControl {
    fn jump_to(&mut self, pos: GridPos) -> Result<()>;
}

/// Indices into the scan tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEntry {
    Category(usize),
    Subcategory(usize, usize),
    Item(usize, usize, usize),
    Member(usize, usize, usize, usize),
}

pub struct ScanMenu {
    result: ScanResult,
    cursor: Box<dyn CursorControl>,
}

impl ScanMenu {
    pub fn new(result: ScanResult, cursor: Box<dyn CursorControl>) -> Self {
        Self { result, cursor }
    }

    fn target(&self, entry: ScanEntry) -> Option<(String, ScanTarget)> {
        match entry {
            ScanEntry::Item(c, s, i) => {
                let item = self.result.categories.get(c)?.subcategories.get(s)?.items.get(i)?;
                Some((item.label().to_string(), *item.representative()))
            }
            ScanEntry::Member(c, s, i, m) => {
                let item = self.result.categories.get(c)?.subcategories.get(s)?.items.get(i)?;
                Some((item.label().to_string(), *item.members().get(m)?))
            }
            _ => None,
        }
    }
}

impl MenuDomain for ScanMenu {
    type Entry = ScanEntry;

    fn name(&self) -> &str {
        "Scanner"
    }

    fn build(&mut self, path: &[ScanEntry]) -> Result<Vec<ScanEntry>> {
        let categories = &self.result.categories;
        let entries = match path.last() {
            None => (0..categories.len()).map(ScanEntry::Category).collect(),
            Some(&ScanEntry::Category(c)) => {
                let node = categories.get(c).context("Category no longer exists")?;
                (0..node.subcategories.len())
                    .map(|s| ScanEntry::Subcategory(c, s))
                    .collect()
            }
            Some(&ScanEntry::Subcategory(c, s)) => {
                let node = categories
                    .get(c)
                    .and_then(|n| n.subcategories.get(s))
                    .context("Subcategory no longer exists")?;
                (0..node.items.len()).map(|i| ScanEntry::Item(c, s, i)).collect()
            }
            Some(&ScanEntry::Item(c, s, i)) => {
                let item = categories
                    .get(c)
                    .and_then(|n| n.subcategories.get(s))
                    .and_then(|n| n.items.get(i))
                    .context("Item no longer exists")?;
                (0..item.count()).map(|m| ScanEntry::Member(c, s, i, m)).collect()
            }
            Some(ScanEntry::Member(..)) => Vec::new(),
        };
        Ok(entries)
    }

    fn label(&self, entry: &ScanEntry) -> String {
        let categories = &self.result.categories;
        let text = match *entry {
            ScanEntry::Category(c) => categories.get(c).map(format::category),
            ScanEntry::Subcategory(c, s) => categories
                .get(c)
                .and_then(|n| n.subcategories.get(s))
                .map(format::subcategory),
            ScanEntry::Item(c, s, i) => categories
                .get(c)
                .and_then(|n| n.subcategories.get(s))
                .and_then(|n| n.items.get(i))
                .map(format::scan_item),
            ScanEntry::Member(..) => self.target(*entry).map(|(label, target)| {
                let direction = self.result.reference.direction_to(target.pos);
                format!(
                    "{}, {}",
                    label,
                    format::distance_and_direction(target.distance, direction)
                )
            }),
        };
        text.unwrap_or_else(|| "Unknown".to_string())
    }

    fn has_children(&self, entry: &ScanEntry) -> bool {
        match *entry {
            ScanEntry::Category(_) | ScanEntry::Subcategory(..) => true,
            ScanEntry::Item(c, s, i) => self
                .result
                .categories
                .get(c)
                .and_then(|n| n.subcategories.get(s))
                .and_then(|n| n.items.get(i))
                .is_some_and(|item| item.is_group()),
            ScanEntry::Member(..) => false,
        }
    }

    fn activate(&mut self, path: &[ScanEntry]) -> Result<LeafOutcome> {
        let entry = *path.last().context("Nothing selected")?;
        let (label, target) = self.target(entry).context("That is no longer there")?;
        self.cursor.jump_to(target.pos)?;
        tracing::debug!("Scanner jumped to {} at {}", label, target.pos);
        Ok(LeafOutcome::close(format!("{}, {}.", label, target.pos)))
    }
}
