//! Auto-slaughter limits per animal kind.
//!
//! Each kind opens a list of limit columns. Left/Right change a limit;
//! Enter switches it between unlimited and the current head count.

use crate::nav::{LeafOutcome, MenuDomain};
use anyhow::Result;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitColumn {
    Total,
    AdultMales,
    AdultFemales,
    YoungMales,
    YoungFemales,
}

impl LimitColumn {
    pub const ALL: [LimitColumn; 5] = [
        LimitColumn::Total,
        LimitColumn::AdultMales,
        LimitColumn::AdultFemales,
        LimitColumn::YoungMales,
        LimitColumn::YoungFemales,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Total => "Max total",
            Self::AdultMales => "Max adult males",
            Self::AdultFemales => "Max adult females",
            Self::YoungMales => "Max young males",
            Self::YoungFemales => "Max young females",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimalKind {
    pub def_name: String,
    pub label: String,
    /// Animals of this kind the colony owns
    pub count: u32,
}

/// Host-side auto-slaughter table. `None` limits mean unlimited.
pub trait SlaughterTable {
    fn kinds(&self) -> Result<Vec<AnimalKind>>;
    fn count(&self, kind: &str, column: LimitColumn) -> Result<u32>;
    fn limit(&self, kind: &str, column: LimitColumn) -> Result<Option<u32>>;
    fn set_limit(&self, kind: &str, column: LimitColumn, value: Option<u32>) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlaughterEntry {
    Kind(AnimalKind),
    Limit { kind: String, column: LimitColumn },
}

pub struct SlaughterMenu {
    table: Rc<dyn SlaughterTable>,
}

impl SlaughterMenu {
    pub fn new(table: Rc<dyn SlaughterTable>) -> Self {
        Self { table }
    }

    fn limit_label(&self, kind: &str, column: LimitColumn) -> String {
        let value = match self.table.limit(kind, column) {
            Ok(Some(value)) => value.to_string(),
            Ok(None) => "unlimited".to_string(),
            Err(e) => {
                tracing::warn!("Auto-slaughter: could not read {} {:?}: {:#}", kind, column, e);
                "unknown".to_string()
            }
        };
        match self.table.count(kind, column) {
            Ok(count) => format!("{}: {}, currently {}", column.display_name(), value, count),
            Err(_) => format!("{}: {}", column.display_name(), value),
        }
    }
}

/// Apply `delta` to a limit. Unlimited starts from the current head count.
pub fn adjusted_limit(current: Option<u32>, count: u32, delta: i32) -> u32 {
    let base = i64::from(current.unwrap_or(count));
    (base + i64::from(delta)).clamp(0, i64::from(u32::MAX)) as u32
}

impl MenuDomain for SlaughterMenu {
    type Entry = SlaughterEntry;

    fn name(&self) -> &str {
        "Auto-slaughter"
    }

    fn build(&mut self, path: &[SlaughterEntry]) -> Result<Vec<SlaughterEntry>> {
        Ok(match path {
            [] => self
                .table
                .kinds()?
                .into_iter()
                .map(SlaughterEntry::Kind)
                .collect(),
            [SlaughterEntry::Kind(kind)] => LimitColumn::ALL
                .iter()
                .map(|column| SlaughterEntry::Limit {
                    kind: kind.def_name.clone(),
                    column: *column,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    fn label(&self, entry: &SlaughterEntry) -> String {
        match entry {
            SlaughterEntry::Kind(kind) if kind.count == 1 => format!("{}, 1 animal", kind.label),
            SlaughterEntry::Kind(kind) => format!("{}, {} animals", kind.label, kind.count),
            SlaughterEntry::Limit { kind, column } => self.limit_label(kind, *column),
        }
    }

    fn has_children(&self, entry: &SlaughterEntry) -> bool {
        matches!(entry, SlaughterEntry::Kind(_))
    }

    fn is_adjustable(&self, entry: &SlaughterEntry) -> bool {
        matches!(entry, SlaughterEntry::Limit { .. })
    }

    fn adjust(&mut self, path: &[SlaughterEntry], delta: i32) -> Result<LeafOutcome> {
        let Some(SlaughterEntry::Limit { kind, column }) = path.last() else {
            anyhow::bail!(crate::nav::engine::NOT_ADJUSTABLE);
        };
        let current = self.table.limit(kind, *column)?;
        let count = self.table.count(kind, *column)?;
        let value = adjusted_limit(current, count, delta);
        self.table.set_limit(kind, *column, Some(value))?;
        tracing::debug!("Auto-slaughter {} {:?} -> {}", kind, column, value);
        Ok(LeafOutcome::Stay { message: None })
    }

    fn activate(&mut self, path: &[SlaughterEntry]) -> Result<LeafOutcome> {
        let Some(SlaughterEntry::Limit { kind, column }) = path.last() else {
            return Ok(LeafOutcome::Stay { message: None });
        };
        let next = match self.table.limit(kind, *column)? {
            Some(_) => None,
            None => Some(self.table.count(kind, *column)?),
        };
        self.table.set_limit(kind, *column, next)?;
        Ok(LeafOutcome::Stay { message: None })
    }
}
