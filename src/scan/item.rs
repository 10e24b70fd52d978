//! Scanner output entries.

use crate::world::{Direction, EntityId, GridPos, Quality};

/// One physical thing (or cell) behind a [`ScanItem`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanTarget {
    /// `None` for terrain cells
    pub entity: Option<EntityId>,
    pub pos: GridPos,
    pub distance: f32,
}

/// What makes two candidates interchangeable for grouping
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EquivalenceKey {
    /// Never grouped (pawns)
    Unique,
    /// Same definition, material and quality tier
    Thing {
        def_name: String,
        stuff: Option<String>,
        quality: Option<Quality>,
    },
    /// Terrain and mineable cells group by label alone
    Cell { label: String },
}

impl EquivalenceKey {
    pub fn is_equivalent(&self, other: &EquivalenceKey) -> bool {
        !matches!(self, EquivalenceKey::Unique) && self == other
    }
}

/// Classified entity or cell waiting to be grouped
#[derive(Debug, Clone)]
pub struct Candidate {
    pub target: ScanTarget,
    pub label: String,
    pub key: EquivalenceKey,
    pub terrain: bool,
}

/// A single entity/cell, or a bulk group of equivalent ones.
///
/// Members are kept sorted by distance; the first member is the
/// representative whose position and label the item reports.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanItem {
    label: String,
    members: Vec<ScanTarget>,
    direction: Direction,
    terrain: bool,
    key: EquivalenceKey,
}

impl ScanItem {
    pub(crate) fn new(
        reference: GridPos,
        label: String,
        mut members: Vec<ScanTarget>,
        terrain: bool,
        key: EquivalenceKey,
    ) -> Self {
        debug_assert!(!members.is_empty(), "scan item without members");
        members.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        let direction = reference.direction_to(members[0].pos);
        Self {
            label,
            members,
            direction,
            terrain,
            key,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Closest member
    pub fn representative(&self) -> &ScanTarget {
        &self.members[0]
    }

    pub fn pos(&self) -> GridPos {
        self.representative().pos
    }

    pub fn distance(&self) -> f32 {
        self.representative().distance
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_terrain(&self) -> bool {
        self.terrain
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn is_group(&self) -> bool {
        self.members.len() >= 2
    }

    pub fn members(&self) -> &[ScanTarget] {
        &self.members
    }

    pub fn key(&self) -> &EquivalenceKey {
        &self.key
    }
}
