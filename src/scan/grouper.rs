//! Collapses runs of equivalent candidates into bulk items.
//!
//! This is a quadratic consumed-marker pass over one subcategory. Subcategories
//! hold tens of entries after taxonomy partitioning, so the simple pass wins;
//! bucketing by [`EquivalenceKey`] first would give the same output.

use super::item::{Candidate, ScanItem};
use crate::world::GridPos;

/// Group `candidates`, which must already be sorted by ascending distance.
///
/// Output stays in ascending representative distance with ties in input order.
pub fn group(reference: GridPos, candidates: Vec<Candidate>) -> Vec<ScanItem> {
    let mut consumed = vec![false; candidates.len()];
    let mut items = Vec::with_capacity(candidates.len());

    for i in 0..candidates.len() {
        if consumed[i] {
            continue;
        }
        consumed[i] = true;

        let head = &candidates[i];
        let mut members = vec![head.target];

        for j in (i + 1)..candidates.len() {
            if !consumed[j] && head.key.is_equivalent(&candidates[j].key) {
                consumed[j] = true;
                members.push(candidates[j].target);
            }
        }

        items.push(ScanItem::new(
            reference,
            head.label.clone(),
            members,
            head.terrain,
            head.key.clone(),
        ));
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::item::{EquivalenceKey, ScanTarget};
    use crate::world::Quality;

    fn candidate(id: u64, y: i32, key: EquivalenceKey) -> Candidate {
        let pos = GridPos::new(0, y);
        Candidate {
            target: ScanTarget {
                entity: Some(id),
                pos,
                distance: GridPos::new(0, 0).distance_to(pos),
            },
            label: format!("thing {}", id),
            key,
            terrain: false,
        }
    }

    fn wall(stuff: &str, quality: Option<Quality>) -> EquivalenceKey {
        EquivalenceKey::Thing {
            def_name: "Wall".to_string(),
            stuff: Some(stuff.to_string()),
            quality,
        }
    }

    #[test]
    fn test_interleaved_equivalents_merge() {
        let items = group(
            GridPos::new(0, 0),
            vec![
                candidate(1, 1, wall("Wood", None)),
                candidate(2, 2, wall("Steel", None)),
                candidate(3, 3, wall("Wood", None)),
            ],
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].count(), 2);
        assert_eq!(items[0].label(), "thing 1");
        assert_eq!(items[1].count(), 1);
        assert_eq!(items[1].label(), "thing 2");
    }

    #[test]
    fn test_quality_prevents_grouping() {
        let items = group(
            GridPos::new(0, 0),
            vec![
                candidate(1, 1, wall("Wood", Some(Quality::Normal))),
                candidate(2, 2, wall("Wood", Some(Quality::Good))),
                candidate(3, 3, wall("Wood", None)),
            ],
        );
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|item| item.count() == 1));
    }

    #[test]
    fn test_unique_candidates_stay_single() {
        let items = group(
            GridPos::new(0, 0),
            (1..=4).map(|i| candidate(i, i as i32, EquivalenceKey::Unique)).collect(),
        );
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|item| !item.is_group()));
    }

    #[test]
    fn test_empty_input() {
        assert!(group(GridPos::new(0, 0), Vec::new()).is_empty());
    }
}
