//! Spatial entity scanner.
//!
//! Classifies every visible entity and interesting terrain cell around a
//! reference point into a fixed category tree, sorted by distance, with
//! identical neighbours collapsed into bulk groups.

pub mod classifier;
pub mod grouper;
pub mod item;
pub mod scanner;
pub mod taxonomy;

pub use item::{ScanItem, ScanTarget};
pub use scanner::{CategoryNode, FlatRow, ScanResult, Scanner, SubcategoryNode};
pub use taxonomy::{Category, Subcategory};

use crate::world::GridPos;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Position {pos} is outside the map ({width}x{height})")]
    OutOfBounds { pos: GridPos, width: i32, height: i32 },

    #[error("Invalid interesting-terrain pattern: {0}")]
    TerrainPattern(#[from] regex::Error),

    #[error("Invalid junk name list: {0}")]
    JunkPatterns(#[from] aho_corasick::BuildError),
}

/// Scanner tuning, stored under `[scan]` in config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Faction whose point of view decides ownership and hostility
    #[serde(default = "default_observer_faction")]
    pub observer_faction: String,
    /// Only scan this many tiles around the reference point (None = whole map)
    #[serde(default)]
    pub radius: Option<u32>,
    /// Natural terrain at or above this fertility is worth announcing
    #[serde(default = "default_fertility_threshold")]
    pub fertility_threshold: f32,
    /// Natural terrain whose name matches this regex is worth announcing
    #[serde(default = "default_interesting_terrain")]
    pub interesting_terrain: String,
    /// Item definition names containing any of these are never announced
    #[serde(default = "default_junk_patterns")]
    pub junk_patterns: Vec<String>,
}

fn default_observer_faction() -> String {
    "Player".to_string()
}

fn default_fertility_threshold() -> f32 {
    1.4
}

fn default_interesting_terrain() -> String {
    "(?i)marsh|sand|gravel|ice".to_string()
}

fn default_junk_patterns() -> Vec<String> {
    vec!["chunk".to_string(), "slag".to_string()]
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            observer_faction: default_observer_faction(),
            radius: None,
            fertility_threshold: default_fertility_threshold(),
            interesting_terrain: default_interesting_terrain(),
            junk_patterns: default_junk_patterns(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_terrain_pattern_rejected() {
        let options = ScanOptions {
            interesting_terrain: "(unclosed".to_string(),
            ..ScanOptions::default()
        };
        assert!(matches!(
            Scanner::new(&options),
            Err(ScanError::TerrainPattern(_))
        ));
    }
}
