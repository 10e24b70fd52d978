//! World snapshot - the read-only view of the simulation the scanner consumes.
//!
//! The host game hands us plain data: every live entity with its capability
//! flags, and every terrain cell in bounds. Nothing here is ever mutated by the
//! scanner; a fresh snapshot is taken for every scan.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Stable identifier the host uses for an entity
pub type EntityId = u64;

/// A cell coordinate on the map grid (x grows east, y grows north)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance in tiles
    pub fn distance_to(&self, other: GridPos) -> f32 {
        let dx = (other.x - self.x) as f32;
        let dy = (other.y - self.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Compass direction from `self` towards `other`
    pub fn direction_to(&self, other: GridPos) -> Direction {
        Direction::from_offset(other.x - self.x, other.y - self.y)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl std::str::FromStr for GridPos {
    type Err = anyhow::Error;

    /// Parse "x,y"
    fn from_str(s: &str) -> Result<Self> {
        let (x, y) = s
            .split_once(',')
            .with_context(|| format!("Expected x,y but got '{}'", s))?;
        Ok(Self {
            x: x.trim().parse().context("Invalid x coordinate")?,
            y: y.trim().parse().context("Invalid y coordinate")?,
        })
    }
}

/// Eight-way compass direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Same cell as the reference point
    Here,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// Bucket an offset into one of eight 45-degree sectors
    pub fn from_offset(dx: i32, dy: i32) -> Self {
        if dx == 0 && dy == 0 {
            return Direction::Here;
        }

        // Angle measured clockwise from north
        let angle = (dx as f32).atan2(dy as f32).to_degrees();
        let angle = if angle < 0.0 { angle + 360.0 } else { angle };
        let sector = ((angle + 22.5) / 45.0).floor() as u32 % 8;

        match sector {
            0 => Direction::North,
            1 => Direction::NorthEast,
            2 => Direction::East,
            3 => Direction::SouthEast,
            4 => Direction::South,
            5 => Direction::SouthWest,
            6 => Direction::West,
            _ => Direction::NorthWest,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Here => "here",
            Self::North => "north",
            Self::NorthEast => "northeast",
            Self::East => "east",
            Self::SouthEast => "southeast",
            Self::South => "south",
            Self::SouthWest => "southwest",
            Self::West => "west",
            Self::NorthWest => "northwest",
        }
    }
}

/// Quality tiers, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quality {
    Awful,
    Poor,
    Normal,
    Good,
    Excellent,
    Masterwork,
    Legendary,
}

impl Quality {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Awful => "awful",
            Self::Poor => "poor",
            Self::Normal => "normal",
            Self::Good => "good",
            Self::Excellent => "excellent",
            Self::Masterwork => "masterwork",
            Self::Legendary => "legendary",
        }
    }
}

/// What sort of creature a pawn is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PawnRace {
    Humanlike,
    Animal,
    Mechanoid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PawnInfo {
    pub race: PawnRace,
    /// Hostile to the observing faction
    #[serde(default)]
    pub hostile: bool,
    /// Animal that needs a pen (roams off otherwise)
    #[serde(default)]
    pub roamer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingInfo {
    /// Architect menu tag ("Structure", "Production", "Joy", ...)
    #[serde(default)]
    pub design_group: Option<String>,
    /// Natural rock wall, surfaced as mineable terrain instead
    #[serde(default)]
    pub natural_rock: bool,
    /// Shelves and other things that hold items
    #[serde(default)]
    pub storage: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantInfo {
    #[serde(default)]
    pub tree: bool,
    #[serde(default)]
    pub harvest_yield: f32,
    #[serde(default)]
    pub harvestable_now: bool,
    #[serde(default)]
    pub blighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInfo {
    /// Forbidden to the observing faction
    #[serde(default)]
    pub forbidden: bool,
    /// Uninstalled building packed up as an item
    #[serde(default)]
    pub minified: bool,
}

/// Capability set of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    Pawn(PawnInfo),
    Building(BuildingInfo),
    Plant(PlantInfo),
    Item(ItemInfo),
    Fire,
    Filth,
}

/// One live entity as seen by the observer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    /// Definition name ("Wall", "Steel", "Muffalo")
    pub def_name: String,
    /// Player-facing label ("wood wall", "Ada")
    pub label: String,
    pub pos: GridPos,
    pub kind: EntityKind,
    #[serde(default)]
    pub faction: Option<String>,
    /// Material the entity is made from
    #[serde(default)]
    pub stuff: Option<String>,
    #[serde(default)]
    pub quality: Option<Quality>,
    /// (current, max)
    #[serde(default)]
    pub hit_points: Option<(u32, u32)>,
    /// Under fog of war for the observer
    #[serde(default)]
    pub fogged: bool,
}

impl EntitySnapshot {
    pub fn is_pawn(&self) -> bool {
        matches!(self.kind, EntityKind::Pawn(_))
    }

    pub fn is_owned_by(&self, faction: &str) -> bool {
        self.faction.as_deref() == Some(faction)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainInfo {
    pub def_name: String,
    pub label: String,
    /// Generated by the map rather than built by a colonist
    #[serde(default = "default_true")]
    pub natural: bool,
    /// Floors that can be laid over other terrain
    #[serde(default)]
    pub layerable: bool,
    #[serde(default)]
    pub fertility: f32,
    #[serde(default)]
    pub water: bool,
}

fn default_true() -> bool {
    true
}

/// Rock outcrop that can be mined out of a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineableInfo {
    pub def_name: String,
    pub label: String,
    #[serde(default)]
    pub mineable_yield: u32,
}

/// One map cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainCell {
    pub pos: GridPos,
    pub terrain: TerrainInfo,
    #[serde(default)]
    pub mineable: Option<MineableInfo>,
    /// Part of a stockpile zone
    #[serde(default)]
    pub stockpile: bool,
    #[serde(default)]
    pub fogged: bool,
}

/// Source of everything the scanner reads
pub trait WorldSource {
    /// Map size (width, height); valid cells are 0..width, 0..height
    fn bounds(&self) -> (i32, i32);
    fn entities(&self) -> &[EntitySnapshot];
    fn cells(&self) -> &[TerrainCell];

    fn contains(&self, pos: GridPos) -> bool {
        let (width, height) = self.bounds();
        pos.x >= 0 && pos.y >= 0 && pos.x < width && pos.y < height
    }
}

/// Owned snapshot, loadable from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub entities: Vec<EntitySnapshot>,
    #[serde(default)]
    pub cells: Vec<TerrainCell>,
}

impl WorldSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read world snapshot {}", path.display()))?;
        let world: WorldSnapshot = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse world snapshot {}", path.display()))?;
        tracing::debug!(
            "Loaded world {}x{} with {} entities and {} cells",
            world.width,
            world.height,
            world.entities.len(),
            world.cells.len()
        );
        Ok(world)
    }
}

impl WorldSource for WorldSnapshot {
    fn bounds(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn entities(&self) -> &[EntitySnapshot] {
        &self.entities
    }

    fn cells(&self) -> &[TerrainCell] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sectors() {
        assert_eq!(Direction::from_offset(0, 0), Direction::Here);
        assert_eq!(Direction::from_offset(0, 5), Direction::North);
        assert_eq!(Direction::from_offset(3, 3), Direction::NorthEast);
        assert_eq!(Direction::from_offset(4, 0), Direction::East);
        assert_eq!(Direction::from_offset(2, -2), Direction::SouthEast);
        assert_eq!(Direction::from_offset(0, -1), Direction::South);
        assert_eq!(Direction::from_offset(-1, -1), Direction::SouthWest);
        assert_eq!(Direction::from_offset(-7, 1), Direction::West);
        assert_eq!(Direction::from_offset(-2, 2), Direction::NorthWest);
    }

    #[test]
    fn test_grid_pos_parse() {
        let pos: GridPos = "10, 12".parse().unwrap();
        assert_eq!(pos, GridPos::new(10, 12));
        assert!("10".parse::<GridPos>().is_err());
        assert!("a,b".parse::<GridPos>().is_err());
    }

    #[test]
    fn test_contains() {
        let world = WorldSnapshot {
            width: 5,
            height: 5,
            ..Default::default()
        };
        assert!(world.contains(GridPos::new(0, 0)));
        assert!(world.contains(GridPos::new(4, 4)));
        assert!(!world.contains(GridPos::new(5, 0)));
        assert!(!world.contains(GridPos::new(-1, 2)));
    }

    #[test]
    fn test_snapshot_json() {
        let json = r#"{
            "width": 20, "height": 20,
            "entities": [
                {"id": 1, "def_name": "Wall", "label": "wood wall", "pos": {"x": 1, "y": 2},
                 "kind": {"type": "building", "design_group": "Structure"}, "stuff": "WoodLog"}
            ],
            "cells": [
                {"pos": {"x": 0, "y": 0}, "terrain": {"def_name": "Soil", "label": "soil", "fertility": 1.0}}
            ]
        }"#;
        let world: WorldSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(world.entities.len(), 1);
        assert!(matches!(world.entities[0].kind, EntityKind::Building(_)));
        assert!(world.cells[0].terrain.natural);
    }
}
