//! Spoken-text helpers shared by the scanner and the announcer.

use crate::scan::{CategoryNode, ScanItem, SubcategoryNode};
use crate::world::{Direction, EntitySnapshot};

/// Entity label with its quality tier, e.g. "wood wall (good)"
pub fn entity_label(entity: &EntitySnapshot) -> String {
    match entity.quality {
        Some(quality) => format!("{} ({})", entity.label, quality.display_name()),
        None => entity.label.clone(),
    }
}

/// "3 tiles", "1 tile"
pub fn distance(tiles: f32) -> String {
    let rounded = tiles.round() as i64;
    if rounded == 1 {
        "1 tile".to_string()
    } else {
        format!("{} tiles", rounded)
    }
}

/// "3 tiles northeast", or "here" for the reference cell
pub fn distance_and_direction(tiles: f32, direction: Direction) -> String {
    if direction == Direction::Here || tiles < 0.5 {
        return "here".to_string();
    }
    format!("{} {}", distance(tiles), direction.display_name())
}

/// "wood wall x2, 3 tiles north"
pub fn scan_item(item: &ScanItem) -> String {
    let place = distance_and_direction(item.distance(), item.direction());
    if item.is_group() {
        format!("{} x{}, {}", item.label(), item.count(), place)
    } else {
        format!("{}, {}", item.label(), place)
    }
}

/// "Buildings, 4 entries"
pub fn category(node: &CategoryNode) -> String {
    format!("{}, {}", node.category.display_name(), entries(node.item_count()))
}

/// "Structure, 2 entries"
pub fn subcategory(node: &SubcategoryNode) -> String {
    format!("{}, {}", node.subcategory.display_name(), entries(node.items.len()))
}

pub fn entries(count: usize) -> String {
    if count == 1 {
        "1 entry".to_string()
    } else {
        format!("{} entries", count)
    }
}

/// "on" / "off" for toggles
pub fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Join key names for instructions: "Up and Down"
pub fn key_pair(first: &str, second: &str) -> String {
    format!("{} and {}", first, second)
}
