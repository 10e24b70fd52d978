//! Scan orchestration: classify, bucket, sort, group, prune.

use super::classifier::Classifier;
use super::grouper;
use super::item::{Candidate, EquivalenceKey, ScanItem, ScanTarget};
use super::taxonomy::{Category, Subcategory};
use super::{ScanError, ScanOptions};
use crate::format;
use crate::world::{EntityKind, EntitySnapshot, GridPos, TerrainCell, WorldSource};
use std::collections::{HashMap, HashSet};

/// Non-empty subcategory with its grouped items
#[derive(Debug, Clone, PartialEq)]
pub struct SubcategoryNode {
    pub subcategory: Subcategory,
    pub items: Vec<ScanItem>,
}

/// Non-empty category with its non-empty subcategories
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryNode {
    pub category: Category,
    pub subcategories: Vec<SubcategoryNode>,
}

impl CategoryNode {
    /// Number of scan items (groups count once)
    pub fn item_count(&self) -> usize {
        self.subcategories.iter().map(|s| s.items.len()).sum()
    }
}

/// One row of the flattened tree
#[derive(Debug, Clone, Copy)]
pub struct FlatRow<'a> {
    pub category: Category,
    pub subcategory: Subcategory,
    pub item: &'a ScanItem,
}

/// Result of one scan: categories in announcement order, empty ones pruned
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub reference: GridPos,
    pub categories: Vec<CategoryNode>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category(&self, category: Category) -> Option<&CategoryNode> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn subcategory(&self, subcategory: Subcategory) -> Option<&SubcategoryNode> {
        self.category(subcategory.category())?
            .subcategories
            .iter()
            .find(|s| s.subcategory == subcategory)
    }

    /// Every item in tree order
    pub fn flatten(&self) -> Vec<FlatRow<'_>> {
        self.categories
            .iter()
            .flat_map(|c| {
                c.subcategories.iter().flat_map(move |s| {
                    s.items.iter().map(move |item| FlatRow {
                        category: c.category,
                        subcategory: s.subcategory,
                        item,
                    })
                })
            })
            .collect()
    }
}

/// Spatial entity scanner
#[derive(Debug)]
pub struct Scanner {
    classifier: Classifier,
    radius: Option<f32>,
}

impl Scanner {
    pub fn new(options: &ScanOptions) -> Result<Self, ScanError> {
        Ok(Self {
            classifier: Classifier::new(options)?,
            radius: options.radius.map(|r| r as f32),
        })
    }

    /// Scan the world around `reference`, rejecting positions off the map
    pub fn scan<W: WorldSource + ?Sized>(
        &self,
        reference: GridPos,
        world: &W,
    ) -> Result<ScanResult, ScanError> {
        if !world.contains(reference) {
            let (width, height) = world.bounds();
            return Err(ScanError::OutOfBounds {
                pos: reference,
                width,
                height,
            });
        }
        Ok(self.scan_entities(reference, world.entities(), world.cells()))
    }

    /// Scan raw entity and cell lists. Pure: same input, same tree.
    pub fn scan_entities(
        &self,
        reference: GridPos,
        entities: &[EntitySnapshot],
        cells: &[TerrainCell],
    ) -> ScanResult {
        let storage_cells = storage_cells(entities, cells);
        let mut buckets: HashMap<Subcategory, Vec<Candidate>> = HashMap::new();

        for entity in entities.iter().filter(|e| !e.fogged) {
            let Some(target) = self.target(reference, Some(entity.id), entity.pos) else {
                continue;
            };
            let Some(placement) = self.classifier.classify(entity, &storage_cells) else {
                continue;
            };

            let candidate = Candidate {
                target,
                label: format::entity_label(entity),
                key: equivalence_key(entity),
                terrain: false,
            };
            for sub in placement.subcategories() {
                buckets.entry(sub).or_default().push(candidate.clone());
            }
        }

        for cell in cells.iter().filter(|c| !c.fogged) {
            let Some(target) = self.target(reference, None, cell.pos) else {
                continue;
            };
            let Some(placement) = self.classifier.classify_cell(cell) else {
                continue;
            };

            buckets
                .entry(placement.subcategory)
                .or_default()
                .push(Candidate {
                    target,
                    key: EquivalenceKey::Cell {
                        label: placement.label.clone(),
                    },
                    label: placement.label,
                    terrain: true,
                });
        }

        let mut categories = Vec::new();
        for category in Category::ALL {
            let mut subcategories = Vec::new();
            for &sub in category.subcategories() {
                let Some(mut candidates) = buckets.remove(&sub) else {
                    continue;
                };
                // Stable: equal distances keep input order
                candidates.sort_by(|a, b| a.target.distance.total_cmp(&b.target.distance));
                let items = grouper::group(reference, candidates);
                if !items.is_empty() {
                    subcategories.push(SubcategoryNode {
                        subcategory: sub,
                        items,
                    });
                }
            }
            if !subcategories.is_empty() {
                categories.push(CategoryNode {
                    category,
                    subcategories,
                });
            }
        }

        tracing::debug!(
            "Scan at {} found {} categories, {} items",
            reference,
            categories.len(),
            categories.iter().map(CategoryNode::item_count).sum::<usize>()
        );

        ScanResult {
            reference,
            categories,
        }
    }

    /// Distance-tagged target, or `None` when outside the scan radius
    fn target(&self, reference: GridPos, entity: Option<u64>, pos: GridPos) -> Option<ScanTarget> {
        let distance = reference.distance_to(pos);
        if self.radius.is_some_and(|r| distance > r) {
            return None;
        }
        Some(ScanTarget {
            entity,
            pos,
            distance,
        })
    }
}

fn equivalence_key(entity: &EntitySnapshot) -> EquivalenceKey {
    if entity.is_pawn() {
        return EquivalenceKey::Unique;
    }
    EquivalenceKey::Thing {
        def_name: entity.def_name.clone(),
        stuff: entity.stuff.clone(),
        quality: entity.quality,
    }
}

/// Cells that count as "in storage": stockpile zones and storage buildings
fn storage_cells(entities: &[EntitySnapshot], cells: &[TerrainCell]) -> HashSet<GridPos> {
    let stockpiles = cells.iter().filter(|c| c.stockpile).map(|c| c.pos);
    let shelves = entities
        .iter()
        .filter(|e| matches!(&e.kind, EntityKind::Building(b) if b.storage))
        .map(|e| e.pos);
    stockpiles.chain(shelves).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{
        BuildingInfo, ItemInfo, MineableInfo, PawnInfo, PawnRace, PlantInfo, Quality,
        TerrainInfo, WorldSnapshot,
    };

    fn scanner() -> Scanner {
        Scanner::new(&ScanOptions::default()).unwrap()
    }

    fn wall(id: u64, x: i32, y: i32, stuff: &str, quality: Option<Quality>) -> EntitySnapshot {
        EntitySnapshot {
            id,
            def_name: "Wall".to_string(),
            label: format!("{} wall", stuff.to_lowercase()),
            pos: GridPos::new(x, y),
            kind: EntityKind::Building(BuildingInfo {
                design_group: Some("Structure".to_string()),
                natural_rock: false,
                storage: false,
            }),
            faction: Some("Player".to_string()),
            stuff: Some(stuff.to_string()),
            quality,
            hit_points: Some((300, 300)),
            fogged: false,
        }
    }

    fn flagstone(x: i32, y: i32) -> TerrainCell {
        TerrainCell {
            pos: GridPos::new(x, y),
            terrain: TerrainInfo {
                def_name: "FlagstoneGranite".to_string(),
                label: "granite flagstone".to_string(),
                natural: false,
                layerable: false,
                fertility: 0.0,
                water: false,
            },
            mineable: None,
            stockpile: false,
            fogged: false,
        }
    }

    #[test]
    fn test_walls_group_ignoring_hit_points() {
        let mut damaged = wall(2, 10, 12, "Wood", Some(Quality::Normal));
        damaged.hit_points = Some((1, 300));
        let entities = vec![
            wall(1, 10, 11, "Wood", Some(Quality::Normal)),
            damaged,
            wall(3, 10, 13, "Stone", None),
        ];

        let result = scanner().scan_entities(GridPos::new(10, 10), &entities, &[]);
        let structure = result.subcategory(Subcategory::BuildingsStructure).unwrap();

        assert_eq!(structure.items.len(), 2);
        assert_eq!(structure.items[0].count(), 2);
        assert_eq!(structure.items[0].representative().entity, Some(1));
        assert_eq!(structure.items[1].count(), 1);
        assert_eq!(structure.items[1].representative().entity, Some(3));
    }

    #[test]
    fn test_flagstone_cells_collapse_to_one_group() {
        let cells = vec![
            flagstone(15, 10),
            flagstone(11, 10),
            flagstone(10, 14),
            flagstone(3, 3),
            flagstone(12, 12),
        ];
        let result = scanner().scan_entities(GridPos::new(10, 10), &[], &cells);
        let constructed = result.subcategory(Subcategory::TerrainConstructed).unwrap();

        assert_eq!(constructed.items.len(), 1);
        let item = &constructed.items[0];
        assert_eq!(item.count(), 5);
        assert_eq!(item.pos(), GridPos::new(11, 10));
        assert!(item.is_terrain());
        assert_eq!(item.label(), "granite flagstone");
    }

    #[test]
    fn test_pawns_never_grouped() {
        let entities: Vec<_> = (0..4)
            .map(|i| EntitySnapshot {
                id: i,
                def_name: "Human".to_string(),
                label: "raider".to_string(),
                pos: GridPos::new(i as i32, 0),
                kind: EntityKind::Pawn(PawnInfo {
                    race: PawnRace::Humanlike,
                    hostile: true,
                    roamer: false,
                }),
                faction: Some("Pirates".to_string()),
                stuff: None,
                quality: None,
                hit_points: None,
                fogged: false,
            })
            .collect();
        let result = scanner().scan_entities(GridPos::new(0, 0), &entities, &[]);
        let npcs = result.subcategory(Subcategory::PawnsNpc).unwrap();
        assert_eq!(npcs.items.len(), 4);
        assert!(npcs.items.iter().all(|i| i.count() == 1));
    }

    #[test]
    fn test_fogged_and_out_of_radius_are_skipped() {
        let mut fogged = wall(1, 1, 0, "Wood", None);
        fogged.fogged = true;
        let far = wall(2, 50, 0, "Steel", None);
        let near = wall(3, 2, 0, "Stone", None);

        let options = ScanOptions {
            radius: Some(10),
            ..ScanOptions::default()
        };
        let scanner = Scanner::new(&options).unwrap();
        let result = scanner.scan_entities(GridPos::new(0, 0), &[fogged, far, near], &[]);
        let rows = result.flatten();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item.representative().entity, Some(3));
    }

    #[test]
    fn test_fogged_cells_are_skipped() {
        let mut hidden_floor = flagstone(11, 10);
        hidden_floor.fogged = true;
        let visible_floor = flagstone(13, 10);
        let gold = |x, fogged| TerrainCell {
            mineable: Some(MineableInfo {
                def_name: "MineableGold".to_string(),
                label: "gold ore".to_string(),
                mineable_yield: 35,
            }),
            fogged,
            ..flagstone(x, 12)
        };

        let cells = vec![hidden_floor, visible_floor, gold(10, true), gold(14, false)];
        let result = scanner().scan_entities(GridPos::new(10, 10), &[], &cells);

        let floors = result.subcategory(Subcategory::TerrainConstructed).unwrap();
        assert_eq!(floors.items.len(), 1);
        assert_eq!(floors.items[0].count(), 1);
        assert_eq!(floors.items[0].pos(), GridPos::new(13, 10));

        let ore = result.subcategory(Subcategory::MineableAll).unwrap();
        assert_eq!(ore.items[0].count(), 1);
        assert_eq!(ore.items[0].pos(), GridPos::new(14, 12));

        // A fully fogged map shows nothing at all
        let mut dark = cells.clone();
        dark.iter_mut().for_each(|c| c.fogged = true);
        assert!(scanner().scan_entities(GridPos::new(10, 10), &[], &dark).is_empty());
    }

    #[test]
    fn test_items_on_shelves_are_stored() {
        let shelf = EntitySnapshot {
            kind: EntityKind::Building(BuildingInfo {
                design_group: Some("Furniture".to_string()),
                natural_rock: false,
                storage: true,
            }),
            def_name: "Shelf".to_string(),
            label: "wood shelf".to_string(),
            ..wall(10, 5, 5, "Wood", None)
        };
        let steel = EntitySnapshot {
            kind: EntityKind::Item(ItemInfo {
                forbidden: false,
                minified: false,
            }),
            def_name: "Steel".to_string(),
            label: "steel x75".to_string(),
            stuff: None,
            faction: None,
            ..wall(11, 5, 5, "Wood", None)
        };
        let result = scanner().scan_entities(GridPos::new(0, 0), &[shelf, steel], &[]);
        assert!(result.subcategory(Subcategory::ItemsStored).is_some());
        assert!(result.subcategory(Subcategory::ItemsScattered).is_none());
    }

    #[test]
    fn test_blighted_plant_reported_twice() {
        let plant = EntitySnapshot {
            kind: EntityKind::Plant(PlantInfo {
                tree: false,
                harvest_yield: 4.0,
                harvestable_now: true,
                blighted: true,
            }),
            def_name: "PlantRice".to_string(),
            label: "rice plant".to_string(),
            stuff: None,
            faction: None,
            ..wall(1, 3, 4, "Wood", None)
        };
        let result = scanner().scan_entities(GridPos::new(0, 0), &[plant], &[]);
        assert!(result.subcategory(Subcategory::PlantsHarvestable).is_some());
        assert!(result.subcategory(Subcategory::HazardsBlight).is_some());
        let order: Vec<_> = result.categories.iter().map(|c| c.category).collect();
        assert_eq!(order, vec![Category::Hazards, Category::Plants]);
    }

    #[test]
    fn test_out_of_bounds_reference_rejected() {
        let world = WorldSnapshot {
            width: 10,
            height: 10,
            ..Default::default()
        };
        let err = scanner().scan(GridPos::new(12, 3), &world).unwrap_err();
        assert!(matches!(err, ScanError::OutOfBounds { .. }));
        assert!(scanner().scan(GridPos::new(2, 3), &world).unwrap().is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::world::{
        BuildingInfo, ItemInfo, MineableInfo, PawnInfo, PawnRace, PlantInfo, Quality,
        TerrainInfo,
    };
    use proptest::prelude::*;

    fn arb_kind() -> impl Strategy<Value = EntityKind> {
        prop_oneof![
            (any::<bool>(), any::<bool>()).prop_map(|(hostile, roamer)| EntityKind::Pawn(
                PawnInfo {
                    race: PawnRace::Animal,
                    hostile,
                    roamer,
                }
            )),
            Just(EntityKind::Pawn(PawnInfo {
                race: PawnRace::Humanlike,
                hostile: false,
                roamer: false,
            })),
            prop::option::of(prop_oneof![Just("Structure"), Just("Power"), Just("Joy")]).prop_map(
                |group| EntityKind::Building(BuildingInfo {
                    design_group: group.map(str::to_string),
                    natural_rock: false,
                    storage: false,
                })
            ),
            (any::<bool>(), any::<bool>()).prop_map(|(tree, blighted)| EntityKind::Plant(
                PlantInfo {
                    tree,
                    harvest_yield: 1.0,
                    harvestable_now: false,
                    blighted,
                }
            )),
            (any::<bool>(), any::<bool>()).prop_map(|(forbidden, minified)| EntityKind::Item(
                ItemInfo {
                    forbidden,
                    minified,
                }
            )),
            Just(EntityKind::Fire),
            Just(EntityKind::Filth),
        ]
    }

    fn arb_entity() -> impl Strategy<Value = EntitySnapshot> {
        (
            arb_kind(),
            prop_oneof![Just("Wall"), Just("Steel"), Just("Muffalo")],
            prop::option::of(prop_oneof![Just("Wood"), Just("Granite")]),
            prop::option::of(prop_oneof![Just(Quality::Normal), Just(Quality::Good)]),
            0i32..20,
            0i32..20,
            prop::option::of(Just("Player")),
            any::<bool>(),
        )
            .prop_map(|(kind, def, stuff, quality, x, y, faction, fogged)| EntitySnapshot {
                id: 0,
                def_name: def.to_string(),
                label: def.to_lowercase(),
                pos: GridPos::new(x, y),
                kind,
                faction: faction.map(str::to_string),
                stuff: stuff.map(str::to_string),
                quality,
                hit_points: None,
                fogged,
            })
    }

    fn arb_entities() -> impl Strategy<Value = Vec<EntitySnapshot>> {
        prop::collection::vec(arb_entity(), 0..40).prop_map(|mut v| {
            for (i, e) in v.iter_mut().enumerate() {
                e.id = i as u64;
            }
            v
        })
    }

    fn arb_terrain() -> impl Strategy<Value = TerrainInfo> {
        (
            prop_oneof![
                Just(("Soil", "soil", true, 1.0f32)),
                Just(("SoilRich", "rich soil", true, 1.4)),
                Just(("Marsh", "marsh", true, 0.0)),
                Just(("FlagstoneGranite", "granite flagstone", false, 0.0)),
                Just(("WoodPlankFloor", "wood floor", false, 0.0)),
            ],
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|((def, label, natural, fertility), layerable, water)| TerrainInfo {
                def_name: def.to_string(),
                label: label.to_string(),
                natural,
                layerable,
                fertility,
                water,
            })
    }

    fn arb_cell() -> impl Strategy<Value = TerrainCell> {
        (
            arb_terrain(),
            prop::option::of((prop_oneof![Just("granite"), Just("steel")], 0u32..3)),
            0i32..20,
            0i32..20,
            any::<bool>(),
        )
            .prop_map(|(terrain, mineable, x, y, fogged)| TerrainCell {
                pos: GridPos::new(x, y),
                terrain,
                mineable: mineable.map(|(rock, mineable_yield)| MineableInfo {
                    def_name: format!("Mineable{}", rock),
                    label: rock.to_string(),
                    mineable_yield,
                }),
                stockpile: false,
                fogged,
            })
    }

    fn arb_cells() -> impl Strategy<Value = Vec<TerrainCell>> {
        prop::collection::vec(arb_cell(), 0..30)
    }

    proptest! {
        #[test]
        fn no_empty_categories(entities in arb_entities(), cells in arb_cells()) {
            let result = scanner_default().scan_entities(GridPos::new(10, 10), &entities, &cells);
            for category in &result.categories {
                prop_assert!(!category.subcategories.is_empty());
                for sub in &category.subcategories {
                    prop_assert!(!sub.items.is_empty());
                    prop_assert_eq!(sub.subcategory.category(), category.category);
                }
            }
        }

        #[test]
        fn distances_non_decreasing(entities in arb_entities(), cells in arb_cells()) {
            let result = scanner_default().scan_entities(GridPos::new(10, 10), &entities, &cells);
            for category in &result.categories {
                for sub in &category.subcategories {
                    for pair in sub.items.windows(2) {
                        prop_assert!(pair[0].distance() <= pair[1].distance());
                    }
                }
            }
        }

        #[test]
        fn entities_placed_at_most_once_except_blight(entities in arb_entities(), cells in arb_cells()) {
            let result = scanner_default().scan_entities(GridPos::new(10, 10), &entities, &cells);
            let mut seen: HashMap<u64, Vec<Subcategory>> = HashMap::new();
            for row in result.flatten() {
                for member in row.item.members() {
                    if let Some(id) = member.entity {
                        seen.entry(id).or_default().push(row.subcategory);
                    }
                }
            }
            for (id, subs) in seen {
                if subs.len() > 1 {
                    prop_assert_eq!(subs.len(), 2);
                    prop_assert!(subs.contains(&Subcategory::HazardsBlight));
                    let entity = &entities[id as usize];
                    let blighted = matches!(&entity.kind, EntityKind::Plant(p) if p.blighted);
                    prop_assert!(blighted);
                }
            }
        }

        #[test]
        fn groups_have_two_or_more_members(entities in arb_entities(), cells in arb_cells()) {
            let result = scanner_default().scan_entities(GridPos::new(10, 10), &entities, &cells);
            for row in result.flatten() {
                prop_assert_eq!(row.item.is_group(), row.item.count() >= 2);
                prop_assert!(row.item.count() >= 1);
                if matches!(row.subcategory.category(), Category::Pawns | Category::Tame | Category::Wild) {
                    prop_assert_eq!(row.item.count(), 1);
                }
            }
        }

        #[test]
        fn regrouping_is_idempotent(entities in arb_entities(), cells in arb_cells()) {
            let reference = GridPos::new(10, 10);
            let result = scanner_default().scan_entities(reference, &entities, &cells);
            for category in &result.categories {
                for sub in &category.subcategories {
                    let units: Vec<Candidate> = sub
                        .items
                        .iter()
                        .map(|item| Candidate {
                            target: *item.representative(),
                            label: item.label().to_string(),
                            key: item.key().clone(),
                            terrain: item.is_terrain(),
                        })
                        .collect();
                    let regrouped = grouper::group(reference, units);
                    prop_assert_eq!(regrouped.len(), sub.items.len());
                    for (again, original) in regrouped.iter().zip(&sub.items) {
                        prop_assert_eq!(again.count(), 1);
                        prop_assert_eq!(again.pos(), original.pos());
                    }
                }
            }
        }

        #[test]
        fn terrain_members_come_from_visible_cells(cells in arb_cells()) {
            let result = scanner_default().scan_entities(GridPos::new(10, 10), &[], &cells);
            let visible: HashSet<GridPos> =
                cells.iter().filter(|c| !c.fogged).map(|c| c.pos).collect();
            for row in result.flatten() {
                prop_assert!(row.item.is_terrain());
                prop_assert!(matches!(row.category, Category::Terrain | Category::Mineable));
                for member in row.item.members() {
                    prop_assert!(visible.contains(&member.pos));
                }
            }
        }

        #[test]
        fn scan_is_repeatable(entities in arb_entities(), cells in arb_cells()) {
            let scanner = scanner_default();
            let first = scanner.scan_entities(GridPos::new(4, 4), &entities, &cells);
            let second = scanner.scan_entities(GridPos::new(4, 4), &entities, &cells);
            prop_assert_eq!(first, second);
        }
    }

    fn scanner_default() -> Scanner {
        Scanner::new(&ScanOptions::default()).unwrap()
    }
}
