//! Entity and terrain classification.
//!
//! Rules are evaluated top to bottom and the first match wins. The only entity
//! that can land in two buckets is a blighted plant, which is reported both as
//! a plant and as a hazard.

use super::taxonomy::Subcategory;
use super::{ScanError, ScanOptions};
use crate::world::{EntityKind, EntitySnapshot, GridPos, PawnRace, TerrainCell};
use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use regex::Regex;
use std::collections::HashSet;

/// Where a classified entity goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub primary: Subcategory,
    /// Second bucket (blight hazard) for plants that are also a hazard
    pub also: Option<Subcategory>,
}

impl Placement {
    fn single(primary: Subcategory) -> Self {
        Self {
            primary,
            also: None,
        }
    }

    pub fn subcategories(&self) -> impl Iterator<Item = Subcategory> {
        std::iter::once(self.primary).chain(self.also)
    }
}

/// Where a terrain cell goes, and the label it is grouped under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellPlacement {
    pub subcategory: Subcategory,
    pub label: String,
}

/// Compiled classification rules
#[derive(Debug)]
pub struct Classifier {
    observer: String,
    fertility_threshold: f32,
    interesting_terrain: Regex,
    junk: AhoCorasick,
}

impl Classifier {
    pub fn new(options: &ScanOptions) -> Result<Self, ScanError> {
        let interesting_terrain = Regex::new(&options.interesting_terrain)?;
        let junk = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .build(&options.junk_patterns)?;

        Ok(Self {
            observer: options.observer_faction.clone(),
            fertility_threshold: options.fertility_threshold,
            interesting_terrain,
            junk,
        })
    }

    /// Classify one entity. `None` means it is deliberately not surfaced.
    ///
    /// `storage_cells` holds every cell that is a stockpile or has a storage
    /// building on it.
    pub fn classify(
        &self,
        entity: &EntitySnapshot,
        storage_cells: &HashSet<GridPos>,
    ) -> Option<Placement> {
        let owned = entity.is_owned_by(&self.observer);

        match &entity.kind {
            EntityKind::Pawn(pawn) => Some(Placement::single(match pawn.race {
                PawnRace::Mechanoid => Subcategory::PawnsMechanoid,
                PawnRace::Humanlike if owned => Subcategory::PawnsPlayer,
                PawnRace::Humanlike => Subcategory::PawnsNpc,
                PawnRace::Animal if owned && pawn.roamer => Subcategory::TamePen,
                PawnRace::Animal if owned => Subcategory::TameNonPen,
                PawnRace::Animal if pawn.hostile => Subcategory::WildHostile,
                PawnRace::Animal => Subcategory::WildPassive,
            })),
            EntityKind::Fire => Some(Placement::single(Subcategory::HazardsFire)),
            EntityKind::Plant(plant) => {
                let primary = if plant.tree {
                    if plant.harvest_yield > 0.0 {
                        Subcategory::TreesHarvestable
                    } else {
                        Subcategory::TreesNonHarvestable
                    }
                } else if plant.harvest_yield > 0.0 || plant.harvestable_now {
                    Subcategory::PlantsHarvestable
                } else {
                    Subcategory::PlantsDebris
                };
                Some(Placement {
                    primary,
                    also: plant.blighted.then_some(Subcategory::HazardsBlight),
                })
            }
            EntityKind::Building(building) => {
                if building.natural_rock {
                    return None;
                }
                Some(Placement::single(Subcategory::from_design_group(
                    building.design_group.as_deref(),
                )))
            }
            EntityKind::Filth => None,
            EntityKind::Item(_) if self.is_junk(&entity.def_name) => None,
            EntityKind::Item(item) => Some(Placement::single(if item.forbidden {
                // Forbidden wins even for items sitting in storage
                Subcategory::ItemsForbidden
            } else if item.minified {
                Subcategory::ItemsFurniture
            } else if storage_cells.contains(&entity.pos) {
                Subcategory::ItemsStored
            } else {
                Subcategory::ItemsScattered
            })),
        }
    }

    /// Classify one terrain cell. Rock outcrops win over the floor beneath them.
    pub fn classify_cell(&self, cell: &TerrainCell) -> Option<CellPlacement> {
        if let Some(mineable) = &cell.mineable {
            if mineable.mineable_yield > 0 {
                return Some(CellPlacement {
                    subcategory: Subcategory::MineableAll,
                    label: mineable.label.clone(),
                });
            }
            return None;
        }

        let terrain = &cell.terrain;
        if !terrain.natural {
            return Some(CellPlacement {
                subcategory: Subcategory::TerrainConstructed,
                label: terrain.label.clone(),
            });
        }

        if terrain.layerable || !self.is_interesting(cell) {
            return None;
        }

        Some(CellPlacement {
            subcategory: Subcategory::TerrainNatural,
            label: terrain.label.clone(),
        })
    }

    fn is_interesting(&self, cell: &TerrainCell) -> bool {
        let terrain = &cell.terrain;
        terrain.fertility >= self.fertility_threshold
            || terrain.water
            || self.interesting_terrain.is_match(&terrain.def_name)
            || self.interesting_terrain.is_match(&terrain.label)
    }

    fn is_junk(&self, def_name: &str) -> bool {
        self.junk.is_match(def_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{
        BuildingInfo, ItemInfo, MineableInfo, PawnInfo, PlantInfo, TerrainInfo,
    };

    fn classifier() -> Classifier {
        Classifier::new(&ScanOptions::default()).unwrap()
    }

    fn entity(kind: EntityKind, faction: Option<&str>) -> EntitySnapshot {
        EntitySnapshot {
            id: 1,
            def_name: "Thing".to_string(),
            label: "thing".to_string(),
            pos: GridPos::new(3, 3),
            kind,
            faction: faction.map(str::to_string),
            stuff: None,
            quality: None,
            hit_points: None,
            fogged: false,
        }
    }

    fn pawn(race: PawnRace, hostile: bool, roamer: bool) -> EntityKind {
        EntityKind::Pawn(PawnInfo {
            race,
            hostile,
            roamer,
        })
    }

    fn item(forbidden: bool, minified: bool) -> EntityKind {
        EntityKind::Item(ItemInfo {
            forbidden,
            minified,
        })
    }

    fn primary(e: &EntitySnapshot) -> Option<Subcategory> {
        classifier().classify(e, &HashSet::new()).map(|p| p.primary)
    }

    #[test]
    fn test_pawn_rules() {
        assert_eq!(
            primary(&entity(pawn(PawnRace::Mechanoid, false, false), Some("Player"))),
            Some(Subcategory::PawnsMechanoid)
        );
        assert_eq!(
            primary(&entity(pawn(PawnRace::Humanlike, false, false), Some("Player"))),
            Some(Subcategory::PawnsPlayer)
        );
        assert_eq!(
            primary(&entity(pawn(PawnRace::Humanlike, true, false), Some("Pirates"))),
            Some(Subcategory::PawnsNpc)
        );
        assert_eq!(
            primary(&entity(pawn(PawnRace::Animal, false, true), Some("Player"))),
            Some(Subcategory::TamePen)
        );
        assert_eq!(
            primary(&entity(pawn(PawnRace::Animal, false, false), Some("Player"))),
            Some(Subcategory::TameNonPen)
        );
        assert_eq!(
            primary(&entity(pawn(PawnRace::Animal, true, false), None)),
            Some(Subcategory::WildHostile)
        );
        assert_eq!(
            primary(&entity(pawn(PawnRace::Animal, false, true), None)),
            Some(Subcategory::WildPassive)
        );
    }

    #[test]
    fn test_blighted_plant_lands_in_two_buckets() {
        let plant = entity(
            EntityKind::Plant(PlantInfo {
                tree: false,
                harvest_yield: 6.0,
                harvestable_now: false,
                blighted: true,
            }),
            None,
        );
        let placement = classifier().classify(&plant, &HashSet::new()).unwrap();
        let subs: Vec<_> = placement.subcategories().collect();
        assert_eq!(
            subs,
            vec![Subcategory::PlantsHarvestable, Subcategory::HazardsBlight]
        );
    }

    #[test]
    fn test_plant_rules() {
        let plant = |tree, harvest_yield, harvestable_now| {
            entity(
                EntityKind::Plant(PlantInfo {
                    tree,
                    harvest_yield,
                    harvestable_now,
                    blighted: false,
                }),
                None,
            )
        };
        assert_eq!(primary(&plant(true, 25.0, false)), Some(Subcategory::TreesHarvestable));
        assert_eq!(primary(&plant(true, 0.0, true)), Some(Subcategory::TreesNonHarvestable));
        assert_eq!(primary(&plant(false, 0.0, true)), Some(Subcategory::PlantsHarvestable));
        assert_eq!(primary(&plant(false, 0.0, false)), Some(Subcategory::PlantsDebris));
    }

    #[test]
    fn test_buildings() {
        let building = |group: Option<&str>, natural_rock| {
            entity(
                EntityKind::Building(BuildingInfo {
                    design_group: group.map(str::to_string),
                    natural_rock,
                    storage: false,
                }),
                Some("Player"),
            )
        };
        assert_eq!(primary(&building(Some("Power"), false)), Some(Subcategory::BuildingsPower));
        assert_eq!(primary(&building(None, false)), Some(Subcategory::BuildingsStructure));
        assert_eq!(primary(&building(Some("Structure"), true)), None);
    }

    #[test]
    fn test_junk_is_skipped() {
        let mut chunk = entity(item(false, false), None);
        chunk.def_name = "ChunkGranite".to_string();
        assert_eq!(primary(&chunk), None);

        let mut slag = entity(item(false, false), None);
        slag.def_name = "ChunkSlagSteel".to_string();
        assert_eq!(primary(&slag), None);

        assert_eq!(primary(&entity(EntityKind::Filth, None)), None);
    }

    #[test]
    fn test_forbidden_beats_stored() {
        let mut storage = HashSet::new();
        storage.insert(GridPos::new(3, 3));
        let c = classifier();

        let forbidden = entity(item(true, false), None);
        assert_eq!(
            c.classify(&forbidden, &storage).unwrap().primary,
            Subcategory::ItemsForbidden
        );

        let stored = entity(item(false, false), None);
        assert_eq!(c.classify(&stored, &storage).unwrap().primary, Subcategory::ItemsStored);
        assert_eq!(
            c.classify(&stored, &HashSet::new()).unwrap().primary,
            Subcategory::ItemsScattered
        );

        let minified = entity(item(false, true), None);
        assert_eq!(
            c.classify(&minified, &storage).unwrap().primary,
            Subcategory::ItemsFurniture
        );
    }

    fn cell(def: &str, natural: bool, fertility: f32) -> TerrainCell {
        TerrainCell {
            pos: GridPos::new(0, 0),
            terrain: TerrainInfo {
                def_name: def.to_string(),
                label: def.to_lowercase(),
                natural,
                layerable: false,
                fertility,
                water: false,
            },
            mineable: None,
            stockpile: false,
            fogged: false,
        }
    }

    #[test]
    fn test_terrain_path() {
        let c = classifier();
        assert_eq!(
            c.classify_cell(&cell("FlagstoneGranite", false, 0.0)).unwrap().subcategory,
            Subcategory::TerrainConstructed
        );
        assert!(c.classify_cell(&cell("Soil", true, 1.0)).is_none());
        assert_eq!(
            c.classify_cell(&cell("SoilRich", true, 1.4)).unwrap().subcategory,
            Subcategory::TerrainNatural
        );
        assert_eq!(
            c.classify_cell(&cell("Marsh", true, 0.0)).unwrap().subcategory,
            Subcategory::TerrainNatural
        );
        assert_eq!(
            c.classify_cell(&cell("Gravel", true, 0.7)).unwrap().subcategory,
            Subcategory::TerrainNatural
        );

        let mut water = cell("WaterShallow", true, 0.0);
        water.terrain.water = true;
        assert!(c.classify_cell(&water).is_some());

        let mut layered = cell("Marsh", true, 0.0);
        layered.terrain.layerable = true;
        assert!(c.classify_cell(&layered).is_none());
    }

    #[test]
    fn test_mineable_cells() {
        let c = classifier();
        let mut rock = cell("Granite", true, 0.0);
        rock.mineable = Some(MineableInfo {
            def_name: "MineableSteel".to_string(),
            label: "compacted steel".to_string(),
            mineable_yield: 40,
        });
        let placement = c.classify_cell(&rock).unwrap();
        assert_eq!(placement.subcategory, Subcategory::MineableAll);
        assert_eq!(placement.label, "compacted steel");

        rock.mineable.as_mut().unwrap().mineable_yield = 0;
        assert!(c.classify_cell(&rock).is_none());
    }
}
