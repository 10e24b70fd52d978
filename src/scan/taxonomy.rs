//! Fixed two-level taxonomy the scanner sorts everything into.
//!
//! Category order is significant: it is the order a screen-reader user hears
//! them, most urgent first.

/// Top-level scanner category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Pawns,
    Tame,
    Wild,
    Hazards,
    Buildings,
    Trees,
    Plants,
    Items,
    Terrain,
    Mineable,
}

impl Category {
    /// Every category in announcement order
    pub const ALL: [Category; 10] = [
        Category::Pawns,
        Category::Tame,
        Category::Wild,
        Category::Hazards,
        Category::Buildings,
        Category::Trees,
        Category::Plants,
        Category::Items,
        Category::Terrain,
        Category::Mineable,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pawns => "Pawns",
            Self::Tame => "Tame animals",
            Self::Wild => "Wild animals",
            Self::Hazards => "Hazards",
            Self::Buildings => "Buildings",
            Self::Trees => "Trees",
            Self::Plants => "Plants",
            Self::Items => "Items",
            Self::Terrain => "Terrain",
            Self::Mineable => "Mineable",
        }
    }

    /// Subcategories of this category, in announcement order
    pub fn subcategories(&self) -> &'static [Subcategory] {
        use Subcategory::*;
        match self {
            Self::Pawns => &[PawnsPlayer, PawnsNpc, PawnsMechanoid],
            Self::Tame => &[TamePen, TameNonPen],
            Self::Wild => &[WildHostile, WildPassive],
            Self::Hazards => &[HazardsFire, HazardsBlight],
            Self::Buildings => &[
                BuildingsStructure,
                BuildingsProduction,
                BuildingsFurniture,
                BuildingsPower,
                BuildingsSecurity,
                BuildingsMisc,
                BuildingsRecreation,
                BuildingsShip,
                BuildingsTemperature,
            ],
            Self::Trees => &[TreesHarvestable, TreesNonHarvestable],
            Self::Plants => &[PlantsHarvestable, PlantsDebris],
            Self::Items => &[ItemsForbidden, ItemsFurniture, ItemsStored, ItemsScattered],
            Self::Terrain => &[TerrainNatural, TerrainConstructed],
            Self::Mineable => &[MineableAll],
        }
    }
}

/// Second-level bucket; each belongs to exactly one [`Category`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subcategory {
    PawnsPlayer,
    PawnsNpc,
    PawnsMechanoid,
    TamePen,
    TameNonPen,
    WildHostile,
    WildPassive,
    HazardsFire,
    HazardsBlight,
    BuildingsStructure,
    BuildingsProduction,
    BuildingsFurniture,
    BuildingsPower,
    BuildingsSecurity,
    BuildingsMisc,
    BuildingsRecreation,
    BuildingsShip,
    BuildingsTemperature,
    TreesHarvestable,
    TreesNonHarvestable,
    PlantsHarvestable,
    PlantsDebris,
    ItemsForbidden,
    ItemsFurniture,
    ItemsStored,
    ItemsScattered,
    TerrainNatural,
    TerrainConstructed,
    MineableAll,
}

impl Subcategory {
    pub fn category(&self) -> Category {
        use Subcategory::*;
        match self {
            PawnsPlayer | PawnsNpc | PawnsMechanoid => Category::Pawns,
            TamePen | TameNonPen => Category::Tame,
            WildHostile | WildPassive => Category::Wild,
            HazardsFire | HazardsBlight => Category::Hazards,
            BuildingsStructure | BuildingsProduction | BuildingsFurniture | BuildingsPower
            | BuildingsSecurity | BuildingsMisc | BuildingsRecreation | BuildingsShip
            | BuildingsTemperature => Category::Buildings,
            TreesHarvestable | TreesNonHarvestable => Category::Trees,
            PlantsHarvestable | PlantsDebris => Category::Plants,
            ItemsForbidden | ItemsFurniture | ItemsStored | ItemsScattered => Category::Items,
            TerrainNatural | TerrainConstructed => Category::Terrain,
            MineableAll => Category::Mineable,
        }
    }

    pub fn display_name(&self) -> &'static str {
        use Subcategory::*;
        match self {
            PawnsPlayer => "Colonists",
            PawnsNpc => "Other people",
            PawnsMechanoid => "Mechanoids",
            TamePen => "Pen animals",
            TameNonPen => "Free animals",
            WildHostile => "Hostile",
            WildPassive => "Passive",
            HazardsFire => "Fire",
            HazardsBlight => "Blight",
            BuildingsStructure => "Structure",
            BuildingsProduction => "Production",
            BuildingsFurniture => "Furniture",
            BuildingsPower => "Power",
            BuildingsSecurity => "Security",
            BuildingsMisc => "Misc",
            BuildingsRecreation => "Recreation",
            BuildingsShip => "Ship",
            BuildingsTemperature => "Temperature",
            TreesHarvestable => "Harvestable",
            TreesNonHarvestable => "Not harvestable",
            PlantsHarvestable => "Harvestable",
            PlantsDebris => "Debris",
            ItemsForbidden => "Forbidden",
            ItemsFurniture => "Uninstalled furniture",
            ItemsStored => "Stored",
            ItemsScattered => "Scattered",
            TerrainNatural => "Natural",
            TerrainConstructed => "Constructed",
            MineableAll => "All",
        }
    }

    /// Map an architect design-group tag to its building bucket.
    /// Missing or unknown tags land in Structure.
    pub fn from_design_group(tag: Option<&str>) -> Self {
        match tag.map(|t| t.to_ascii_lowercase()).as_deref() {
            Some("production") => Self::BuildingsProduction,
            Some("furniture") => Self::BuildingsFurniture,
            Some("power") => Self::BuildingsPower,
            Some("security") => Self::BuildingsSecurity,
            Some("misc") => Self::BuildingsMisc,
            Some("joy") | Some("recreation") => Self::BuildingsRecreation,
            Some("ship") => Self::BuildingsShip,
            Some("temperature") => Self::BuildingsTemperature,
            _ => Self::BuildingsStructure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subcategory_points_back_to_its_category() {
        for category in Category::ALL {
            for sub in category.subcategories() {
                assert_eq!(sub.category(), category, "{:?}", sub);
            }
        }
    }

    #[test]
    fn test_subcategory_count() {
        let total: usize = Category::ALL.iter().map(|c| c.subcategories().len()).sum();
        assert_eq!(total, 29);
    }

    #[test]
    fn test_design_group_mapping() {
        assert_eq!(
            Subcategory::from_design_group(Some("Production")),
            Subcategory::BuildingsProduction
        );
        assert_eq!(
            Subcategory::from_design_group(Some("Joy")),
            Subcategory::BuildingsRecreation
        );
        assert_eq!(
            Subcategory::from_design_group(Some("Floors")),
            Subcategory::BuildingsStructure
        );
        assert_eq!(Subcategory::from_design_group(None), Subcategory::BuildingsStructure);
    }
}
