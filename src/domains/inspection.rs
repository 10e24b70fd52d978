//! Object inspection at the cursor.
//!
//! Objects → info sections → read-only lines. A pawn's Gear, Skills and
//! Character sections are full menus of their own, so selecting one hands
//! input over to that navigator.

use super::character::CharacterMenu;
use super::gear::GearMenu;
use super::skills::SkillsMenu;
use super::PawnServices;
use crate::format;
use crate::nav::{Hints, LeafOutcome, MenuDomain, Navigator};
use crate::world::{EntityId, EntityKind, EntitySnapshot, GridPos, WorldSnapshot};
use anyhow::{Context, Result};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct InspectTarget {
    pub id: EntityId,
    pub label: String,
    pub is_pawn: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InspectSection {
    Overview,
    Health,
    Needs,
    Gear,
    Skills,
    Character,
}

impl InspectSection {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Health => "Health",
            Self::Needs => "Needs",
            Self::Gear => "Gear",
            Self::Skills => "Skills",
            Self::Character => "Character",
        }
    }

    /// Sections backed by their own navigator
    pub fn delegates(&self) -> bool {
        matches!(self, Self::Gear | Self::Skills | Self::Character)
    }
}

pub trait InspectSource {
    fn objects_at(&self, pos: GridPos) -> Result<Vec<InspectTarget>>;
    fn lines(&self, target: &InspectTarget, section: InspectSection) -> Result<Vec<String>>;
}

/// Snapshots answer from their own entity list: every visible entity on the
/// cell, pawns first.
impl InspectSource for WorldSnapshot {
    fn objects_at(&self, pos: GridPos) -> Result<Vec<InspectTarget>> {
        let mut objects: Vec<InspectTarget> = self
            .entities
            .iter()
            .filter(|e| e.pos == pos && !e.fogged)
            .map(|e| InspectTarget {
                id: e.id,
                label: format::entity_label(e),
                is_pawn: e.is_pawn(),
            })
            .collect();
        objects.sort_by_key(|o| !o.is_pawn);
        Ok(objects)
    }

    fn lines(&self, target: &InspectTarget, section: InspectSection) -> Result<Vec<String>> {
        let entity = self
            .entities
            .iter()
            .find(|e| e.id == target.id)
            .with_context(|| format!("{} is gone", target.label))?;
        Ok(match section {
            InspectSection::Overview => overview_lines(entity),
            InspectSection::Health => entity
                .hit_points
                .map(|(current, max)| vec![format!("Health: {} of {}", current, max)])
                .unwrap_or_default(),
            _ => Vec::new(),
        })
    }
}

fn overview_lines(entity: &EntitySnapshot) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", entity.label, entity.def_name)];
    if let Some(faction) = &entity.faction {
        lines.push(format!("Faction: {}", faction));
    }
    if let Some(stuff) = &entity.stuff {
        lines.push(format!("Made of {}", stuff));
    }
    if let Some(quality) = entity.quality {
        lines.push(format!("Quality: {}", quality.display_name()));
    }
    if !entity.is_pawn() {
        if let Some((current, max)) = entity.hit_points {
            lines.push(format!("Hit points: {} of {}", current, max));
        }
    }
    match &entity.kind {
        EntityKind::Item(item) if item.forbidden => lines.push("Forbidden".to_string()),
        EntityKind::Plant(plant) if plant.blighted => lines.push("Blighted".to_string()),
        EntityKind::Plant(plant) if plant.harvestable_now => {
            lines.push(format!("Ready to harvest, yield {}", plant.harvest_yield))
        }
        EntityKind::Pawn(pawn) if pawn.hostile => lines.push("Hostile".to_string()),
        _ => {}
    }
    lines
}

#[derive(Debug, Clone, PartialEq)]
pub enum InspectEntry {
    Object(InspectTarget),
    Section(InspectSection),
    Line(String),
}

pub struct InspectionMenu {
    pos: GridPos,
    source: Rc<dyn InspectSource>,
    pawns: Option<PawnServices>,
    hints: Hints,
}

impl InspectionMenu {
    pub fn new(pos: GridPos, source: Rc<dyn InspectSource>) -> Self {
        Self {
            pos,
            source,
            pawns: None,
            hints: Hints::default(),
        }
    }

    /// Enable the pawn sub-menus
    pub fn with_pawn_services(mut self, services: PawnServices) -> Self {
        self.pawns = Some(services);
        self
    }

    /// Hints passed on to delegated navigators
    pub fn with_hints(mut self, hints: Hints) -> Self {
        self.hints = hints;
        self
    }

    fn sections(&self, target: &InspectTarget) -> Vec<InspectSection> {
        if !target.is_pawn {
            return vec![InspectSection::Overview];
        }
        let mut sections = vec![
            InspectSection::Overview,
            InspectSection::Health,
            InspectSection::Needs,
        ];
        if self.pawns.is_some() {
            sections.extend([
                InspectSection::Gear,
                InspectSection::Skills,
                InspectSection::Character,
            ]);
        }
        sections
    }
}

impl MenuDomain for InspectionMenu {
    type Entry = InspectEntry;

    fn name(&self) -> &str {
        "Inspection"
    }

    fn build(&mut self, path: &[InspectEntry]) -> Result<Vec<InspectEntry>> {
        Ok(match path {
            [] => self
                .source
                .objects_at(self.pos)?
                .into_iter()
                .map(InspectEntry::Object)
                .collect(),
            [InspectEntry::Object(target)] => self
                .sections(target)
                .into_iter()
                .map(InspectEntry::Section)
                .collect(),
            [InspectEntry::Object(target), InspectEntry::Section(section)] => self
                .source
                .lines(target, *section)?
                .into_iter()
                .map(InspectEntry::Line)
                .collect(),
            _ => Vec::new(),
        })
    }

    fn label(&self, entry: &InspectEntry) -> String {
        match entry {
            InspectEntry::Object(target) => target.label.clone(),
            InspectEntry::Section(section) => section.display_name().to_string(),
            InspectEntry::Line(text) => text.clone(),
        }
    }

    fn has_children(&self, entry: &InspectEntry) -> bool {
        match entry {
            InspectEntry::Object(_) => true,
            InspectEntry::Section(section) => !section.delegates(),
            InspectEntry::Line(_) => false,
        }
    }

    fn activate(&mut self, path: &[InspectEntry]) -> Result<LeafOutcome> {
        let [InspectEntry::Object(target), InspectEntry::Section(section)] = path else {
            return Ok(LeafOutcome::Stay { message: None });
        };
        let services = self
            .pawns
            .as_ref()
            .context("No pawn details available")?;
        let hints = self.hints.clone();

        let target: Box<dyn crate::nav::ActiveNavigator> = match section {
            InspectSection::Gear => Box::new(
                Navigator::new(GearMenu::new(target.id, services.gear.clone())).with_hints(hints),
            ),
            InspectSection::Skills => Box::new(
                Navigator::new(SkillsMenu::new(target.id, services.skills.clone()))
                    .with_hints(hints),
            ),
            InspectSection::Character => Box::new(
                Navigator::new(CharacterMenu::new(target.id, services.character.clone()))
                    .with_hints(hints),
            ),
            _ => return Ok(LeafOutcome::Stay { message: None }),
        };
        Ok(LeafOutcome::Delegate(target))
    }
}
