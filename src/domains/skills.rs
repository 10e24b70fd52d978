//! A pawn's skills: level and passion per skill, description on demand.

use crate::nav::{LevelKind, MenuDomain};
use crate::world::EntityId;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Passion {
    #[default]
    None,
    Minor,
    Major,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: u8,
    #[serde(default)]
    pub passion: Passion,
    /// Incapable of this kind of work
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub description: String,
}

pub trait SkillSource {
    fn skills(&self, pawn: EntityId) -> Result<Vec<Skill>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkillEntry {
    Skill(Skill),
    Description(String),
}

pub struct SkillsMenu {
    pawn: EntityId,
    source: Rc<dyn SkillSource>,
}

impl SkillsMenu {
    pub fn new(pawn: EntityId, source: Rc<dyn SkillSource>) -> Self {
        Self { pawn, source }
    }
}

fn skill_label(skill: &Skill) -> String {
    if skill.disabled {
        return format!("{}: disabled", skill.name);
    }
    match skill.passion {
        Passion::None => format!("{}: {}", skill.name, skill.level),
        Passion::Minor => format!("{}: {}, interested", skill.name, skill.level),
        Passion::Major => format!("{}: {}, burning passion", skill.name, skill.level),
    }
}

impl MenuDomain for SkillsMenu {
    type Entry = SkillEntry;

    fn name(&self) -> &str {
        "Skills"
    }

    fn build(&mut self, path: &[SkillEntry]) -> Result<Vec<SkillEntry>> {
        Ok(match path {
            [] => self
                .source
                .skills(self.pawn)?
                .into_iter()
                .map(SkillEntry::Skill)
                .collect(),
            [SkillEntry::Skill(skill)] if !skill.description.is_empty() => {
                vec![SkillEntry::Description(skill.description.clone())]
            }
            _ => Vec::new(),
        })
    }

    fn label(&self, entry: &SkillEntry) -> String {
        match entry {
            SkillEntry::Skill(skill) => skill_label(skill),
            SkillEntry::Description(text) => text.clone(),
        }
    }

    fn has_children(&self, entry: &SkillEntry) -> bool {
        matches!(entry, SkillEntry::Skill(skill) if !skill.description.is_empty())
    }

    fn level_kind(&self, path: &[SkillEntry]) -> LevelKind {
        if path.is_empty() {
            LevelKind::List
        } else {
            LevelKind::Detail
        }
    }
}
