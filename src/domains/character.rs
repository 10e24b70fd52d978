//! Character sheet: backstory, traits, incapabilities and stats, each a list
//! of lines with optional explanations.

use crate::nav::{LevelKind, MenuDomain};
use crate::world::EntityId;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetSection {
    Overview,
    Backstory,
    Traits,
    Incapabilities,
    Stats,
}

impl SheetSection {
    pub const ALL: [SheetSection; 5] = [
        SheetSection::Overview,
        SheetSection::Backstory,
        SheetSection::Traits,
        SheetSection::Incapabilities,
        SheetSection::Stats,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Backstory => "Backstory",
            Self::Traits => "Traits",
            Self::Incapabilities => "Incapable of",
            Self::Stats => "Stats",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLine {
    pub text: String,
    #[serde(default)]
    pub detail: Option<String>,
}

pub trait CharacterSource {
    fn section(&self, pawn: EntityId, section: SheetSection) -> Result<Vec<SheetLine>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum CharacterEntry {
    Section(SheetSection),
    Line(SheetLine),
    Detail(String),
}

pub struct CharacterMenu {
    pawn: EntityId,
    source: Rc<dyn CharacterSource>,
}

impl CharacterMenu {
    pub fn new(pawn: EntityId, source: Rc<dyn CharacterSource>) -> Self {
        Self { pawn, source }
    }
}

impl MenuDomain for CharacterMenu {
    type Entry = CharacterEntry;

    fn name(&self) -> &str {
        "Character"
    }

    fn build(&mut self, path: &[CharacterEntry]) -> Result<Vec<CharacterEntry>> {
        Ok(match path {
            [] => SheetSection::ALL
                .iter()
                .copied()
                .map(CharacterEntry::Section)
                .collect(),
            [CharacterEntry::Section(section)] => self
                .source
                .section(self.pawn, *section)?
                .into_iter()
                .map(CharacterEntry::Line)
                .collect(),
            [_, CharacterEntry::Line(SheetLine {
                detail: Some(detail),
                ..
            })] => vec![CharacterEntry::Detail(detail.clone())],
            _ => Vec::new(),
        })
    }

    fn label(&self, entry: &CharacterEntry) -> String {
        match entry {
            CharacterEntry::Section(section) => section.display_name().to_string(),
            CharacterEntry::Line(line) => line.text.clone(),
            CharacterEntry::Detail(text) => text.clone(),
        }
    }

    fn has_children(&self, entry: &CharacterEntry) -> bool {
        match entry {
            CharacterEntry::Section(_) => true,
            CharacterEntry::Line(line) => line.detail.is_some(),
            CharacterEntry::Detail(_) => false,
        }
    }

    fn level_kind(&self, path: &[CharacterEntry]) -> LevelKind {
        match path.last() {
            Some(CharacterEntry::Line(_)) => LevelKind::Detail,
            _ => LevelKind::List,
        }
    }
}
