//! Generic hierarchical menu engine.
//!
//! A [`Navigator`] is a stack of levels. Each level holds the entries its
//! builder produced, the selected index, and the entry that was drilled into
//! to reach it. Domains only supply builders and leaf actions through
//! [`MenuDomain`]; the stack discipline, wraparound, clamping, error
//! containment and announcements all live here.

use super::announcer::{self, AnnounceView, Hints, LevelKind};
use super::stack::ActiveNavigator;
use crate::core::input_result::{Cue, InputResult};
use crate::core::menu_actions::NavCommand;
use anyhow::Result;

pub const NOTHING_TO_SHOW: &str = "Nothing to show.";
pub const EMPTY: &str = "Empty.";
pub const NOT_ADJUSTABLE: &str = "Cannot adjust this.";

/// What a leaf action wants the engine to do next
pub enum LeafOutcome {
    /// Non-destructive: rebuild the current level and announce it
    Stay { message: Option<String> },
    /// Consuming: pop this many levels, rebuild, announce the parent
    Return {
        levels: usize,
        message: Option<String>,
    },
    /// Terminal: close the whole menu
    Close { message: Option<String> },
    /// Hand input over to another navigator; this one closes first
    Delegate(Box<dyn ActiveNavigator>),
}

impl LeafOutcome {
    pub fn stay(message: impl Into<String>) -> Self {
        Self::Stay {
            message: Some(message.into()),
        }
    }

    pub fn back(message: impl Into<String>) -> Self {
        Self::Return {
            levels: 1,
            message: Some(message.into()),
        }
    }

    pub fn close(message: impl Into<String>) -> Self {
        Self::Close {
            message: Some(message.into()),
        }
    }
}

/// One domain's builders and actions.
///
/// `path` arguments list the entries selected at each level from the root
/// down. `build(&[])` produces the root list; `build(&[a, b])` the list you
/// reach by drilling into `a` then `b`.
pub trait MenuDomain {
    type Entry: Clone;

    /// Spoken name, used in "closed" notices
    fn name(&self) -> &str;

    /// Builder for the level reached through `path`
    fn build(&mut self, path: &[Self::Entry]) -> Result<Vec<Self::Entry>>;

    fn label(&self, entry: &Self::Entry) -> String;

    /// Whether drilling into `entry` opens a level instead of running an action
    fn has_children(&self, entry: &Self::Entry) -> bool;

    /// Run the leaf at the end of `path`
    fn activate(&mut self, _path: &[Self::Entry]) -> Result<LeafOutcome> {
        Ok(LeafOutcome::Stay { message: None })
    }

    fn is_adjustable(&self, _entry: &Self::Entry) -> bool {
        false
    }

    /// Change the value at the end of `path` by `delta`
    fn adjust(&mut self, _path: &[Self::Entry], _delta: i32) -> Result<LeafOutcome> {
        anyhow::bail!(NOT_ADJUSTABLE)
    }

    /// Presentation of the level reached through `path`
    fn level_kind(&self, _path: &[Self::Entry]) -> LevelKind {
        LevelKind::List
    }
}

struct Level<E> {
    entries: Vec<E>,
    selected: usize,
    /// Entry drilled into to reach this level (None at the root)
    parent: Option<E>,
    kind: LevelKind,
}

impl<E> Level<E> {
    fn clamp(&mut self) {
        if self.entries.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.entries.len() {
            self.selected = self.entries.len() - 1;
        }
    }
}

/// Stack-based navigator over one [`MenuDomain`]
pub struct Navigator<D: MenuDomain> {
    domain: D,
    levels: Vec<Level<D::Entry>>,
    hints: Hints,
}

impl<D: MenuDomain> Navigator<D> {
    pub fn new(domain: D) -> Self {
        Self {
            domain,
            levels: Vec::new(),
            hints: Hints::default(),
        }
    }

    pub fn with_hints(mut self, hints: Hints) -> Self {
        self.hints = hints;
        self
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    pub fn domain_mut(&mut self) -> &mut D {
        &mut self.domain
    }

    pub fn is_open(&self) -> bool {
        !self.levels.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Selected index of the current level
    pub fn selected_index(&self) -> Option<usize> {
        let level = self.levels.last()?;
        (!level.entries.is_empty()).then_some(level.selected)
    }

    /// Entries of the current level
    pub fn entries(&self) -> &[D::Entry] {
        self.levels.last().map(|l| l.entries.as_slice()).unwrap_or(&[])
    }

    pub fn selected(&self) -> Option<&D::Entry> {
        let level = self.levels.last()?;
        level.entries.get(level.selected)
    }

    /// Entries drilled into to reach the current level
    pub fn path(&self) -> Vec<D::Entry> {
        self.levels.iter().filter_map(|l| l.parent.clone()).collect()
    }

    fn selection_path(&self) -> Option<Vec<D::Entry>> {
        let mut path = self.path();
        path.push(self.selected()?.clone());
        Some(path)
    }

    /// Build the root level. Stays closed when there is nothing to show.
    pub fn open(&mut self) -> InputResult {
        let entries = match self.domain.build(&[]) {
            Ok(entries) => entries,
            Err(e) => return self.failure("open", e),
        };
        if entries.is_empty() {
            tracing::debug!("{}: nothing to show", self.domain.name());
            return InputResult::reject(NOTHING_TO_SHOW);
        }

        let kind = self.domain.level_kind(&[]);
        self.levels.clear();
        self.levels.push(Level {
            entries,
            selected: 0,
            parent: None,
            kind,
        });
        tracing::debug!("{} opened", self.domain.name());
        self.announcement(Cue::Click)
    }

    pub fn select_next(&mut self) -> InputResult {
        self.rotate(true)
    }

    pub fn select_previous(&mut self) -> InputResult {
        self.rotate(false)
    }

    fn rotate(&mut self, forward: bool) -> InputResult {
        let Some(level) = self.levels.last_mut() else {
            return InputResult::ignored();
        };
        let count = level.entries.len();
        if count == 0 {
            return InputResult::ignored();
        }
        level.selected = if forward {
            (level.selected + 1) % count
        } else {
            (level.selected + count - 1) % count
        };
        self.announcement(Cue::Move)
    }

    pub fn drill_down(&mut self) -> InputResult {
        let Some(selected) = self.selected().cloned() else {
            return InputResult::ignored();
        };
        let Some(path) = self.selection_path() else {
            return InputResult::ignored();
        };

        if !self.domain.has_children(&selected) {
            return match self.domain.activate(&path) {
                Ok(outcome) => self.apply(outcome),
                Err(e) => self.failure("activate", e),
            };
        }

        let entries = match self.domain.build(&path) {
            Ok(entries) => entries,
            Err(e) => return self.failure("build", e),
        };
        if entries.is_empty() {
            return InputResult::reject(EMPTY);
        }

        let kind = self.domain.level_kind(&path);
        self.levels.push(Level {
            entries,
            selected: 0,
            parent: Some(selected),
            kind,
        });
        self.announcement(Cue::Click)
    }

    pub fn go_back(&mut self) -> InputResult {
        if self.levels.pop().is_none() {
            return InputResult::ignored();
        }
        if self.levels.is_empty() {
            tracing::debug!("{} closed", self.domain.name());
            return InputResult::closed(Some(format!("{} closed.", self.domain.name())));
        }
        self.announcement(Cue::Click)
    }

    pub fn close(&mut self) -> InputResult {
        let was_open = self.is_open();
        self.levels.clear();
        if was_open {
            tracing::debug!("{} closed", self.domain.name());
        }
        InputResult::closed(Some(format!("{} closed.", self.domain.name())))
    }

    pub fn adjust(&mut self, delta: i32) -> InputResult {
        let Some(selected) = self.selected() else {
            return InputResult::ignored();
        };
        if !self.domain.is_adjustable(selected) {
            return InputResult::reject(NOT_ADJUSTABLE);
        }
        let Some(path) = self.selection_path() else {
            return InputResult::ignored();
        };
        match self.domain.adjust(&path, delta) {
            Ok(outcome) => self.apply(outcome),
            Err(e) => self.failure("adjust", e),
        }
    }

    /// Current announcement, if open
    pub fn announce(&self) -> Option<String> {
        let level = self.levels.last()?;
        let entry = level.entries.get(level.selected)?;
        let label = self.domain.label(entry);
        let view = AnnounceView {
            kind: level.kind,
            label: &label,
            position: level.selected,
            count: level.entries.len(),
            has_children: self.domain.has_children(entry),
            adjustable: self.domain.is_adjustable(entry),
        };
        Some(announcer::render(&view, &self.hints))
    }

    pub fn handle(&mut self, command: NavCommand) -> InputResult {
        match command {
            NavCommand::Next => self.select_next(),
            NavCommand::Previous => self.select_previous(),
            NavCommand::DrillDown => self.drill_down(),
            NavCommand::GoBack => self.go_back(),
            NavCommand::Close => self.close(),
            NavCommand::Adjust(delta) => self.adjust(delta),
            NavCommand::Repeat => match self.announce() {
                Some(text) => InputResult::announce(text, Cue::Click),
                None => InputResult::ignored(),
            },
        }
    }

    fn apply(&mut self, outcome: LeafOutcome) -> InputResult {
        match outcome {
            LeafOutcome::Stay { message } => self.refresh().with_prefix(message),
            LeafOutcome::Return { levels, message } => {
                let keep = self.levels.len().saturating_sub(levels).max(1);
                self.levels.truncate(keep);
                self.refresh().with_prefix(message)
            }
            LeafOutcome::Close { message } => {
                self.levels.clear();
                tracing::debug!("{} finished", self.domain.name());
                InputResult::closed(message)
            }
            LeafOutcome::Delegate(target) => {
                tracing::debug!("{} hands off to {}", self.domain.name(), target.name());
                self.levels.clear();
                InputResult::handoff(target)
            }
        }
    }

    /// Re-run the current level's builder after a mutating action.
    ///
    /// The selection is clamped if the list shrank; levels that became empty
    /// are popped, and the navigator closes if even the root is empty.
    fn refresh(&mut self) -> InputResult {
        while !self.levels.is_empty() {
            let depth = self.levels.len();
            let path = self.path();

            match self.domain.build(&path) {
                Ok(entries) if entries.is_empty() => {
                    self.levels.pop();
                    if depth == 1 {
                        return InputResult::closed(Some(NOTHING_TO_SHOW.to_string()));
                    }
                }
                Ok(entries) => {
                    if let Some(level) = self.levels.last_mut() {
                        level.entries = entries;
                        level.clamp();
                    }
                    break;
                }
                Err(e) => {
                    // Keep the stale list; the action itself already happened
                    tracing::warn!("{}: refresh failed: {:#}", self.domain.name(), e);
                    break;
                }
            }
        }
        self.announcement(Cue::Click)
    }

    fn announcement(&self, cue: Cue) -> InputResult {
        match self.announce() {
            Some(text) => InputResult::announce(text, cue),
            None => InputResult::ignored(),
        }
    }

    /// Collaborator failure: log, tell the user, leave state alone
    fn failure(&self, what: &str, error: anyhow::Error) -> InputResult {
        tracing::warn!("{}: {} failed: {:#}", self.domain.name(), what, error);
        InputResult::reject(format!("{}", error))
    }
}

impl<D: MenuDomain + 'static> ActiveNavigator for Navigator<D> {
    fn name(&self) -> &str {
        self.domain.name()
    }

    fn open(&mut self) -> InputResult {
        Navigator::open(self)
    }

    fn handle(&mut self, command: NavCommand) -> InputResult {
        Navigator::handle(self, command)
    }

    fn is_open(&self) -> bool {
        Navigator::is_open(self)
    }

    fn depth(&self) -> usize {
        Navigator::depth(self)
    }

    fn announce(&self) -> Option<String> {
        Navigator::announce(self)
    }
}
