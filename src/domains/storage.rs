//! Storage settings: priority plus the allowed-things filter tree.
//!
//! The filter tree can be arbitrarily deep. Every category level starts with
//! a "toggle all" entry; leaves toggle a single thing.

use crate::nav::{LeafOutcome, MenuDomain};
use anyhow::{Context, Result};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StoragePriority {
    Low,
    Normal,
    Preferred,
    Important,
    Critical,
}

impl StoragePriority {
    const ORDER: [StoragePriority; 5] = [
        StoragePriority::Low,
        StoragePriority::Normal,
        StoragePriority::Preferred,
        StoragePriority::Important,
        StoragePriority::Critical,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::Preferred => "preferred",
            Self::Important => "important",
            Self::Critical => "critical",
        }
    }

    /// Step through the priorities, stopping at either end
    pub fn step(self, delta: i32) -> Self {
        let index = Self::ORDER.iter().position(|p| *p == self).unwrap_or(1) as i64;
        let last = (Self::ORDER.len() - 1) as i64;
        Self::ORDER[(index + i64::from(delta)).clamp(0, last) as usize]
    }
}

/// Node of the host's thing filter; nodes without children are single things
#[derive(Debug, Clone, PartialEq)]
pub struct FilterNode {
    pub id: String,
    pub label: String,
    pub children: Vec<FilterNode>,
}

impl FilterNode {
    pub fn is_category(&self) -> bool {
        !self.children.is_empty()
    }

    /// Ids of every single thing below (or at) this node
    pub fn leaf_ids(&self) -> Vec<&str> {
        if !self.is_category() {
            return vec![self.id.as_str()];
        }
        self.children.iter().flat_map(|c| c.leaf_ids()).collect()
    }
}

pub trait StorageSettings {
    fn name(&self) -> String;
    fn priority(&self) -> Result<StoragePriority>;
    fn set_priority(&self, priority: StoragePriority) -> Result<()>;
    fn filter_tree(&self) -> Result<Vec<FilterNode>>;
    fn is_allowed(&self, thing: &str) -> bool;
    fn set_allowed(&self, thing: &str, allowed: bool) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageEntry {
    Priority,
    /// Toggle everything in the category with this id
    ToggleAll(String),
    Filter(FilterNode),
}

pub struct StorageMenu {
    settings: Rc<dyn StorageSettings>,
    name: String,
}

impl StorageMenu {
    pub fn new(settings: Rc<dyn StorageSettings>) -> Self {
        let name = format!("{} storage", settings.name());
        Self { settings, name }
    }

    /// Look `id` up in a freshly read tree
    fn find(&self, id: &str) -> Result<FilterNode> {
        fn walk<'a>(nodes: &'a [FilterNode], id: &str) -> Option<&'a FilterNode> {
            nodes.iter().find_map(|node| {
                if node.id == id {
                    Some(node)
                } else {
                    walk(&node.children, id)
                }
            })
        }
        let tree = self.settings.filter_tree()?;
        walk(&tree, id)
            .cloned()
            .with_context(|| format!("{} is no longer in the filter", id))
    }

    fn allowance(&self, node: &FilterNode) -> &'static str {
        let leaves = node.leaf_ids();
        let allowed = leaves.iter().filter(|id| self.settings.is_allowed(id)).count();
        if allowed == 0 {
            "none allowed"
        } else if allowed == leaves.len() {
            "all allowed"
        } else {
            "some allowed"
        }
    }

    fn toggle(&self, node: &FilterNode) -> Result<String> {
        let leaves = node.leaf_ids();
        let allow = !leaves.iter().all(|id| self.settings.is_allowed(id));
        let mut changed: Vec<&str> = Vec::new();
        for id in &leaves {
            let before = self.settings.is_allowed(id);
            if before == allow {
                continue;
            }
            if let Err(e) = self.settings.set_allowed(id, allow) {
                // All or nothing: put back what already flipped
                for done in changed.iter().rev() {
                    if let Err(undo) = self.settings.set_allowed(done, !allow) {
                        tracing::warn!("Storage: could not restore {}: {:#}", done, undo);
                    }
                }
                return Err(e);
            }
            changed.push(*id);
        }
        tracing::debug!(
            "Storage: {} {} things under {}",
            allowed_word(allow),
            leaves.len(),
            node.id
        );
        Ok(format!("{} {}.", node.label, allowed_word(allow)))
    }
}

impl MenuDomain for StorageMenu {
    type Entry = StorageEntry;

    fn name(&self) -> &str {
        &self.name
    }

    fn build(&mut self, path: &[StorageEntry]) -> Result<Vec<StorageEntry>> {
        match path.last() {
            None => {
                let mut entries = vec![StorageEntry::Priority];
                entries.extend(
                    self.settings
                        .filter_tree()?
                        .into_iter()
                        .map(StorageEntry::Filter),
                );
                Ok(entries)
            }
            Some(StorageEntry::Filter(node)) if node.is_category() => {
                let node = self.find(&node.id)?;
                let mut entries = vec![StorageEntry::ToggleAll(node.id.clone())];
                entries.extend(node.children.into_iter().map(StorageEntry::Filter));
                Ok(entries)
            }
            _ => Ok(Vec::new()),
        }
    }

    fn label(&self, entry: &StorageEntry) -> String {
        match entry {
            StorageEntry::Priority => match self.settings.priority() {
                Ok(priority) => format!("Priority: {}", priority.display_name()),
                Err(_) => "Priority".to_string(),
            },
            StorageEntry::ToggleAll(id) => match self.find(id) {
                Ok(node) => format!("Toggle all, {}", self.allowance(&node)),
                Err(_) => "Toggle all".to_string(),
            },
            StorageEntry::Filter(node) if node.is_category() => {
                format!("{}, {}", node.label, self.allowance(node))
            }
            StorageEntry::Filter(node) => format!(
                "{}, {}",
                node.label,
                allowed_word(self.settings.is_allowed(&node.id))
            ),
        }
    }

    fn has_children(&self, entry: &StorageEntry) -> bool {
        matches!(entry, StorageEntry::Filter(node) if node.is_category())
    }

    fn is_adjustable(&self, entry: &StorageEntry) -> bool {
        matches!(entry, StorageEntry::Priority)
    }

    fn adjust(&mut self, path: &[StorageEntry], delta: i32) -> Result<LeafOutcome> {
        if path.last() != Some(&StorageEntry::Priority) {
            anyhow::bail!(crate::nav::engine::NOT_ADJUSTABLE);
        }
        let priority = self.settings.priority()?.step(delta);
        self.settings.set_priority(priority)?;
        Ok(LeafOutcome::Stay { message: None })
    }

    fn activate(&mut self, path: &[StorageEntry]) -> Result<LeafOutcome> {
        let message = match path.last() {
            Some(StorageEntry::ToggleAll(id)) => self.toggle(&self.find(id)?)?,
            Some(StorageEntry::Filter(node)) => {
                let allow = !self.settings.is_allowed(&node.id);
                self.settings.set_allowed(&node.id, allow)?;
                format!("{} {}.", node.label, allowed_word(allow))
            }
            _ => return Ok(LeafOutcome::Stay { message: None }),
        };
        Ok(LeafOutcome::stay(message))
    }
}

fn allowed_word(allowed: bool) -> &'static str {
    if allowed {
        "allowed"
    } else {
        "disallowed"
    }
}
