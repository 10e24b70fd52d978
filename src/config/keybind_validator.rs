//! Navigation keybind validator
//!
//! Critical commands must have a key, and no key may trigger two commands.

use super::NavKeybinds;
use crate::core::menu_actions::normalize_keybind;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    MissingCriticalBinding {
        command: String,
        field: String,
        default: String,
    },
    DuplicateBinding {
        keybind: String,
        fields: Vec<String>,
    },
}

impl ValidationIssue {
    pub fn severity(&self) -> ValidationSeverity {
        match self {
            ValidationIssue::MissingCriticalBinding { .. } => ValidationSeverity::Error,
            ValidationIssue::DuplicateBinding { .. } => ValidationSeverity::Warning,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ValidationIssue::MissingCriticalBinding {
                command,
                field,
                default,
            } => format!(
                "'{}' has no key! Field '{}' is empty. Default: {}",
                command, field, default
            ),
            ValidationIssue::DuplicateBinding { keybind, fields } => format!(
                "Key '{}' is bound to several commands: {}",
                keybind,
                fields.join(", ")
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity() == ValidationSeverity::Error)
    }

    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity() == ValidationSeverity::Error)
            .collect()
    }

    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity() == ValidationSeverity::Warning)
            .collect()
    }
}

/// Without these a user could get stuck inside a menu
fn critical(keybinds: &NavKeybinds) -> [(&'static str, &'static str, &str, &'static str); 4] {
    [
        ("Next", "next", keybinds.next.as_str(), "Down"),
        ("Previous", "previous", keybinds.previous.as_str(), "Up"),
        ("Open or select", "drill_down", keybinds.drill_down.as_str(), "Enter"),
        ("Go back", "go_back", keybinds.go_back.as_str(), "Esc"),
    ]
}

pub fn validate_keybinds(keybinds: &NavKeybinds) -> ValidationResult {
    let mut issues = Vec::new();

    for (command, field, value, default) in critical(keybinds) {
        if value.trim().is_empty() {
            issues.push(ValidationIssue::MissingCriticalBinding {
                command: command.to_string(),
                field: field.to_string(),
                default: default.to_string(),
            });
        }
    }

    check_duplicates(&mut issues, keybinds);
    ValidationResult { issues }
}

fn check_duplicates(issues: &mut Vec<ValidationIssue>, keybinds: &NavKeybinds) {
    // Sorted so reports come out in a stable order
    let mut keybind_map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let fields = [
        ("next", &keybinds.next),
        ("previous", &keybinds.previous),
        ("drill_down", &keybinds.drill_down),
        ("go_back", &keybinds.go_back),
        ("close", &keybinds.close),
        ("increase", &keybinds.increase),
        ("decrease", &keybinds.decrease),
        ("increase_more", &keybinds.increase_more),
        ("decrease_more", &keybinds.decrease_more),
        ("repeat", &keybinds.repeat),
    ];
    for (field, keybind) in fields {
        if !keybind.trim().is_empty() {
            keybind_map
                .entry(normalize_keybind(keybind))
                .or_default()
                .push(field.to_string());
        }
    }

    for (keybind, fields) in keybind_map {
        if fields.len() > 1 {
            issues.push(ValidationIssue::DuplicateBinding { keybind, fields });
        }
    }
}

/// Restore defaults for empty critical bindings; returns how many were fixed
pub fn auto_fix_keybinds(keybinds: &mut NavKeybinds, issues: &[ValidationIssue]) -> usize {
    let mut fixed_count = 0;

    for issue in issues {
        if let ValidationIssue::MissingCriticalBinding { field, default, .. } = issue {
            let slot = match field.as_str() {
                "next" => &mut keybinds.next,
                "previous" => &mut keybinds.previous,
                "drill_down" => &mut keybinds.drill_down,
                "go_back" => &mut keybinds.go_back,
                _ => continue,
            };
            *slot = default.clone();
            fixed_count += 1;
        }
    }

    fixed_count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keybinds() {
        let result = validate_keybinds(&NavKeybinds::default());
        assert!(result.is_valid());
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn test_missing_critical_binding() {
        let mut keybinds = NavKeybinds::default();
        keybinds.go_back = String::new();

        let result = validate_keybinds(&keybinds);
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_duplicates_compare_normalized() {
        let mut keybinds = NavKeybinds::default();
        keybinds.close = "escape".to_string();

        let result = validate_keybinds(&keybinds);
        assert!(result.is_valid());
        let warnings = result.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message().contains("go_back, close"));
    }

    #[test]
    fn test_auto_fix() {
        let mut keybinds = NavKeybinds::default();
        keybinds.go_back = String::new();
        keybinds.next = " ".to_string();

        let result = validate_keybinds(&keybinds);
        assert_eq!(result.errors().len(), 2);

        let fixed = auto_fix_keybinds(&mut keybinds, &result.issues);
        assert_eq!(fixed, 2);
        assert_eq!(keybinds.go_back, "Esc");
        assert_eq!(keybinds.next, "Down");
        assert!(validate_keybinds(&keybinds).is_valid());
    }
}
