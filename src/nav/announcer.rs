//! Turns navigator state into the one line a screen reader speaks.
//!
//! Always: the selection's label, then "N of M" when there is more than one
//! entry, then the commands available from here. Detail views drop the
//! position and only offer "go back".

use crate::format;

/// How a level is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelKind {
    /// Selectable entries
    #[default]
    List,
    /// Long read-only text
    Detail,
}

/// Key names spoken in the instruction line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hints {
    pub next: String,
    pub previous: String,
    pub drill_down: String,
    pub go_back: String,
    pub increase: String,
    pub decrease: String,
}

impl Default for Hints {
    fn default() -> Self {
        Self {
            next: "Down".to_string(),
            previous: "Up".to_string(),
            drill_down: "Enter".to_string(),
            go_back: "Escape".to_string(),
            increase: "Right".to_string(),
            decrease: "Left".to_string(),
        }
    }
}

/// Snapshot of the current level, enough to render an announcement
#[derive(Debug, Clone)]
pub struct AnnounceView<'a> {
    pub kind: LevelKind,
    pub label: &'a str,
    /// Zero-based selection
    pub position: usize,
    pub count: usize,
    pub has_children: bool,
    pub adjustable: bool,
}

pub fn render(view: &AnnounceView<'_>, hints: &Hints) -> String {
    let mut out = sentence(view.label);

    if view.kind == LevelKind::Detail {
        out.push_str(&format!(" {} to go back.", hints.go_back));
        return out;
    }

    if view.count > 1 {
        out.push_str(&format!(" {} of {}.", view.position + 1, view.count));
    }

    let mut commands = Vec::new();
    if view.count > 1 {
        commands.push(format!(
            "{} to move",
            format::key_pair(&hints.previous, &hints.next)
        ));
    }
    if view.has_children {
        commands.push(format!("{} to open", hints.drill_down));
    } else {
        commands.push(format!("{} to select", hints.drill_down));
    }
    if view.adjustable {
        commands.push(format!(
            "{} to adjust",
            format::key_pair(&hints.decrease, &hints.increase)
        ));
    }
    commands.push(format!("{} to go back", hints.go_back));

    out.push(' ');
    out.push_str(&commands.join(", "));
    out.push('.');
    out
}

/// Terminate with a period unless the text already ends a sentence
fn sentence(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(label: &str, position: usize, count: usize) -> AnnounceView<'_> {
        AnnounceView {
            kind: LevelKind::List,
            label,
            position,
            count,
            has_children: true,
            adjustable: false,
        }
    }

    #[test]
    fn test_list_with_position() {
        let text = render(&view("Buildings, 4 entries", 1, 3), &Hints::default());
        assert_eq!(
            text,
            "Buildings, 4 entries. 2 of 3. Up and Down to move, Enter to open, Escape to go back."
        );
    }

    #[test]
    fn test_single_entry_has_no_position() {
        let mut v = view("Steel", 0, 1);
        v.has_children = false;
        let text = render(&v, &Hints::default());
        assert_eq!(text, "Steel. Enter to select, Escape to go back.");
    }

    #[test]
    fn test_adjustable_entry() {
        let mut v = view("Max males: 4", 0, 2);
        v.has_children = false;
        v.adjustable = true;
        let text = render(&v, &Hints::default());
        assert!(text.contains("Left and Right to adjust"));
        assert!(text.starts_with("Max males: 4. 1 of 2."));
    }

    #[test]
    fn test_detail_view() {
        let v = AnnounceView {
            kind: LevelKind::Detail,
            label: "A sturdy wall made of wood.",
            position: 0,
            count: 3,
            has_children: false,
            adjustable: false,
        };
        assert_eq!(
            render(&v, &Hints::default()),
            "A sturdy wall made of wood. Escape to go back."
        );
    }
}
