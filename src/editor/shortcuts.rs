//! Global keyboard shortcuts
//!
//! Bindings are written as `mod+shift+z`, where `mod` is the platform's
//! primary modifier (Cmd on macOS, Ctrl elsewhere).

use serde::{Deserialize, Serialize};

use crate::navigation::{Key, KeyPress, Modifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShortcutAction {
    Export,
    Open,
    Clear,
    Undo,
    Redo,
    Copy,
    ReorderColumns,
    AddColumn,
    /// Save the top nested editor back into its parent cell
    SaveNested,
}

const DEFAULT_BINDINGS: &[(&str, ShortcutAction)] = &[
    ("mod+s", ShortcutAction::Export),
    ("mod+o", ShortcutAction::Open),
    ("mod+shift+backspace", ShortcutAction::Clear),
    ("mod+z", ShortcutAction::Undo),
    ("mod+shift+z", ShortcutAction::Redo),
    ("mod+y", ShortcutAction::Redo),
    ("mod+c", ShortcutAction::Copy),
    ("mod+shift+r", ShortcutAction::ReorderColumns),
    ("mod+shift+a", ShortcutAction::AddColumn),
    ("mod+enter", ShortcutAction::SaveNested),
];

/// A parsed binding such as `mod+shift+z`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: Key,
    pub primary: bool,
    pub shift: bool,
}

impl Keystroke {
    pub fn parse(binding: &str) -> Option<Keystroke> {
        let mut primary = false;
        let mut shift = false;
        let mut key = None;

        for part in binding.split('+').map(|p| p.trim().to_ascii_lowercase()) {
            match part.as_str() {
                "mod" => primary = true,
                "shift" => shift = true,
                name => {
                    if key.is_some() {
                        return None;
                    }
                    key = Some(parse_key_name(name)?);
                }
            }
        }

        Some(Keystroke {
            key: key?,
            primary,
            shift,
        })
    }

    fn matches(&self, press: KeyPress, primary_modifier: Modifiers) -> bool {
        let mut expected = Modifiers::NONE;
        if self.primary {
            expected = expected.union(primary_modifier);
        }
        if self.shift {
            expected = expected.union(Modifiers::SHIFT);
        }
        self.key == press.key && press.modifiers == expected
    }
}

fn parse_key_name(name: &str) -> Option<Key> {
    let key = match name {
        "backspace" => Key::Backspace,
        "delete" => Key::Delete,
        "enter" => Key::Enter,
        "escape" => Key::Escape,
        "tab" => Key::Tab,
        "space" => Key::Space,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => return None,
            }
        }
    };
    Some(key)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Keymap {
    bindings: Vec<(Keystroke, ShortcutAction)>,
    primary: Modifiers,
}

impl Keymap {
    pub fn new(mac: bool) -> Self {
        let bindings = DEFAULT_BINDINGS
            .iter()
            .filter_map(|(binding, action)| Keystroke::parse(binding).map(|k| (k, *action)))
            .collect();
        Self {
            bindings,
            primary: Modifiers::primary(mac),
        }
    }

    pub fn lookup(&self, press: KeyPress) -> Option<ShortcutAction> {
        self.bindings
            .iter()
            .find(|(keystroke, _)| keystroke.matches(press, self.primary))
            .map(|(_, action)| *action)
    }
}
