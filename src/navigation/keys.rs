//! Key presses as the grid sees them: key, modifiers, and where the event
//! was aimed

use serde::{Deserialize, Serialize};

/// Keys the editor reacts to; everything else is `Char` or `Other`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Tab,
    Enter,
    Space,
    Escape,
    Delete,
    Backspace,
    Char(char),
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Key {
        match key {
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Tab" => Key::Tab,
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            "Delete" | "Del" => Key::Delete,
            "Backspace" => Key::Backspace,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => Key::Other,
                }
            }
        }
    }
}

/// Modifier keys as a bitfield
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win on Windows

    pub const fn new(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Ctrl, Alt or Meta held. Shift alone does not count: Shift+Tab and
    /// Shift+Delete are grid keys.
    #[inline]
    pub const fn has_command(self) -> bool {
        self.0 & 0b1101 != 0
    }

    /// The platform's primary shortcut modifier
    pub const fn primary(mac: bool) -> Modifiers {
        if mac {
            Modifiers::META
        } else {
            Modifiers::CTRL
        }
    }
}

/// A single key press
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub const fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub const fn shifted(key: Key) -> Self {
        Self::new(key, Modifiers::SHIFT)
    }
}

/// Where the key event was aimed, as reported by the page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyContext {
    /// Focus is inside a text input or textarea
    pub in_text_input: bool,
    /// The page has a non-empty text selection
    pub has_text_selection: bool,
    /// Focus is on an interactive control that is not part of the grid
    pub target_is_control: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_keys() {
        assert_eq!(Key::from_dom("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_dom(" "), Key::Space);
        assert_eq!(Key::from_dom("Z"), Key::Char('z'));
        assert_eq!(Key::from_dom("F5"), Key::Other);
    }

    #[test]
    fn test_shift_is_not_a_command_modifier() {
        assert!(!Modifiers::SHIFT.has_command());
        assert!(Modifiers::CTRL.union(Modifiers::SHIFT).has_command());
        assert_eq!(Modifiers::new(false, false, false, true), Modifiers::META);
    }

    #[test]
    fn test_primary_modifier() {
        assert_eq!(Modifiers::primary(true), Modifiers::META);
        assert_eq!(Modifiers::primary(false), Modifiers::CTRL);
    }
}
