// SPDX-License-Identifier: MPL-2.0
//! Input event value types, decoupled from any toolkit's key codes.

/// Logical key identity as delivered by the toolkit binding layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Enter,
    Tab,
    Space,
    /// A printable character key, lowercased.
    Char(char),
    /// Any key the binding layer does not map, by raw code.
    Other(u32),
}

/// Modifier state accompanying a key or button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        !(self.shift || self.ctrl || self.alt)
    }
}

/// Mouse button number; 1 is the primary button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseButton(pub u8);

impl MouseButton {
    pub const PRIMARY: MouseButton = MouseButton(1);
    pub const MIDDLE: MouseButton = MouseButton(2);
    pub const SECONDARY: MouseButton = MouseButton(3);
}

/// Press multiplicity for button-press events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressKind {
    #[default]
    Single,
    Double,
    Triple,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_default_to_empty() {
        assert!(Modifiers::none().is_empty());
        assert!(!Modifiers {
            shift: true,
            ..Modifiers::none()
        }
        .is_empty());
    }

    #[test]
    fn primary_button_is_one() {
        assert_eq!(MouseButton::PRIMARY, MouseButton(1));
    }
}
