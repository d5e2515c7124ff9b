use std::fmt;

/// Keyboard key identifier.
///
/// Only the keys the display reacts to get a dedicated variant. Printable keys
/// arrive as `Character`; everything else is kept as `Other` with a stable
/// platform code so hosts can still log it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,

    /// A printable key, as produced by the layout (either case for letters).
    Character(char),

    /// Platform-dependent key not represented here.
    Other(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Character(c) => write!(f, "{c}"),
            other => write!(f, "{other:?}"),
        }
    }
}
