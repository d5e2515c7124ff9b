use std::fmt;

use super::Key;

/// Symbolic display command forwarded to the processing block.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ActionCode {
    RefUp,
    RefDown,
    DbPerDivUp,
    DbPerDivDown,
    ZoomToggle,
    ZoomWidthUp,
    ZoomWidthDown,
    ZoomCenterUp,
    ZoomCenterDown,
    RatioUp,
    RatioDown,
    FreezeToggle,
}

impl ActionCode {
    pub const ALL: [ActionCode; 12] = [
        ActionCode::RefUp,
        ActionCode::RefDown,
        ActionCode::DbPerDivUp,
        ActionCode::DbPerDivDown,
        ActionCode::ZoomToggle,
        ActionCode::ZoomWidthUp,
        ActionCode::ZoomWidthDown,
        ActionCode::ZoomCenterUp,
        ActionCode::ZoomCenterDown,
        ActionCode::RatioUp,
        ActionCode::RatioDown,
        ActionCode::FreezeToggle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ActionCode::RefUp => "ref-up",
            ActionCode::RefDown => "ref-down",
            ActionCode::DbPerDivUp => "db-per-div-up",
            ActionCode::DbPerDivDown => "db-per-div-down",
            ActionCode::ZoomToggle => "zoom-toggle",
            ActionCode::ZoomWidthUp => "zoom-width-up",
            ActionCode::ZoomWidthDown => "zoom-width-down",
            ActionCode::ZoomCenterUp => "zoom-center-up",
            ActionCode::ZoomCenterDown => "zoom-center-down",
            ActionCode::RatioUp => "ratio-up",
            ActionCode::RatioDown => "ratio-down",
            ActionCode::FreezeToggle => "freeze-toggle",
        }
    }
}

impl fmt::Display for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a key press to the display action bound to it.
///
/// The vertical arrows move the reference level the way the trace moves on
/// screen, so `ArrowUp` lowers it. Unbound keys map to `None`.
pub fn translate_key(key: Key) -> Option<ActionCode> {
    let action = match key {
        Key::ArrowUp => ActionCode::RefDown,
        Key::ArrowDown => ActionCode::RefUp,
        Key::ArrowLeft => ActionCode::DbPerDivDown,
        Key::ArrowRight => ActionCode::DbPerDivUp,
        Key::Space => ActionCode::FreezeToggle,

        Key::Character(c) => match c.to_ascii_lowercase() {
            'z' => ActionCode::ZoomToggle,
            'w' => ActionCode::ZoomWidthUp,
            's' => ActionCode::ZoomWidthDown,
            'd' => ActionCode::ZoomCenterUp,
            'a' => ActionCode::ZoomCenterDown,
            'q' => ActionCode::RatioUp,
            'e' => ActionCode::RatioDown,
            _ => return None,
        },

        Key::Other(_) => return None,
    };

    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn arrows_map_to_level_and_scale() {
        assert_eq!(translate_key(Key::ArrowUp), Some(ActionCode::RefDown));
        assert_eq!(translate_key(Key::ArrowDown), Some(ActionCode::RefUp));
        assert_eq!(translate_key(Key::ArrowLeft), Some(ActionCode::DbPerDivDown));
        assert_eq!(translate_key(Key::ArrowRight), Some(ActionCode::DbPerDivUp));
    }

    #[test]
    fn letters_are_case_insensitive() {
        assert_eq!(translate_key(Key::Character('z')), Some(ActionCode::ZoomToggle));
        assert_eq!(translate_key(Key::Character('Z')), Some(ActionCode::ZoomToggle));
        assert_eq!(translate_key(Key::Character('Q')), Some(ActionCode::RatioUp));
    }

    #[test]
    fn space_toggles_freeze() {
        assert_eq!(translate_key(Key::Space), Some(ActionCode::FreezeToggle));
    }

    #[test]
    fn unbound_keys_map_to_nothing() {
        assert_eq!(translate_key(Key::Character('x')), None);
        assert_eq!(translate_key(Key::Character('1')), None);
        assert_eq!(translate_key(Key::Other(0)), None);
        assert_eq!(translate_key(Key::Other(65)), None);
    }

    #[test]
    fn every_action_has_exactly_one_key() {
        let keys = [
            Key::ArrowUp,
            Key::ArrowDown,
            Key::ArrowLeft,
            Key::ArrowRight,
            Key::Space,
            Key::Character('z'),
            Key::Character('w'),
            Key::Character('s'),
            Key::Character('d'),
            Key::Character('a'),
            Key::Character('q'),
            Key::Character('e'),
        ];

        let actions: HashSet<_> = keys.iter().filter_map(|k| translate_key(*k)).collect();
        assert_eq!(actions.len(), ActionCode::ALL.len());
    }
}
