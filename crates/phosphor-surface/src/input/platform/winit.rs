use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::input::{Key, KeyState};

/// Translates a winit keyboard event into a key and its state.
///
/// Returns `None` for key repeats; holding a key should not fire its action
/// at the OS repeat rate.
pub fn translate_key_event(event: &KeyEvent) -> Option<(Key, KeyState)> {
    if event.repeat {
        return None;
    }

    let state = match event.state {
        ElementState::Pressed => KeyState::Pressed,
        ElementState::Released => KeyState::Released,
    };

    Some((map_key(event.physical_key), state))
}

/// Maps a physical key to [`Key`].
///
/// Physical codes are used so the bindings stay on the same keys regardless
/// of keyboard layout. Letters map to lowercase characters.
pub fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(code) => match code {
            KeyCode::ArrowUp => Key::ArrowUp,
            KeyCode::ArrowDown => Key::ArrowDown,
            KeyCode::ArrowLeft => Key::ArrowLeft,
            KeyCode::ArrowRight => Key::ArrowRight,
            KeyCode::Space => Key::Space,

            KeyCode::KeyA => Key::Character('a'),
            KeyCode::KeyB => Key::Character('b'),
            KeyCode::KeyC => Key::Character('c'),
            KeyCode::KeyD => Key::Character('d'),
            KeyCode::KeyE => Key::Character('e'),
            KeyCode::KeyF => Key::Character('f'),
            KeyCode::KeyG => Key::Character('g'),
            KeyCode::KeyH => Key::Character('h'),
            KeyCode::KeyI => Key::Character('i'),
            KeyCode::KeyJ => Key::Character('j'),
            KeyCode::KeyK => Key::Character('k'),
            KeyCode::KeyL => Key::Character('l'),
            KeyCode::KeyM => Key::Character('m'),
            KeyCode::KeyN => Key::Character('n'),
            KeyCode::KeyO => Key::Character('o'),
            KeyCode::KeyP => Key::Character('p'),
            KeyCode::KeyQ => Key::Character('q'),
            KeyCode::KeyR => Key::Character('r'),
            KeyCode::KeyS => Key::Character('s'),
            KeyCode::KeyT => Key::Character('t'),
            KeyCode::KeyU => Key::Character('u'),
            KeyCode::KeyV => Key::Character('v'),
            KeyCode::KeyW => Key::Character('w'),
            KeyCode::KeyX => Key::Character('x'),
            KeyCode::KeyY => Key::Character('y'),
            KeyCode::KeyZ => Key::Character('z'),

            KeyCode::Digit0 => Key::Character('0'),
            KeyCode::Digit1 => Key::Character('1'),
            KeyCode::Digit2 => Key::Character('2'),
            KeyCode::Digit3 => Key::Character('3'),
            KeyCode::Digit4 => Key::Character('4'),
            KeyCode::Digit5 => Key::Character('5'),
            KeyCode::Digit6 => Key::Character('6'),
            KeyCode::Digit7 => Key::Character('7'),
            KeyCode::Digit8 => Key::Character('8'),
            KeyCode::Digit9 => Key::Character('9'),

            other => Key::Other(other as u32),
        },

        // NativeKeyCode is not a u32 in winit 0.30; keep it unbound.
        PhysicalKey::Unidentified(_) => Key::Other(0),
    }
}
