/*
 *   Copyright (c) 2024 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// The fixed vocabulary of keys that the line editor understands. Everything else that
/// the terminal delivers (mouse, focus, paste, resize, key releases, unknown
/// chords) is dropped by [`Key::from_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Key {
    Char(char),
    Space,
    Tab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Enter,
    /// <kbd>Ctrl+C</kbd> or <kbd>Esc</kbd>. Ends the session.
    Interrupt,
}

impl Key {
    /// Map a `crossterm` event onto the vocabulary. Returns [None] for events that the
    /// line editor ignores.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Key> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        if modifiers.contains(KeyModifiers::CONTROL) {
            // Control+Alt is used to reach some symbols on international layouts.
            if !modifiers.contains(KeyModifiers::ALT) {
                return match code {
                    KeyCode::Char('c' | 'C') => Some(Key::Interrupt),
                    _ => None,
                };
            }
        }

        match code {
            KeyCode::Esc => Some(Key::Interrupt),
            KeyCode::Char(' ') => Some(Key::Space),
            KeyCode::Char(ch) => Some(Key::Char(*ch)),
            KeyCode::Tab => Some(Key::Tab),
            KeyCode::Backspace => Some(Key::Backspace),
            KeyCode::Delete => Some(Key::Delete),
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            KeyCode::Up => Some(Key::Up),
            KeyCode::Down => Some(Key::Down),
            KeyCode::Enter => Some(Key::Enter),
            _ => None,
        }
    }
}
