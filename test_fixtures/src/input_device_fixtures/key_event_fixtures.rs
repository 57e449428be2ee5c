/*
 *   Copyright (c) 2024-2025 R3BL LLC
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

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

/// Same shape as the items produced by `crossterm::event::EventStream`.
pub type CrosstermEventResult = std::io::Result<Event>;

/// A key press with no modifiers.
#[must_use]
pub fn key_press(code: KeyCode) -> CrosstermEventResult {
    Ok(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

/// A key press with the `Ctrl` modifier held down, eg: `ctrl_press('c')`.
#[must_use]
pub fn ctrl_press(ch: char) -> CrosstermEventResult {
    Ok(Event::Key(KeyEvent::new(
        KeyCode::Char(ch),
        KeyModifiers::CONTROL,
    )))
}

/// One key press per `char` in `text`. Note that `' '` is sent as a `Char(' ')` key
/// press, which is what terminals deliver for the space bar.
#[must_use]
pub fn type_text(text: &str) -> Vec<CrosstermEventResult> {
    text.chars().map(|ch| key_press(KeyCode::Char(ch))).collect()
}

/// Type `text` and then press `Enter`.
#[must_use]
pub fn type_line(text: &str) -> Vec<CrosstermEventResult> {
    let mut it = type_text(text);
    it.push(key_press(KeyCode::Enter));
    it
}

/// Type each of the `lines`, pressing `Enter` after each one.
#[must_use]
pub fn type_lines(lines: &[&str]) -> Vec<CrosstermEventResult> {
    lines.iter().flat_map(|line| type_line(line)).collect()
}
