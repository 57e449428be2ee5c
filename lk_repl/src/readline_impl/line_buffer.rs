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

use std::io::{self, Write};

use crossterm::{QueueableCommand,
                cursor::MoveToColumn,
                terminal::{Clear, ClearType}};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// The contents of the physical line that is currently being edited, and the position of
/// the cursor in it.
///
/// The cursor is an index of a grapheme cluster (a user perceived character), not a byte
/// offset. It is always in the range `[0, self.len()]`, every operation clamps to keep it
/// there.
///
/// Operations that change the content only mutate state and report whether anything
/// changed. Painting is done by [`Self::render`] and [`Self::render_cursor`], which the
/// key dispatcher (`Readline`) calls after every event.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    /// Unicode line.
    pub content: String,

    /// Index of grapheme in line.
    pub cursor: usize,
}

impl LineBuffer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// The cursor is placed at the end of `text`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut it = Self::default();
        it.replace_with(text);
        it
    }

    /// Number of grapheme clusters in the line.
    #[must_use]
    pub fn len(&self) -> usize { self.content.graphemes(true).count() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.content.is_empty() }

    /// Byte offset of the grapheme at `grapheme_index`, or the length of the content when
    /// the index is at (or past) the end.
    fn byte_offset_of(&self, grapheme_index: usize) -> usize {
        self.content
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map_or(self.content.len(), |(pos, _)| pos)
    }

    /// Insert `text` at the cursor and move the cursor past it.
    pub fn insert_str(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let pos = self.byte_offset_of(self.cursor);
        self.content.insert_str(pos, text);
        let end = pos + text.len();
        // A combining mark merges into the grapheme before it, so count rather than add.
        self.cursor = usize::min(self.content[..end].graphemes(true).count(), self.len());
        true
    }

    /// Delete the grapheme before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 || self.content.is_empty() {
            return false;
        }
        let start = self.byte_offset_of(self.cursor - 1);
        let end = self.byte_offset_of(self.cursor);
        self.content.replace_range(start..end, "");
        self.cursor -= 1;
        true
    }

    /// Delete the grapheme at the cursor. The cursor does not move.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let start = self.byte_offset_of(self.cursor);
        let end = self.byte_offset_of(self.cursor + 1);
        self.content.replace_range(start..end, "");
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Swap the whole line out for `text`, eg: when recalling history. Cursor goes to the
    /// end.
    pub fn replace_with(&mut self, text: &str) {
        self.content.clear();
        self.content.push_str(text);
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Take the line out, leaving this buffer empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    /// Display width (in terminal columns) of everything before the cursor.
    #[must_use]
    pub fn cursor_display_width(&self) -> usize {
        UnicodeWidthStr::width(&self.content[..self.byte_offset_of(self.cursor)])
    }

    /// Terminal column that the cursor should be painted at, given the `prompt` that
    /// precedes the line.
    #[must_use]
    pub fn cursor_column(&self, prompt: &str) -> u16 {
        let column = UnicodeWidthStr::width(prompt) + self.cursor_display_width();
        u16::try_from(column).unwrap_or(u16::MAX)
    }

    /// Clear the current terminal line, paint `prompt` followed by the content, and put
    /// the terminal cursor back where [`Self::cursor`] says it is.
    ///
    /// # Errors
    ///
    /// If writing to `term` fails.
    pub fn render(&self, prompt: &str, term: &mut dyn Write) -> io::Result<()> {
        term.queue(Clear(ClearType::CurrentLine))?;
        term.queue(MoveToColumn(0))?;
        write!(term, "{prompt}{}", self.content)?;
        self.render_cursor(prompt, term)
    }

    /// Only move the terminal cursor, the content on screen is left untouched.
    ///
    /// # Errors
    ///
    /// If writing to `term` fails.
    pub fn render_cursor(&self, prompt: &str, term: &mut dyn Write) -> io::Result<()> {
        term.queue(MoveToColumn(self.cursor_column(prompt)))?;
        term.flush()
    }
}

#[cfg(test)]
mod tests {
    use lk_test_fixtures::StdoutMock;
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_cursor_in_bounds(line: &LineBuffer) {
        assert!(
            line.cursor <= line.len(),
            "cursor {} out of bounds for {:?}",
            line.cursor,
            line.content
        );
    }

    #[test]
    fn test_insert_at_cursor() {
        let mut line = LineBuffer::from_text("ac");
        line.move_left();
        assert!(line.insert_str("b"));
        assert_eq!(line.content, "abc");
        assert_eq!(line.cursor, 2);
    }

    #[test]
    fn test_insert_empty_is_noop() {
        let mut line = LineBuffer::from_text("abc");
        assert!(!line.insert_str(""));
        assert_eq!(line.cursor, 3);
    }

    #[test]
    fn test_backspace() {
        let mut line = LineBuffer::from_text("abc");
        assert!(line.backspace());
        assert_eq!(line.content, "ab");
        assert_eq!(line.cursor, 2);

        line.cursor = 0;
        assert!(!line.backspace());
        assert_eq!(line.content, "ab");

        let mut empty = LineBuffer::new();
        assert!(!empty.backspace());
    }

    #[test]
    fn test_delete() {
        let mut line = LineBuffer::from_text("abc");
        assert!(!line.delete());

        line.cursor = 1;
        assert!(line.delete());
        assert_eq!(line.content, "ac");
        assert_eq!(line.cursor, 1);
    }

    #[test]
    fn test_move_clamps() {
        let mut line = LineBuffer::from_text("ab");
        assert!(!line.move_right());
        assert!(line.move_left());
        assert!(line.move_left());
        assert!(!line.move_left());
        assert_eq!(line.cursor, 0);
    }

    #[test]
    fn test_graphemes_are_single_characters() {
        let mut line = LineBuffer::new();
        line.insert_str("e\u{301}");
        assert_eq!(line.len(), 1);
        assert_eq!(line.cursor, 1);

        line.insert_str("😀");
        assert_eq!(line.len(), 2);
        assert!(line.backspace());
        assert_eq!(line.content, "e\u{301}");
    }

    #[test]
    fn test_combining_mark_merges_into_previous_grapheme() {
        let mut line = LineBuffer::new();
        line.insert_str("e");
        line.insert_str("\u{301}");
        assert_eq!(line.len(), 1);
        assert_eq!(line.cursor, 1);
    }

    #[test]
    fn test_cursor_stays_in_bounds_for_op_sequences() {
        // Every sequence of 6 ops drawn from the 5 operations below.
        const OPS: usize = 5;
        const DEPTH: u32 = 6;
        for seed in 0..OPS.pow(DEPTH) {
            let mut line = LineBuffer::new();
            let mut it = seed;
            for _ in 0..DEPTH {
                match it % OPS {
                    0 => _ = line.insert_str("xy"),
                    1 => _ = line.backspace(),
                    2 => _ = line.delete(),
                    3 => _ = line.move_left(),
                    _ => _ = line.move_right(),
                }
                assert_cursor_in_bounds(&line);
                it /= OPS;
            }
        }
    }

    #[test]
    fn test_take_resets() {
        let mut line = LineBuffer::from_text("abc");
        assert_eq!(line.take(), "abc");
        assert_eq!(line, LineBuffer::new());
    }

    #[test]
    fn test_cursor_column_uses_display_width() {
        let mut line = LineBuffer::from_text("日本");
        assert_eq!(line.cursor_column("> "), 6);
        line.move_left();
        assert_eq!(line.cursor_column("> "), 4);
    }

    #[test]
    fn test_render_paints_prompt_and_content() {
        let stdout_mock = StdoutMock::default();
        let mut term = stdout_mock.clone();

        let line = LineBuffer::from_text("1 + 1");
        line.render("➜ ", &mut term).unwrap();

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string_strip_ansi(), "➜ 1 + 1");
        // Raw output holds the clear line command.
        assert!(stdout_mock.get_copy_of_buffer_as_string().contains("\x1b[2K"));
    }

    #[test]
    fn test_render_cursor_does_not_repaint_content() {
        let stdout_mock = StdoutMock::default();
        let mut term = stdout_mock.clone();

        let line = LineBuffer::from_text("abc");
        line.render_cursor("> ", &mut term).unwrap();

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string_strip_ansi(), "");
        // ANSI columns are 1 based, so `MoveToColumn(5)` is painted as `ESC[6G`.
        assert!(stdout_mock.get_copy_of_buffer_as_string().contains("\x1b[6G"));
    }
}
