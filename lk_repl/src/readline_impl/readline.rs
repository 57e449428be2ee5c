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

use crossterm::{QueueableCommand, cursor::MoveToColumn};
use futures_util::StreamExt;
use thiserror::Error;

use crate::{CrosstermEventResult, History, Key, LineBuffer, OutputDevice,
            PinnedInputStream, TAB_AS_SPACES};

/// # Mental model and overview
///
/// This is the key event dispatcher. It is a replacement for
/// [`std::io::BufRead::read_line`] that edits the line in place, in raw mode.
///
/// When you call [`Self::readline()`] it draws the prompt and then awaits one key event
/// at a time from the [`PinnedInputStream`]. Each event is applied to the
/// [`LineBuffer`] (and possibly the [`History`]), and the line is re-rendered on the
/// output device right away. It returns when the user presses <kbd>Enter</kbd>
/// ([`ReadlineEvent::Line`]), interrupts ([`ReadlineEvent::Interrupted`]), or the input
/// stream ends ([`ReadlineEvent::Eof`]).
///
/// Everything happens on the task that awaits [`Self::readline()`], and all the state is
/// owned by this struct, so there is no locking.
///
/// # Inputs and dependency injection
///
/// There are 2 resources that must be passed into [`Self::new()`]:
/// 1. [`PinnedInputStream`] - An async stream of `crossterm` events. It is typically
///    [`crossterm::event::EventStream`]. For testing you can provide a generated stream.
/// 2. [`OutputDevice`] - Anything that is `std::io::Write + Send`. It is typically
///    [`std::io::Stdout`]. For testing you can provide a mock.
pub struct Readline {
    /// Raw terminal implementation, you can supply this via dependency injection.
    pub output_device: OutputDevice,

    /// Stream of events.
    pub input_device: PinnedInputStream<CrosstermEventResult>,

    pub prompt: String,

    /// Current line.
    pub line_buffer: LineBuffer,

    /// Manages the history.
    pub history: History,
}

impl std::fmt::Debug for Readline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Readline")
            .field("prompt", &self.prompt)
            .field("line_buffer", &self.line_buffer)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

/// Error returned from [`readline()`][Readline::readline]. Terminal I/O has no recovery
/// semantics, so these end the session.
#[derive(Debug, Error)]
pub enum ReadlineError {
    /// An internal I/O error occurred.
    #[error(transparent)]
    IO(#[from] io::Error),
}

/// Events emitted by [`Readline::readline()`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ReadlineEvent {
    /// The user entered a line of text.
    Line(String),

    /// The user pressed <kbd>Ctrl+C</kbd> or <kbd>Esc</kbd>.
    Interrupted,

    /// The input stream ended.
    Eof,
}

impl Readline {
    #[must_use]
    pub fn new(
        prompt: String,
        output_device: OutputDevice,
        /* move */ input_device: PinnedInputStream<CrosstermEventResult>,
    ) -> Self {
        Self {
            output_device,
            input_device,
            prompt,
            line_buffer: LineBuffer::new(),
            history: History::default(),
        }
    }

    /// Set maximum history length. The default length is [`crate::HISTORY_SIZE_MAX`].
    pub fn set_max_history(&mut self, max_size: usize) {
        self.history.set_max_size(max_size);
    }

    /// Read one physical line. The line buffer starts out empty, and history browsing
    /// starts from the fresh line.
    ///
    /// # Errors
    ///
    /// If the input stream yields an error, or writing to the output device fails.
    pub async fn readline(&mut self) -> Result<ReadlineEvent, ReadlineError> {
        self.line_buffer.clear();
        self.history.start_browsing();
        self.line_buffer
            .render(&self.prompt, &mut *self.output_device)?;

        while let Some(result_crossterm_event) = self.input_device.next().await {
            let crossterm_event = result_crossterm_event?;
            let Some(key) = Key::from_event(&crossterm_event) else {
                continue;
            };
            if let Some(readline_event) = self.apply_key(key)? {
                return Ok(readline_event);
            }
        }

        writeln!(self.output_device)?;
        self.output_device.queue(MoveToColumn(0))?;
        self.output_device.flush()?;
        Ok(ReadlineEvent::Eof)
    }

    /// Apply a single key to the line buffer and history, and paint the result. Returns
    /// `Some(..)` when the key ends the read.
    ///
    /// # Errors
    ///
    /// If writing to the output device fails.
    pub fn apply_key(&mut self, key: Key) -> Result<Option<ReadlineEvent>, ReadlineError> {
        let term = &mut *self.output_device;
        let prompt = self.prompt.as_str();
        let line = &mut self.line_buffer;

        match key {
            Key::Interrupt => {
                writeln!(term)?;
                term.queue(MoveToColumn(0))?;
                term.flush()?;
                return Ok(Some(ReadlineEvent::Interrupted));
            }
            Key::Enter => {
                writeln!(term)?;
                term.queue(MoveToColumn(0))?;
                term.flush()?;
                return Ok(Some(ReadlineEvent::Line(line.take())));
            }
            Key::Char(ch) => {
                let mut buf = [0; 4];
                line.insert_str(ch.encode_utf8(&mut buf));
                line.render(prompt, term)?;
            }
            Key::Space => {
                line.insert_str(" ");
                line.render(prompt, term)?;
            }
            Key::Tab => {
                line.insert_str(TAB_AS_SPACES);
                line.render(prompt, term)?;
            }
            Key::Backspace => {
                if line.backspace() {
                    line.render(prompt, term)?;
                }
            }
            Key::Delete => {
                if line.delete() {
                    line.render(prompt, term)?;
                }
            }
            Key::Left => {
                line.move_left();
                line.render_cursor(prompt, term)?;
            }
            Key::Right => {
                line.move_right();
                line.render_cursor(prompt, term)?;
            }
            Key::Up => {
                // Replace line if a history item is found.
                if let Some(entry) = self.history.recall_previous() {
                    line.replace_with(entry);
                    tracing::debug!(browse_index = self.history.browse_index, "recall previous");
                    line.render(prompt, term)?;
                }
            }
            Key::Down => {
                if let Some(entry) = self.history.recall_next() {
                    line.replace_with(entry);
                    tracing::debug!(browse_index = self.history.browse_index, "recall next");
                    line.render(prompt, term)?;
                }
            }
        }

        Ok(None)
    }
}
