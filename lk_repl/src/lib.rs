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

// Enforce strict error handling in production library code only.
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

//! The `lk_repl` library is the interactive front-end for the LK scripting language
//! shell. It turns raw key presses into complete, balanced source statements and hands
//! them to a language evaluator one at a time.
//!
//! # Mental model
//!
//! There are a handful of moving parts, leaf first:
//!
//! 1. [`LineBuffer`] - The contents of the current physical line, and the cursor in it.
//!    Every visible change re-renders the line (clear, prompt + content, cursor).
//! 2. [`History`] - Every submitted line, most recently used last, with duplicates
//!    collapsed. Navigable with <kbd>Up</kbd> and <kbd>Down</kbd>.
//! 3. [`BlockAssembler`] - Counts block openers (`fn`, `if`, `for .. in`, `while`,
//!    `class`, ..) and block closers (a trailing `}`) across lines, and only emits a
//!    logical statement once they balance.
//! 4. [`Readline`] - The key event dispatcher. Awaits one key event at a time from a
//!    [`PinnedInputStream`] and applies it to the [`LineBuffer`] and [`History`].
//! 5. [`SubmissionPipeline`] - Wraps a statement in `print(..)` so expression values are
//!    visible, and falls back to the raw statement if the wrapped attempt fails. At most
//!    two attempts are ever made.
//! 6. [`ReplSession`] - Owns all of the above, plus the [`Evaluator`], and runs the read,
//!    assemble, submit loop.
//!
//! # Dependency injection
//!
//! The input device is any async stream of `crossterm` events, and the output device is
//! anything that implements `std::io::Write + Send`. In production these are
//! `crossterm::event::EventStream` and `stdout`. In tests they are generated streams and
//! a mock stdout from the `lk_test_fixtures` crate.
//!
//! # Example
//!
//! ```no_run
//! use lk_repl::{CalcEvaluator, InitBarrier, RawModeGuard, ReplConfig, ReplSession};
//! use miette::IntoDiagnostic as _;
//!
//! async fn run() -> miette::Result<()> {
//!     let _raw_mode = RawModeGuard::enable().into_diagnostic()?;
//!     let evaluator = CalcEvaluator::new(Box::new(std::io::stdout()));
//!     let mut session = ReplSession::new_interactive(ReplConfig::default(), evaluator)?;
//!     session.run(InitBarrier::ready()).await?;
//!     Ok(())
//! }
//! ```

// Attach sources.
pub mod block_assembler;
pub mod calc_evaluator;
pub mod public_api;
pub mod readline_impl;
pub mod submission;
pub mod tracing_logging;

// Re-export the public API.
pub use block_assembler::*;
pub use calc_evaluator::*;
pub use public_api::*;
pub use readline_impl::*;
pub use submission::*;
pub use tracing_logging::*;

// Type aliases.
use std::{io::Error, pin::Pin};

use crossterm::event::Event;
use futures_core::Stream;

pub type SendRawTerminal = dyn std::io::Write + Send;
pub type OutputDevice = Box<SendRawTerminal>;

pub type CrosstermEventResult = Result<Event, Error>;
pub type PinnedInputStream<T> = Pin<Box<dyn Stream<Item = T>>>;

// Constants.
pub const HISTORY_SIZE_MAX: usize = 1_000;
pub const DEFAULT_PROMPT: &str = "➜ ";
pub const SOURCE_NAME: &str = "stdin";
pub const TAB_AS_SPACES: &str = "  ";
