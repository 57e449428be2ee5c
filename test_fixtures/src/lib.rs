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

//! Test fixtures for the `lk_repl` crate. This crate is intended to be a
//! [`dev-dependency`](https://doc.rust-lang.org/cargo/reference/specifying-dependencies.html#dev-dependencies).
//!
//! It provides fixtures to drive the REPL "end to end":
//! 1. The input stream fixtures feed key events into the line editor, the same way
//!    `crossterm::event::EventStream` does in production.
//! 2. The stdout fixtures capture everything that is painted to the terminal.
//!
//! # input_device_fixtures
//!
//! ```
//! #[tokio::test]
//! async fn test_gen_input_stream() {
//!     use futures_util::StreamExt;
//!     use lk_test_fixtures::gen_input_stream;
//!
//!     let mut input_stream = gen_input_stream(vec![1, 2, 3]);
//!     for _ in 1..=3 {
//!         input_stream.next().await;
//!     }
//!     pretty_assertions::assert_eq!(input_stream.next().await, None);
//! }
//! ```
//!
//! # output_device_fixtures
//!
//! ```
//! use std::io::Write;
//! use lk_test_fixtures::StdoutMock;
//!
//! let mut stdout_mock = StdoutMock::default();
//! let stdout_mock_clone = stdout_mock.clone(); // Points to the same inner buffer.
//!
//! stdout_mock.write_all(b"hello world").unwrap();
//! assert_eq!(stdout_mock_clone.get_copy_of_buffer_as_string(), "hello world");
//! ```

// Attach sources.
pub mod input_device_fixtures;
pub mod output_device_fixtures;

// Re-export.
pub use input_device_fixtures::*;
pub use output_device_fixtures::*;
