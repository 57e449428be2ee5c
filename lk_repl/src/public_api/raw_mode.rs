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

use crossterm::terminal;

use crate::ReplError;

/// Puts the terminal in raw mode for as long as it is alive. Raw mode is turned off
/// when this is dropped, which includes the error paths out of `main`.
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// # Errors
    ///
    /// If the terminal can't be put into raw mode.
    pub fn enable() -> Result<Self, ReplError> {
        terminal::enable_raw_mode()?;
        tracing::debug!("raw mode -> enabled");
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        match terminal::disable_raw_mode() {
            Ok(()) => tracing::debug!("raw mode -> disabled"),
            Err(err) => tracing::error!(?err, "raw mode -> failed to disable"),
        }
    }
}
