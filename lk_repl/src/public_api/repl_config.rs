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

use crate::{DEFAULT_PROMPT, HISTORY_SIZE_MAX, SOURCE_NAME};

/// Knobs for a [`crate::ReplSession`]. The `lkr` binary fills these in from its
/// command line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    /// Painted before every physical line, including the lines inside an open block.
    pub prompt: String,
    /// Source name that statements are loaded with, it shows up in load errors.
    pub source_name: String,
    pub history_max_size: usize,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_owned(),
            source_name: SOURCE_NAME.to_owned(),
            history_max_size: HISTORY_SIZE_MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default() {
        let it = ReplConfig::default();
        assert_eq!(it.prompt, "➜ ");
        assert_eq!(it.source_name, "stdin");
        assert_eq!(it.history_max_size, 1_000);
    }
}
