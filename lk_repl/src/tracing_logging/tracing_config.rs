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

use std::str::FromStr;

use tracing_core::LevelFilter;

/// Default log file, relative to the current working directory.
pub const DEFAULT_LOG_FILE: &str = "lkr_log.txt";

/// Configure where the logs go, and at which level. Pass this to [`crate::init()`].
///
/// Fields:
/// - `writers`: Zero or more [`WriterArg`]s. When none of them is a real writer, tracing
///   is not initialized at all.
/// - `level`: The log level to use for tracing.
/// - `tracing_log_file_path_and_prefix`: The file path to use for the log file. Eg:
///   `/tmp/lkr_log.txt` or `lkr_log.txt`.
/// - `preferred_display`: The display to use when `writers` names neither
///   [`WriterArg::Stdout`] nor [`WriterArg::Stderr`]. A writer named in `writers` wins,
///   and [`WriterArg::Stderr`] wins over [`WriterArg::Stdout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub writers: Vec<WriterArg>,
    pub level: tracing::Level,
    pub tracing_log_file_path_and_prefix: String,
    pub preferred_display: DisplayPreference,
}

impl TracingConfig {
    /// Log to a file only. The terminal belongs to the REPL, so this is what the `lkr`
    /// binary uses.
    #[must_use]
    pub fn new_file(filename: Option<String>, level: tracing::Level) -> Self {
        Self {
            writers: vec![WriterArg::File],
            level,
            tracing_log_file_path_and_prefix: filename
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_owned()),
            preferred_display: DisplayPreference::Stderr,
        }
    }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { LevelFilter::from_level(self.level) }

    /// Resolve the display that the display layer writes to.
    #[must_use]
    pub fn get_display_preference(&self) -> DisplayPreference {
        if self.writers.contains(&WriterArg::Stderr) {
            DisplayPreference::Stderr
        } else if self.writers.contains(&WriterArg::Stdout) {
            DisplayPreference::Stdout
        } else {
            self.preferred_display
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
}

/// Use to parse the `--log-writer` command line argument (provided by the `clap`
/// crate). This is an intermediate representation, which is turned into a
/// [`crate::WriterConfig`] before it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterArg {
    Stdout,
    Stderr,
    File,
    None,
}

impl FromStr for WriterArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdout" => Ok(WriterArg::Stdout),
            "stderr" => Ok(WriterArg::Stderr),
            "file" => Ok(WriterArg::File),
            "none" | "" => Ok(WriterArg::None),
            _ => Err(format!("{s} is not a valid tracing writer")),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case("stdout", WriterArg::Stdout)]
    #[test_case("stderr", WriterArg::Stderr)]
    #[test_case("file", WriterArg::File)]
    #[test_case("none", WriterArg::None)]
    #[test_case("", WriterArg::None)]
    fn test_from_str(input: &str, expected: WriterArg) {
        assert_eq!(WriterArg::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_invalid_from_str() {
        assert_eq!(
            WriterArg::from_str("syslog").unwrap_err(),
            "syslog is not a valid tracing writer"
        );
    }

    #[test]
    fn test_new_file() {
        let it = TracingConfig::new_file(None, tracing::Level::INFO);
        assert_eq!(it.writers, vec![WriterArg::File]);
        assert_eq!(it.tracing_log_file_path_and_prefix, DEFAULT_LOG_FILE);
        assert_eq!(it.get_level_filter(), LevelFilter::INFO);
    }

    #[test]
    fn test_stderr_writer_overrides_preferred_display() {
        let mut it = TracingConfig::new_file(None, tracing::Level::DEBUG);
        it.preferred_display = DisplayPreference::Stdout;
        assert_eq!(it.get_display_preference(), DisplayPreference::Stdout);
        it.writers.push(WriterArg::Stderr);
        assert_eq!(it.get_display_preference(), DisplayPreference::Stderr);
    }

    #[test]
    fn test_stdout_writer_goes_to_stdout() {
        let mut it = TracingConfig::new_file(None, tracing::Level::DEBUG);
        it.writers = vec![WriterArg::Stdout];
        assert_eq!(it.preferred_display, DisplayPreference::Stderr);
        assert_eq!(it.get_display_preference(), DisplayPreference::Stdout);
    }
}
