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

use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, registry::LookupSpan};

use crate::{DisplayPreference, DynLayer, WriterArg, rolling_file_appender_impl};

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
#[macro_export]
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_thread_ids(true)
            .with_thread_names(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriterConfig {
    Display,
    File,
    DisplayAndFile,
}

impl WriterConfig {
    /// Returns [`None`] when `writers` has nothing to write to, eg: only
    /// [`WriterArg::None`].
    #[must_use]
    pub fn from_writers(writers: &[WriterArg]) -> Option<WriterConfig> {
        let contains_file_writer = writers.contains(&WriterArg::File);
        let contains_display_writer =
            writers.contains(&WriterArg::Stdout) || writers.contains(&WriterArg::Stderr);
        match (contains_file_writer, contains_display_writer) {
            (true, true) => Some(WriterConfig::DisplayAndFile),
            (true, false) => Some(WriterConfig::File),
            (false, true) => Some(WriterConfig::Display),
            (false, false) => None,
        }
    }

    /// This erases the concrete type of the writer, and returns a boxed layer. This
    /// is useful for composition of layers. There's more info in the docs
    /// [here](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/index.html#runtime-configuration-with-layers).
    #[must_use]
    pub fn create_display_layer<S>(
        self,
        level_filter: LevelFilter,
        preferred_display: DisplayPreference,
    ) -> Option<Box<DynLayer<S>>>
    where
        S: tracing_core::Subscriber,
        for<'a> S: LookupSpan<'a>,
    {
        let fmt_layer = create_fmt!().without_time().with_ansi(true);

        match self {
            WriterConfig::DisplayAndFile | WriterConfig::Display => {
                match preferred_display {
                    DisplayPreference::Stdout => Some(Box::new(
                        fmt_layer
                            .with_writer(std::io::stdout)
                            .with_filter(level_filter),
                    )),
                    DisplayPreference::Stderr => Some(Box::new(
                        fmt_layer
                            .with_writer(std::io::stderr)
                            .with_filter(level_filter),
                    )),
                }
            }
            WriterConfig::File => None,
        }
    }

    /// Same as [`Self::create_display_layer`], for the log file. Log files get
    /// timestamps and no ANSI colors.
    ///
    /// # Errors
    ///
    /// If the log file can't be created.
    pub fn try_create_file_layer<S>(
        self,
        level_filter: LevelFilter,
        tracing_log_file_path_and_prefix: &str,
    ) -> miette::Result<Option<Box<DynLayer<S>>>>
    where
        S: tracing_core::Subscriber,
        for<'a> S: LookupSpan<'a>,
    {
        let fmt_layer = create_fmt!().with_ansi(false);

        Ok(match self {
            WriterConfig::DisplayAndFile | WriterConfig::File => {
                let file =
                    rolling_file_appender_impl::try_create(tracing_log_file_path_and_prefix)?;
                Some(Box::new(
                    fmt_layer.with_writer(file).with_filter(level_filter),
                ))
            }
            WriterConfig::Display => None,
        })
    }
}
