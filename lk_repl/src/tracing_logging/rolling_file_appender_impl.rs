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

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// The log file is never rotated, and it is appended to across runs. Unlike
/// [`tracing_appender::rolling::never`] this does not panic when the file can't be
/// created.
///
/// Note that if you wrap this up in a non blocking writer, as shown below, it doesn't
/// work, since the worker guard has to outlive the subscriber:
///
/// ```ignore
/// tracing_appender::non_blocking(try_create("foo")?);
/// ```
///
/// # Errors
///
/// If `path_str` has no file name, or the file (or its folder) can't be created.
pub fn try_create(path_str: &str) -> miette::Result<RollingFileAppender> {
    let path = PathBuf::from(&path_str);

    let parent = path.parent().ok_or_else(|| {
        miette::miette!(
            "Can't access current folder {}. It might not exist, or don't have required permissions.",
            path.display()
        )
    })?;

    let file_name = path
        .file_name()
        .and_then(|it| it.to_str())
        .ok_or_else(|| {
            miette::miette!(
                "Can't access file name {}. It might not exist, or don't have required permissions.",
                path.display()
            )
        })?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(parent)
        .map_err(|err| {
            miette::miette!("Can't create log file {}: {err}", path.display())
        })
}
