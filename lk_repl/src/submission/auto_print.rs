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

use std::borrow::Cow;

const PRINT_CALL_START: &str = "print(";

/// True when some line of `text` already has the shape `print(..)`, ie: `print(` with a
/// `)` after it on the same line.
#[must_use]
pub fn is_print_call(text: &str) -> bool {
    text.lines().any(|line| {
        line.match_indices(PRINT_CALL_START)
            .any(|(pos, _)| line[pos + PRINT_CALL_START.len()..].contains(')'))
    })
}

/// Rewrite `statement` so that its value is printed: `x` becomes `print(x)`. Statements
/// that are already print calls are returned unchanged.
#[must_use]
pub fn wrap_in_print(statement: &str) -> Cow<'_, str> {
    if is_print_call(statement) {
        Cow::Borrowed(statement)
    } else {
        Cow::Owned(format!("{PRINT_CALL_START}{statement})"))
    }
}
