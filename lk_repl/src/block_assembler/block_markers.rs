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

//! Predicates that decide what a single physical line contributes to block balancing.
//!
//! - An opener is one of the LK control flow or definition forms, found anywhere in the
//!   line: `for k, v in t {`, `fn name(..) {`, `while cond {`, `if cond {`,
//!   `elif cond {`, `else {`, `class Name {`.
//! - A closer is a `}` at the very end of the line (trailing whitespace is ignored). A
//!   `}` in the middle of the line, eg: `}); foo()`, does not count.
//! - A line is counted at most once as an opener, no matter how many forms it contains.

/// The block opening forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum BlockOpener {
    ForIn,
    Fn,
    While,
    If,
    ElseIf,
    Else,
    Class,
}

/// What one physical line contributes to the open and close counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineMarkers {
    pub opener: Option<BlockOpener>,
    pub closes: bool,
}

/// Classify `line`.
///
/// A line that starts with the `}` of one conditional branch and opens the next one, eg:
/// `} else {` or `} elif x {`, stays inside the same block. Its opener is not counted.
/// This is the one departure from counting every line that matches an opener form, so an
/// `if` / `elif` / `else` chain is balanced by the `}` after its last branch.
#[must_use]
pub fn scan_line(line: &str) -> LineMarkers {
    let opener = if is_branch_continuation(line) {
        None
    } else {
        detect_block_opener(line)
    };
    LineMarkers {
        opener,
        closes: is_block_closer(line),
    }
}

#[must_use]
pub fn is_block_closer(line: &str) -> bool { line.trim_end().ends_with('}') }

/// `} else {`, `} elif cond {`, `}else{`. [scan_line] does not count these as openers.
#[must_use]
pub fn is_branch_continuation(line: &str) -> bool {
    let Some(rest) = line.trim_start().strip_prefix('}') else {
        return false;
    };
    let rest = rest.trim_start();
    ["else", "elif"]
        .iter()
        .any(|keyword| keyword_positions(rest, keyword).any(|pos| pos == 0))
}

/// The first opening form found in `line`, in this order: for-in, fn, while, if, elif,
/// else, class.
#[must_use]
pub fn detect_block_opener(line: &str) -> Option<BlockOpener> {
    const CHECKS: [(&str, BlockOpener, fn(&str) -> bool); 7] = [
        ("for", BlockOpener::ForIn, opens_for_in),
        ("fn", BlockOpener::Fn, opens_fn),
        ("while", BlockOpener::While, opens_conditional),
        ("if", BlockOpener::If, opens_conditional),
        ("elif", BlockOpener::ElseIf, opens_conditional),
        ("else", BlockOpener::Else, opens_else),
        ("class", BlockOpener::Class, opens_class),
    ];

    CHECKS.iter().find_map(|(keyword, opener, check)| {
        keyword_positions(line, keyword)
            .any(|pos| check(&line[pos + keyword.len()..]))
            .then_some(*opener)
    })
}

fn is_ident_char(ch: char) -> bool { ch.is_alphanumeric() || ch == '_' }

/// Byte positions where `keyword` occurs in `text` as a whole word.
fn keyword_positions<'a>(
    text: &'a str,
    keyword: &'a str,
) -> impl Iterator<Item = usize> + 'a {
    text.match_indices(keyword).filter_map(move |(pos, _)| {
        let before_ok = text[..pos].chars().next_back().is_none_or(|ch| !is_ident_char(ch));
        let after_ok = text[pos + keyword.len()..]
            .chars()
            .next()
            .is_none_or(|ch| !is_ident_char(ch));
        (before_ok && after_ok).then_some(pos)
    })
}

/// Non empty text between the keyword and a `{`.
fn opens_conditional(rest: &str) -> bool {
    rest.find('{')
        .is_some_and(|idx| !rest[..idx].trim().is_empty())
}

/// `for k, v in t {`.
fn opens_for_in(rest: &str) -> bool {
    keyword_positions(rest, "in").any(|pos| {
        let vars = rest[..pos].trim();
        let after_in = &rest[pos + "in".len()..];
        !vars.is_empty() && opens_conditional(after_in)
    })
}

/// `fn name(args) {` or `fn(args) {`.
fn opens_fn(rest: &str) -> bool {
    let Some(open_paren) = rest.find('(') else {
        return false;
    };
    let name = rest[..open_paren].trim();
    if !name.chars().all(|ch| is_ident_char(ch) || ch == '.' || ch == ':') {
        return false;
    }
    let after_open = &rest[open_paren..];
    after_open
        .find(')')
        .is_some_and(|close_paren| after_open[close_paren..].contains('{'))
}

/// `else {`.
fn opens_else(rest: &str) -> bool { rest.trim_start().starts_with('{') }

/// `class Name {`.
fn opens_class(rest: &str) -> bool {
    let Some(idx) = rest.find('{') else {
        return false;
    };
    let name = rest[..idx].trim();
    !name.is_empty() && rest.starts_with(char::is_whitespace)
}
