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

use std::collections::VecDeque;

use crate::HISTORY_SIZE_MAX;

/// Every line that has been submitted in this session, oldest first.
///
/// - No two entries are ever equal. Recording a line that is already present moves it to
///   the end, so the order is "most recently used last".
/// - [`Self::browse_index`] is in the range `[0, entries.len()]`. When it is equal to
///   `entries.len()` the user is editing a fresh line, not browsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    pub entries: VecDeque<String>,
    pub max_size: usize,
    pub browse_index: usize,
}

impl Default for History {
    fn default() -> Self { Self::new(HISTORY_SIZE_MAX) }
}

impl History {
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_size,
            browse_index: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Remove any existing equal entry, then append `line`. Drops the oldest entry when
    /// [`Self::max_size`] is exceeded.
    pub fn record(&mut self, line: &str) {
        if let Some(idx) = self.entries.iter().position(|entry| entry == line) {
            self.entries.remove(idx);
        }
        self.entries.push_back(line.to_owned());
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
        self.start_browsing();
    }

    /// Record a logical statement. Leading and trailing newlines are trimmed, then every
    /// physical line becomes its own entry, so each one can be recalled independently.
    pub fn record_statement(&mut self, statement: &str) {
        for line in statement.trim_matches('\n').split('\n') {
            self.record(line);
        }
    }

    /// Change the maximum size, dropping the oldest entries if needed.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        while self.entries.len() > max_size {
            self.entries.pop_front();
        }
        self.start_browsing();
    }

    /// Point the browse cursor past the newest entry, ie: at a fresh line.
    pub fn start_browsing(&mut self) { self.browse_index = self.entries.len(); }

    #[must_use]
    pub fn is_browsing(&self) -> bool { self.browse_index < self.entries.len() }

    /// Step back one entry. Returns [None] (and does nothing) when already at the oldest
    /// entry, or when there is no history.
    pub fn recall_previous(&mut self) -> Option<&str> {
        if self.browse_index == 0 {
            return None;
        }
        self.browse_index -= 1;
        self.entries.get(self.browse_index).map(String::as_str)
    }

    /// Step forward one entry. Stepping past the newest entry returns to the fresh line,
    /// which is represented by `Some("")`. Returns [None] when already on the fresh line.
    pub fn recall_next(&mut self) -> Option<&str> {
        if !self.is_browsing() {
            return None;
        }
        self.browse_index += 1;
        match self.entries.get(self.browse_index) {
            Some(entry) => Some(entry.as_str()),
            None => Some(""),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entries(history: &History) -> Vec<&str> {
        history.entries.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_record_twice_keeps_one_occurrence_last() {
        let mut history = History::default();
        history.record("x");
        history.record("y");
        history.record("x");
        history.record("x");
        assert_eq!(entries(&history), vec!["y", "x"]);
    }

    #[test]
    fn test_record_statement_splits_lines() {
        let mut history = History::default();
        history.record_statement("\nfn f() {\n  x = 1\n}\n");
        assert_eq!(entries(&history), vec!["fn f() {", "  x = 1", "}"]);
    }

    #[test]
    fn test_record_statement_dedups_across_lines() {
        let mut history = History::default();
        history.record("}");
        history.record_statement("if a {\n}");
        assert_eq!(entries(&history), vec!["if a {", "}"]);
    }

    #[test]
    fn test_max_size_drops_oldest() {
        let mut history = History::new(2);
        history.record("a");
        history.record("b");
        history.record("c");
        assert_eq!(entries(&history), vec!["b", "c"]);

        history.set_max_size(1);
        assert_eq!(entries(&history), vec!["c"]);
    }

    #[test]
    fn test_recall_previous_on_empty_is_noop() {
        let mut history = History::default();
        history.start_browsing();
        assert_eq!(history.recall_previous(), None);
        assert_eq!(history.browse_index, 0);
    }

    #[test]
    fn test_recall_walks_back_and_forth() {
        let mut history = History::default();
        history.record("a");
        history.record("b");
        history.start_browsing();

        assert_eq!(history.recall_previous(), Some("b"));
        assert_eq!(history.recall_previous(), Some("a"));
        // Oldest entry reached.
        assert_eq!(history.recall_previous(), None);

        assert_eq!(history.recall_next(), Some("b"));
        // Past the newest entry is the fresh line.
        assert_eq!(history.recall_next(), Some(""));
        assert!(!history.is_browsing());
        assert_eq!(history.recall_next(), None);
    }

    #[test]
    fn test_recall_next_without_browsing_is_noop() {
        let mut history = History::default();
        history.record("a");
        assert_eq!(history.recall_next(), None);
    }
}
