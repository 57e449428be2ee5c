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

use super::scan_line;

/// Accumulates physical lines into one logical statement.
///
/// Every line is scanned for a block opener and a block closer (see [`scan_line`]). The
/// statement is complete once the counts balance. Lines are joined with `\n`, and there
/// is never a trailing newline on the emitted text.
///
/// At rest `open_count >= close_count` always holds. Once a statement is emitted, the
/// counts and the buffer are reset.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BlockAssembler {
    pub open_count: usize,
    pub close_count: usize,
    pub buffer: String,
}

/// A logical statement that is ready to be submitted, and the counts that balanced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedStatement {
    pub text: String,
    pub open_count: usize,
    pub close_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyResult {
    /// Submit this statement.
    Complete(CompletedStatement),
    /// A block is still open. Read another line with the same prompt.
    StillOpen,
}

impl BlockAssembler {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// True while some lines of an unfinished block are buffered.
    #[must_use]
    pub fn is_accumulating(&self) -> bool { self.open_count > 0 }

    pub fn reset(&mut self) {
        self.open_count = 0;
        self.close_count = 0;
        self.buffer.clear();
    }

    /// Feed the next physical line.
    pub fn push_line(&mut self, line: &str) -> AssemblyResult {
        let markers = scan_line(line);
        if markers.opener.is_some() {
            self.open_count += 1;
        }
        if markers.closes {
            self.close_count += 1;
        }

        // Nothing is open, so this line is a statement on its own.
        if self.open_count == 0 {
            let it = CompletedStatement {
                text: line.to_owned(),
                open_count: self.open_count,
                close_count: self.close_count,
            };
            self.reset();
            return AssemblyResult::Complete(it);
        }

        self.buffer.push_str(line);
        if self.open_count != self.close_count {
            self.buffer.push('\n');
            debug_assert!(self.open_count > self.close_count);
            tracing::trace!(
                open_count = self.open_count,
                close_count = self.close_count,
                "block still open"
            );
            return AssemblyResult::StillOpen;
        }

        let it = CompletedStatement {
            text: std::mem::take(&mut self.buffer),
            open_count: self.open_count,
            close_count: self.close_count,
        };
        self.reset();
        AssemblyResult::Complete(it)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn push_all(assembler: &mut BlockAssembler, lines: &[&str]) -> Vec<CompletedStatement> {
        lines
            .iter()
            .filter_map(|line| match assembler.push_line(line) {
                AssemblyResult::Complete(it) => Some(it),
                AssemblyResult::StillOpen => None,
            })
            .collect()
    }

    #[test]
    fn test_fn_block_is_one_statement() {
        let mut assembler = BlockAssembler::new();
        let completed = push_all(&mut assembler, &["fn f() {", "  x = 1", "}"]);
        assert_eq!(
            completed,
            vec![CompletedStatement {
                text: "fn f() {\n  x = 1\n}".to_string(),
                open_count: 1,
                close_count: 1,
            }]
        );
        assert_eq!(assembler, BlockAssembler::new());
    }

    #[test]
    fn test_single_line_is_emitted_immediately() {
        let mut assembler = BlockAssembler::new();
        let it = assembler.push_line("1 + 1");
        assert_eq!(
            it,
            AssemblyResult::Complete(CompletedStatement {
                text: "1 + 1".to_string(),
                open_count: 0,
                close_count: 0,
            })
        );
        assert!(assembler.buffer.is_empty());
    }

    #[test]
    fn test_still_open_keeps_accumulating() {
        let mut assembler = BlockAssembler::new();
        assert_eq!(assembler.push_line("while x < 3 {"), AssemblyResult::StillOpen);
        assert_eq!(assembler.push_line("x = x + 1"), AssemblyResult::StillOpen);
        assert!(assembler.is_accumulating());
        assert_eq!(assembler.buffer, "while x < 3 {\nx = x + 1\n");
        assert_eq!((assembler.open_count, assembler.close_count), (1, 0));
    }

    #[test]
    fn test_nested_blocks() {
        let mut assembler = BlockAssembler::new();
        let completed = push_all(
            &mut assembler,
            &["for k, v in t {", "if v {", "print(k)", "}", "}", "1"],
        );
        assert_eq!(completed.len(), 2);
        assert_eq!(
            completed[0].text,
            "for k, v in t {\nif v {\nprint(k)\n}\n}"
        );
        assert_eq!((completed[0].open_count, completed[0].close_count), (2, 2));
        assert_eq!(completed[1].text, "1");
    }

    #[test]
    fn test_if_else_chain_closes() {
        let mut assembler = BlockAssembler::new();
        let completed = push_all(
            &mut assembler,
            &["if a {", "x = 1", "} elif b {", "x = 2", "} else {", "x = 3", "}"],
        );
        assert_eq!(completed.len(), 1);
        assert_eq!(
            completed[0].text,
            "if a {\nx = 1\n} elif b {\nx = 2\n} else {\nx = 3\n}"
        );
    }

    #[test]
    fn test_one_line_block() {
        let mut assembler = BlockAssembler::new();
        let completed = push_all(&mut assembler, &["fn f() { return 1 }"]);
        assert_eq!(completed[0].text, "fn f() { return 1 }");
        assert_eq!((completed[0].open_count, completed[0].close_count), (1, 1));
    }

    #[test]
    fn test_mid_line_closer_does_not_close() {
        let mut assembler = BlockAssembler::new();
        assert_eq!(assembler.push_line("f(fn() {"), AssemblyResult::StillOpen);
        assert_eq!(assembler.push_line("}); g()"), AssemblyResult::StillOpen);
        assert!(assembler.is_accumulating());
    }

    #[test]
    fn test_dangling_closer_is_a_statement() {
        let mut assembler = BlockAssembler::new();
        let AssemblyResult::Complete(it) = assembler.push_line("}") else {
            panic!("expected a completed statement");
        };
        assert_eq!(it.text, "}");
        assert_eq!(assembler, BlockAssembler::new());
    }
}
