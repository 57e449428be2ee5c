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

use std::io::{self, IsTerminal as _, Write};

use crossterm::{QueueableCommand, cursor::MoveToColumn, event::EventStream};
use miette::IntoDiagnostic as _;
use thiserror::Error;

use crate::{AssemblyResult, BlockAssembler, CrosstermEventResult, Evaluator,
            InitBarrier, OutputDevice, PinnedInputStream, Readline, ReadlineError,
            ReadlineEvent, ReplConfig, SubmissionOutcome, SubmissionPipeline};

#[derive(Debug, Error)]
pub enum ReplError {
    #[error("stdin and stdout must both be an interactive terminal")]
    NotInteractive,

    /// The [`crate::InitSignal`] was dropped before setup was done.
    #[error("initialization was aborted before the first prompt")]
    InitAborted,

    #[error(transparent)]
    Readline(#[from] ReadlineError),

    #[error(transparent)]
    IO(#[from] io::Error),
}

/// How a [`ReplSession::run`] ended. Both are a normal exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionExit {
    /// <kbd>Ctrl+C</kbd> or <kbd>Esc</kbd>.
    Interrupted,
    /// The key event stream ended.
    InputClosed,
}

/// # Mental model and overview
///
/// One session owns everything: the [`Readline`] (which owns the line buffer and the
/// history), the [`BlockAssembler`], the [`SubmissionPipeline`] and the [`Evaluator`].
/// [`Self::run`] loops over:
///
/// ```text
/// readline() ──Line──► BlockAssembler ──Complete──► History + SubmissionPipeline
///     │                      │
///     │                  StillOpen (same prompt, next line)
///     │
///     └──Interrupted / Eof──► SessionExit
/// ```
///
/// Nothing is shared, so nothing is locked. The evaluator is called synchronously from
/// the loop.
#[derive(Debug)]
pub struct ReplSession<E: Evaluator> {
    pub readline: Readline,
    pub block_assembler: BlockAssembler,
    pub pipeline: SubmissionPipeline,
    pub evaluator: E,
}

impl<E: Evaluator> ReplSession<E> {
    /// Use the given devices. This is how the tests drive a session.
    pub fn new(
        config: ReplConfig,
        output_device: OutputDevice,
        input_device: PinnedInputStream<CrosstermEventResult>,
        evaluator: E,
    ) -> Self {
        let mut readline = Readline::new(config.prompt, output_device, input_device);
        readline.set_max_history(config.history_max_size);
        Self {
            readline,
            block_assembler: BlockAssembler::new(),
            pipeline: SubmissionPipeline::new(&config.source_name),
            evaluator,
        }
    }

    /// Read keys from [`EventStream`] and paint to `stdout`. The caller is responsible
    /// for putting the terminal in raw mode, see [`crate::RawModeGuard`].
    ///
    /// # Errors
    ///
    /// [`ReplError::NotInteractive`] if `stdin` or `stdout` is piped.
    pub fn new_interactive(config: ReplConfig, evaluator: E) -> miette::Result<Self> {
        if !(io::stdin().is_terminal() && io::stdout().is_terminal()) {
            return Err(ReplError::NotInteractive).into_diagnostic();
        }
        let output_device: OutputDevice = Box::new(io::stdout());
        let input_device: PinnedInputStream<CrosstermEventResult> =
            Box::pin(EventStream::new());
        Ok(Self::new(config, output_device, input_device, evaluator))
    }

    /// Print the banner, wait for `init_barrier`, then read, assemble and submit
    /// statements until the user interrupts or the input ends.
    ///
    /// # Errors
    ///
    /// Terminal I/O errors, and [`ReplError::InitAborted`].
    pub async fn run(&mut self, init_barrier: InitBarrier) -> miette::Result<SessionExit> {
        self.print_banner().into_diagnostic()?;
        init_barrier.wait().await.into_diagnostic()?;
        tracing::info!(prompt = %self.readline.prompt, "repl session -> start");

        let session_exit = loop {
            match self.readline.readline().await.into_diagnostic()? {
                ReadlineEvent::Line(line) => {
                    self.handle_line(&line);
                }
                ReadlineEvent::Interrupted => break SessionExit::Interrupted,
                ReadlineEvent::Eof => break SessionExit::InputClosed,
            }
        };
        tracing::info!(%session_exit, "repl session -> end");
        Ok(session_exit)
    }

    /// Feed one physical line to the [`BlockAssembler`]. When that completes a
    /// statement, it is recorded in history and submitted, and the outcome is
    /// returned. Empty lines are skipped entirely. A whitespace-only line is an
    /// ordinary line.
    pub fn handle_line(&mut self, line: &str) -> Option<SubmissionOutcome> {
        if line.is_empty() {
            return None;
        }

        match self.block_assembler.push_line(line) {
            AssemblyResult::StillOpen => {
                tracing::debug!(
                    open_count = self.block_assembler.open_count,
                    close_count = self.block_assembler.close_count,
                    "block still open"
                );
                None
            }
            AssemblyResult::Complete(statement) => {
                tracing::debug!(
                    text = %statement.text,
                    open_count = statement.open_count,
                    close_count = statement.close_count,
                    "statement complete"
                );
                self.readline.history.record_statement(&statement.text);
                Some(self.pipeline.submit(&mut self.evaluator, &statement.text))
            }
        }
    }

    fn print_banner(&mut self) -> io::Result<()> {
        let term = &mut self.readline.output_device;
        write!(term, "REPL - Lang LK (v{})", env!("CARGO_PKG_VERSION"))?;
        writeln!(term)?;
        term.queue(MoveToColumn(0))?;
        term.flush()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use lk_test_fixtures::{StdoutMock, ctrl_press, gen_input_stream, key_press,
                           type_lines, type_text};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{CalcEvaluator, submission::pipeline::my_fixtures::MockEvaluator};

    fn new_session<E: Evaluator>(
        events: Vec<CrosstermEventResult>,
        evaluator: E,
    ) -> (ReplSession<E>, StdoutMock) {
        let stdout_mock = StdoutMock::default();
        let session = ReplSession::new(
            ReplConfig::default(),
            Box::new(stdout_mock.clone()),
            gen_input_stream(events),
            evaluator,
        );
        (session, stdout_mock)
    }

    fn loaded_texts(evaluator: &MockEvaluator) -> Vec<&str> {
        evaluator.loaded.iter().map(|(text, _)| text.as_str()).collect()
    }

    #[tokio::test]
    async fn test_banner_then_input_closed() {
        let (mut session, stdout_mock) = new_session(vec![], MockEvaluator::default());
        let session_exit = session.run(InitBarrier::ready()).await.unwrap();

        assert_eq!(session_exit, SessionExit::InputClosed);
        let output = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
        assert!(output.starts_with(&format!(
            "REPL - Lang LK (v{})\n",
            env!("CARGO_PKG_VERSION")
        )));
        assert!(output.contains("➜ "));
    }

    #[tokio::test]
    async fn test_end_to_end_with_calc_evaluator() {
        let stdout_mock = StdoutMock::default();
        let evaluator = CalcEvaluator::new(Box::new(stdout_mock.clone()));
        let mut session = ReplSession::new(
            ReplConfig::default(),
            Box::new(stdout_mock.clone()),
            gen_input_stream(type_lines(&["1 + 1", "x = 5", "print(x * 3)"])),
            evaluator,
        );

        let session_exit = session.run(InitBarrier::ready()).await.unwrap();

        assert_eq!(session_exit, SessionExit::InputClosed);
        let output = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
        assert!(output.contains("1 + 1\n2\n"));
        assert!(output.contains("print(x * 3)\n15\n"));
        assert_eq!(
            session.readline.history.entries,
            ["1 + 1", "x = 5", "print(x * 3)"]
        );
    }

    #[tokio::test]
    async fn test_multi_line_block_is_submitted_once() {
        let (mut session, _) = new_session(
            type_lines(&["fn f() {", "  x = 1", "}"]),
            MockEvaluator::default(),
        );

        session.run(InitBarrier::ready()).await.unwrap();

        assert_eq!(
            loaded_texts(&session.evaluator),
            vec!["print(fn f() {\n  x = 1\n})"]
        );
        assert_eq!(
            session.readline.history.entries,
            ["fn f() {", "  x = 1", "}"]
        );
        assert!(!session.block_assembler.is_accumulating());
    }

    #[tokio::test]
    async fn test_interrupt_ends_session_without_submitting() {
        let mut events = type_text("1 + 1");
        events.push(ctrl_press('c'));
        events.extend(type_lines(&["2"]));
        let (mut session, _) = new_session(events, MockEvaluator::default());

        let session_exit = session.run(InitBarrier::ready()).await.unwrap();

        assert_eq!(session_exit, SessionExit::Interrupted);
        assert!(session.evaluator.loaded.is_empty());
        assert!(session.readline.history.is_empty());
    }

    #[tokio::test]
    async fn test_escape_ends_session() {
        let (mut session, _) =
            new_session(vec![key_press(KeyCode::Esc)], MockEvaluator::default());
        let session_exit = session.run(InitBarrier::ready()).await.unwrap();
        assert_eq!(session_exit, SessionExit::Interrupted);
    }

    #[tokio::test]
    async fn test_aborted_init_barrier() {
        let (init_signal, init_barrier) = InitBarrier::channel();
        drop(init_signal);
        let (mut session, _) =
            new_session(type_lines(&["1"]), MockEvaluator::default());

        assert!(session.run(init_barrier).await.is_err());
        assert!(session.evaluator.loaded.is_empty());
    }

    #[test]
    fn test_handle_line_skips_empty_lines() {
        let (mut session, _) = new_session(vec![], MockEvaluator::default());

        assert_eq!(session.handle_line(""), None);
        assert!(session.readline.history.is_empty());
        assert!(session.evaluator.loaded.is_empty());
    }

    #[test]
    fn test_handle_line_keeps_whitespace_line_inside_block() {
        let (mut session, _) = new_session(vec![], MockEvaluator::default());

        assert_eq!(session.handle_line("while true {"), None);
        assert_eq!(session.handle_line("  "), None);
        assert!(session.block_assembler.is_accumulating());
        assert!(session.handle_line("}").unwrap().is_success());

        assert_eq!(
            loaded_texts(&session.evaluator),
            vec!["print(while true {\n  \n})"]
        );
        assert_eq!(
            session.readline.history.entries,
            ["while true {", "  ", "}"]
        );
    }

    #[test]
    fn test_handle_line_retries_raw() {
        let (mut session, _) =
            new_session(vec![], MockEvaluator::failing_load(&["print(x = 5)"]));

        let outcome = session.handle_line("x = 5").unwrap();

        assert!(outcome.is_success());
        assert_eq!(
            loaded_texts(&session.evaluator),
            vec!["print(x = 5)", "x = 5"]
        );
    }

    #[test]
    fn test_handle_line_open_block() {
        let (mut session, _) = new_session(vec![], MockEvaluator::default());

        assert_eq!(session.handle_line("while true {"), None);
        assert!(session.block_assembler.is_accumulating());
        assert!(session.readline.history.is_empty());
        assert!(session.handle_line("}").is_some());
    }
}
