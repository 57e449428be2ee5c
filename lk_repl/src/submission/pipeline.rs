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

use crate::{Evaluator, EvaluatorError, ResultCount, SOURCE_NAME, wrap_in_print};

/// Life of one logical statement inside the pipeline.
///
/// ```text
/// WrappedAttempt ──ok──► Done(WrappedSucceeded)
///       │
///      err
///       ▼
///   RawAttempt ──ok──► Done(RawSucceeded)
///       │
///      err
///       ▼
/// Done(Failed)
/// ```
///
/// There are at most two attempts. A load error and a runtime error are handled the
/// same way. A statement that is already a print call is not wrapped, so when it fails
/// there is no raw attempt, it goes straight to `Done(Failed)` with the same error on
/// both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    WrappedAttempt {
        original: String,
        wrapped: String,
    },
    RawAttempt {
        original: String,
        wrapped_error: EvaluatorError,
    },
    Done(SubmissionOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    WrappedSucceeded,
    RawSucceeded {
        wrapped_error: EvaluatorError,
    },
    /// Every attempt failed. Nothing is shown to the user.
    Failed {
        wrapped_error: EvaluatorError,
        raw_error: EvaluatorError,
    },
}

impl SubmissionOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool { !matches!(self, SubmissionOutcome::Failed { .. }) }
}

impl SubmissionState {
    #[must_use]
    pub fn start(statement: &str) -> Self {
        SubmissionState::WrappedAttempt {
            original: statement.to_owned(),
            wrapped: wrap_in_print(statement).into_owned(),
        }
    }
}

/// Hands complete statements to an [`Evaluator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPipeline {
    pub source_name: String,
}

impl Default for SubmissionPipeline {
    fn default() -> Self { Self::new(SOURCE_NAME) }
}

impl SubmissionPipeline {
    #[must_use]
    pub fn new(source_name: &str) -> Self {
        Self {
            source_name: source_name.to_owned(),
        }
    }

    /// Run `statement` through the state machine until it is [`SubmissionState::Done`].
    pub fn submit<E: Evaluator>(
        &self,
        evaluator: &mut E,
        statement: &str,
    ) -> SubmissionOutcome {
        let mut state = SubmissionState::start(statement);
        loop {
            state = match state {
                SubmissionState::Done(outcome) => {
                    match &outcome {
                        SubmissionOutcome::Failed {
                            wrapped_error,
                            raw_error,
                        } => tracing::debug!(
                            %wrapped_error,
                            %raw_error,
                            "submission failed, discarded"
                        ),
                        _ => tracing::debug!(?outcome, "submission done"),
                    }
                    return outcome;
                }
                in_progress => self.step(evaluator, in_progress),
            };
        }
    }

    /// Advance by one transition. [`SubmissionState::Done`] is returned as is.
    pub fn step<E: Evaluator>(
        &self,
        evaluator: &mut E,
        state: SubmissionState,
    ) -> SubmissionState {
        match state {
            SubmissionState::WrappedAttempt { original, wrapped } => {
                match self.attempt(evaluator, &wrapped) {
                    Ok(()) => SubmissionState::Done(SubmissionOutcome::WrappedSucceeded),
                    // Already a print call: the raw text is the text that just ran, and
                    // a statement runs at most once.
                    Err(wrapped_error) if wrapped == original => {
                        tracing::debug!(%wrapped_error, "print call failed, no raw retry");
                        SubmissionState::Done(SubmissionOutcome::Failed {
                            raw_error: wrapped_error.clone(),
                            wrapped_error,
                        })
                    }
                    Err(wrapped_error) => {
                        tracing::debug!(%wrapped_error, "wrapped attempt failed, retry raw");
                        SubmissionState::RawAttempt {
                            original,
                            wrapped_error,
                        }
                    }
                }
            }
            SubmissionState::RawAttempt {
                original,
                wrapped_error,
            } => match self.attempt(evaluator, &original) {
                Ok(()) => {
                    SubmissionState::Done(SubmissionOutcome::RawSucceeded { wrapped_error })
                }
                Err(raw_error) => SubmissionState::Done(SubmissionOutcome::Failed {
                    wrapped_error,
                    raw_error,
                }),
            },
            done @ SubmissionState::Done(_) => done,
        }
    }

    fn attempt<E: Evaluator>(
        &self,
        evaluator: &mut E,
        source_text: &str,
    ) -> Result<(), EvaluatorError> {
        let loaded = evaluator.load(source_text, &self.source_name)?;
        evaluator.call(loaded, 0, ResultCount::Variable, true)
    }
}

#[cfg(test)]
pub(crate) mod my_fixtures {
    use std::collections::HashSet;

    use crate::{Evaluator, EvaluatorError, ResultCount};

    /// Records every load and call. Fails loads (or calls) for the texts in the given
    /// sets.
    #[derive(Debug, Default)]
    pub struct MockEvaluator {
        pub fail_load: HashSet<String>,
        pub fail_call: HashSet<String>,
        pub loaded: Vec<(String, String)>,
        pub called: Vec<(String, usize, ResultCount, bool)>,
    }

    impl MockEvaluator {
        pub fn failing_load(texts: &[&str]) -> Self {
            Self {
                fail_load: texts.iter().map(ToString::to_string).collect(),
                ..Default::default()
            }
        }
    }

    impl Evaluator for MockEvaluator {
        type Loaded = String;

        fn load(
            &mut self,
            source_text: &str,
            source_name: &str,
        ) -> Result<String, EvaluatorError> {
            self.loaded
                .push((source_text.to_owned(), source_name.to_owned()));
            if self.fail_load.contains(source_text) {
                return Err(EvaluatorError::Load {
                    source_name: source_name.to_owned(),
                    message: "syntax error".into(),
                });
            }
            Ok(source_text.to_owned())
        }

        fn call(
            &mut self,
            loaded: String,
            arg_count: usize,
            result_count: ResultCount,
            protected: bool,
        ) -> Result<(), EvaluatorError> {
            let fail = self.fail_call.contains(&loaded);
            self.called.push((loaded, arg_count, result_count, protected));
            if fail {
                return Err(EvaluatorError::Runtime {
                    message: "boom".into(),
                });
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use lk_test_fixtures::StdoutMock;
    use pretty_assertions::assert_eq;

    use super::{my_fixtures::MockEvaluator, *};
    use crate::{CalcEvaluator, Value};

    fn loaded_texts(evaluator: &MockEvaluator) -> Vec<&str> {
        evaluator.loaded.iter().map(|(text, _)| text.as_str()).collect()
    }

    #[test]
    fn test_wrapped_attempt_succeeds() {
        let mut evaluator = MockEvaluator::default();
        let outcome = SubmissionPipeline::default().submit(&mut evaluator, "1 + 1");

        assert_eq!(outcome, SubmissionOutcome::WrappedSucceeded);
        assert_eq!(evaluator.loaded, vec![("print(1 + 1)".into(), "stdin".into())]);
        assert_eq!(
            evaluator.called,
            vec![("print(1 + 1)".into(), 0, ResultCount::Variable, true)]
        );
    }

    #[test]
    fn test_wrapped_load_failure_retries_raw() {
        let mut evaluator = MockEvaluator::failing_load(&["print(x = 5)"]);
        let outcome = SubmissionPipeline::default().submit(&mut evaluator, "x = 5");

        assert!(matches!(
            outcome,
            SubmissionOutcome::RawSucceeded {
                wrapped_error: EvaluatorError::Load { .. }
            }
        ));
        assert_eq!(loaded_texts(&evaluator), vec!["print(x = 5)", "x = 5"]);
    }

    #[test]
    fn test_wrapped_runtime_failure_retries_raw() {
        let mut evaluator = MockEvaluator::default();
        evaluator.fail_call.insert("print(f())".into());
        let outcome = SubmissionPipeline::default().submit(&mut evaluator, "f()");

        assert!(outcome.is_success());
        assert_eq!(loaded_texts(&evaluator), vec!["print(f())", "f()"]);
    }

    #[test]
    fn test_second_failure_is_swallowed_after_two_attempts() {
        let mut evaluator = MockEvaluator::failing_load(&["print(if)", "if"]);
        let outcome = SubmissionPipeline::default().submit(&mut evaluator, "if");

        assert!(!outcome.is_success());
        assert!(matches!(outcome, SubmissionOutcome::Failed { .. }));
        assert_eq!(evaluator.loaded.len(), 2);
        assert!(evaluator.called.is_empty());
    }

    #[test]
    fn test_failing_print_call_runs_once() {
        let mut evaluator = MockEvaluator::default();
        evaluator.fail_call.insert("print(f())".into());
        let outcome = SubmissionPipeline::default().submit(&mut evaluator, "print(f())");

        assert_eq!(
            outcome,
            SubmissionOutcome::Failed {
                wrapped_error: EvaluatorError::Runtime {
                    message: "boom".into()
                },
                raw_error: EvaluatorError::Runtime {
                    message: "boom".into()
                },
            }
        );
        assert_eq!(loaded_texts(&evaluator), vec!["print(f())"]);
        assert_eq!(evaluator.called.len(), 1);
    }

    #[test]
    fn test_side_effects_before_a_runtime_error_happen_once() {
        let stdout_mock = StdoutMock::default();
        let mut evaluator = CalcEvaluator::new(Box::new(stdout_mock.clone()));
        let pipeline = SubmissionPipeline::default();

        assert!(pipeline.submit(&mut evaluator, "x = 1").is_success());
        let outcome = pipeline.submit(&mut evaluator, "x = x + 1; print(x); print(z)");

        assert!(!outcome.is_success());
        assert_eq!(evaluator.globals.get("x"), Some(&Value::Number(2.0)));
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string_strip_ansi(), "2\n");
    }

    #[test]
    fn test_print_call_is_not_rewrapped() {
        let mut evaluator = MockEvaluator::default();
        SubmissionPipeline::default().submit(&mut evaluator, "print(1)");
        assert_eq!(loaded_texts(&evaluator), vec!["print(1)"]);
    }

    #[test]
    fn test_step_by_step() {
        let pipeline = SubmissionPipeline::new("repl");
        let mut evaluator = MockEvaluator::failing_load(&["print(x = 5)"]);

        let state = SubmissionState::start("x = 5");
        assert_eq!(
            state,
            SubmissionState::WrappedAttempt {
                original: "x = 5".into(),
                wrapped: "print(x = 5)".into(),
            }
        );

        let state = pipeline.step(&mut evaluator, state);
        assert!(matches!(state, SubmissionState::RawAttempt { .. }));

        let state = pipeline.step(&mut evaluator, state);
        let SubmissionState::Done(outcome) = state.clone() else {
            panic!("expected done");
        };
        assert!(outcome.is_success());

        // Done is a fixed point.
        assert_eq!(pipeline.step(&mut evaluator, state.clone()), state);
        assert_eq!(evaluator.loaded[0].1, "repl");
    }
}
