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

use thiserror::Error;

/// How many results the caller wants back from [`Evaluator::call`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ResultCount {
    /// Keep every value that the chunk returns.
    Variable,
}

/// Both ways in which handing source text to the language can fail. The submission
/// pipeline treats them the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluatorError {
    /// The source text is malformed.
    #[error("[{source_name}] load error: {message}")]
    Load {
        source_name: String,
        message: String,
    },

    /// The loaded chunk failed while running.
    #[error("runtime error: {message}")]
    Runtime { message: String },
}

/// The boundary to the language runtime (parser, compiler, VM). The REPL only ever:
/// 1. loads a statement with the source name `"stdin"`,
/// 2. calls the loaded chunk with zero arguments, [`ResultCount::Variable`] results, in
///    protected mode.
///
/// Calls are synchronous. There is no timeout, a chunk that never returns hangs the
/// session.
pub trait Evaluator {
    /// A compiled chunk, ready to be called.
    type Loaded;

    /// # Errors
    ///
    /// [`EvaluatorError::Load`] when `source_text` is malformed.
    fn load(
        &mut self,
        source_text: &str,
        source_name: &str,
    ) -> Result<Self::Loaded, EvaluatorError>;

    /// When `protected` is true, failures are reported as [`Err`] instead of aborting.
    ///
    /// # Errors
    ///
    /// [`EvaluatorError::Runtime`] when the chunk fails.
    fn call(
        &mut self,
        loaded: Self::Loaded,
        arg_count: usize,
        result_count: ResultCount,
        protected: bool,
    ) -> Result<(), EvaluatorError>;
}
