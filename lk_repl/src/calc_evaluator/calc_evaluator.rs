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

use std::{collections::HashMap, fmt::Display};

use crossterm::{QueueableCommand, cursor::MoveToColumn};

use super::parser::{BinaryOp, Expr, Statement, parse_program};
use crate::{Evaluator, EvaluatorError, OutputDevice, ResultCount};

/// A runtime value of the calculator language.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(it) => write!(f, "{it}"),
            // Integral numbers are printed without a fraction, eg: `2` not `2.0`.
            Value::Number(it) => write!(f, "{it}"),
            Value::Str(it) => write!(f, "{it}"),
        }
    }
}

/// A parsed chunk, returned by [`CalcEvaluator::load`].
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub source_name: String,
    pub statements: Vec<Statement>,
}

/// A small calculator that stands in for the LK runtime, so that the `lkr` binary is
/// usable on its own. It supports numbers, strings, `nil`, booleans, arithmetic,
/// global variables and `print(..)`. Blocks are not supported and fail to load.
///
/// Globals persist across submissions. Output from `print(..)` goes to the injected
/// [`OutputDevice`], which is expected to be in raw mode, so each line is followed by a
/// carriage return.
pub struct CalcEvaluator {
    pub output_device: OutputDevice,
    pub globals: HashMap<String, Value>,
}

impl std::fmt::Debug for CalcEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalcEvaluator")
            .field("output_device", &"OutputDevice")
            .field("globals", &self.globals)
            .finish()
    }
}

impl CalcEvaluator {
    #[must_use]
    pub fn new(output_device: OutputDevice) -> Self {
        Self {
            output_device,
            globals: HashMap::new(),
        }
    }

    fn eval(&self, expr: &Expr) -> Result<Value, EvaluatorError> {
        match expr {
            Expr::Nil => Ok(Value::Nil),
            Expr::Bool(it) => Ok(Value::Bool(*it)),
            Expr::Number(it) => Ok(Value::Number(*it)),
            Expr::Str(it) => Ok(Value::Str(it.clone())),
            Expr::Var(name) => {
                self.globals
                    .get(name)
                    .cloned()
                    .ok_or_else(|| EvaluatorError::Runtime {
                        message: format!("undefined variable '{name}'"),
                    })
            }
            Expr::Neg(it) => match self.eval(it)? {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(arithmetic_error(&other)),
            },
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                apply_binary(*op, lhs, rhs)
            }
        }
    }

    fn exec(&mut self, statement: &Statement) -> Result<(), EvaluatorError> {
        match statement {
            Statement::Assign { name, expr } => {
                let value = self.eval(expr)?;
                self.globals.insert(name.clone(), value);
            }
            Statement::Print(args) => {
                let values = args
                    .iter()
                    .map(|it| self.eval(it))
                    .collect::<Result<Vec<_>, _>>()?;
                let line = values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\t");
                self.print_line(&line).map_err(|err| EvaluatorError::Runtime {
                    message: err.to_string(),
                })?;
            }
        }
        Ok(())
    }

    fn print_line(&mut self, line: &str) -> std::io::Result<()> {
        let term = &mut self.output_device;
        term.write_all(line.as_bytes())?;
        term.write_all(b"\n")?;
        term.queue(MoveToColumn(0))?;
        term.flush()
    }
}

fn arithmetic_error(value: &Value) -> EvaluatorError {
    EvaluatorError::Runtime {
        message: format!(
            "attempt to perform arithmetic on a {} value",
            value.type_name()
        ),
    }
}

fn apply_binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, EvaluatorError> {
    match (lhs, rhs) {
        (Value::Number(lhs), Value::Number(rhs)) => Ok(Value::Number(match op {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            // Floored, the result has the sign of the divisor.
            BinaryOp::Rem => lhs - (lhs / rhs).floor() * rhs,
        })),
        // At least one side is a string.
        (
            lhs @ (Value::Str(_) | Value::Number(_)),
            rhs @ (Value::Str(_) | Value::Number(_)),
        ) if op == BinaryOp::Add => Ok(Value::Str(format!("{lhs}{rhs}"))),
        (Value::Number(_), other) | (other, _) => Err(arithmetic_error(&other)),
    }
}

impl Evaluator for CalcEvaluator {
    type Loaded = Chunk;

    fn load(
        &mut self,
        source_text: &str,
        source_name: &str,
    ) -> Result<Self::Loaded, EvaluatorError> {
        let statements =
            parse_program(source_text).map_err(|message| EvaluatorError::Load {
                source_name: source_name.to_owned(),
                message,
            })?;
        Ok(Chunk {
            source_name: source_name.to_owned(),
            statements,
        })
    }

    fn call(
        &mut self,
        loaded: Self::Loaded,
        arg_count: usize,
        result_count: ResultCount,
        protected: bool,
    ) -> Result<(), EvaluatorError> {
        tracing::trace!(
            source_name = %loaded.source_name,
            arg_count,
            %result_count,
            protected,
            "calc_evaluator -> call"
        );
        for statement in &loaded.statements {
            self.exec(statement)?;
        }
        Ok(())
    }
}
