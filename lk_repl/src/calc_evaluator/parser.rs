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

//! `nom` parser for the calculator language.
//!
//! ```text
//! program    := blank (statement (separator statement)*)? blank EOF
//! statement  := identifier "=" expr | "print" "(" (expr ("," expr)*)? ")"
//! expr       := term (("+" | "-") term)*
//! term       := unary (("*" | "/" | "%") unary)*
//! unary      := "-" unary | primary
//! primary    := "(" expr ")" | string | identifier | number
//! separator  := ";" | newline
//! ```

use nom::{IResult, Parser,
          branch::alt,
          bytes::complete::{tag, take_while, take_while1},
          character::complete::{char, multispace1, one_of, space0},
          combinator::{all_consuming, map, recognize, value},
          multi::{many0, separated_list0},
          number::complete::double,
          sequence::{delimited, preceded}};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
    Var(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assign { name: String, expr: Expr },
    Print(Vec<Expr>),
}

/// Parse a whole chunk. All of `input` must be consumed.
///
/// # Errors
///
/// A human readable message pointing at the input that could not be parsed.
pub fn parse_program(input: &str) -> Result<Vec<Statement>, String> {
    match program(input) {
        Ok((_, statements)) => Ok(statements),
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => {
            let near: String = err.input.chars().take(20).collect();
            Err(format!("unexpected input near {near:?}"))
        }
        Err(nom::Err::Incomplete(_)) => Err("incomplete input".to_owned()),
    }
}

fn program(input: &str) -> IResult<&str, Vec<Statement>> {
    all_consuming(delimited(
        blank,
        separated_list0(separator, statement),
        blank,
    ))
    .parse(input)
}

/// Whitespace (including newlines) and empty statements.
fn blank(input: &str) -> IResult<&str, ()> {
    value((), many0(alt((multispace1, tag(";"))))).parse(input)
}

fn separator(input: &str) -> IResult<&str, ()> {
    value((), (space0, one_of(";\r\n"), blank)).parse(input)
}

fn statement(input: &str) -> IResult<&str, Statement> {
    alt((assignment, print_statement)).parse(input)
}

fn assignment(input: &str) -> IResult<&str, Statement> {
    map(
        (identifier, space0, char('='), space0, expr),
        |(name, _, _, _, expr)| Statement::Assign {
            name: name.to_owned(),
            expr,
        },
    )
    .parse(input)
}

fn print_statement(input: &str) -> IResult<&str, Statement> {
    map(
        preceded(
            (tag("print"), space0),
            delimited(
                (char('('), space0),
                separated_list0((space0, char(','), space0), expr),
                (space0, char(')')),
            ),
        ),
        Statement::Print,
    )
    .parse(input)
}

pub fn expr(input: &str) -> IResult<&str, Expr> {
    let add_op = alt((value(BinaryOp::Add, char('+')), value(BinaryOp::Sub, char('-'))));
    let (input, first) = term(input)?;
    let (input, rest) = many0((delimited(space0, add_op, space0), term)).parse(input)?;
    Ok((input, fold_binary(first, rest)))
}

fn term(input: &str) -> IResult<&str, Expr> {
    let mul_op = alt((
        value(BinaryOp::Mul, char('*')),
        value(BinaryOp::Div, char('/')),
        value(BinaryOp::Rem, char('%')),
    ));
    let (input, first) = unary(input)?;
    let (input, rest) = many0((delimited(space0, mul_op, space0), unary)).parse(input)?;
    Ok((input, fold_binary(first, rest)))
}

fn fold_binary(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    rest.into_iter().fold(first, |lhs, (op, rhs)| Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    })
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded((char('-'), space0), unary), |it| {
            Expr::Neg(Box::new(it))
        }),
        primary,
    ))
    .parse(input)
}

fn primary(input: &str) -> IResult<&str, Expr> {
    alt((
        delimited((char('('), space0), expr, (space0, char(')'))),
        string_literal,
        // Before numbers, so that `inf` and `nan` are names.
        map(identifier, |name| match name {
            "nil" => Expr::Nil,
            "true" => Expr::Bool(true),
            "false" => Expr::Bool(false),
            _ => Expr::Var(name.to_owned()),
        }),
        map(double, Expr::Number),
    ))
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, Expr> {
    map(
        alt((
            delimited(char('"'), take_while(|ch| ch != '"'), char('"')),
            delimited(char('\''), take_while(|ch| ch != '\''), char('\'')),
        )),
        |it: &str| Expr::Str(it.to_owned()),
    )
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize((
        take_while1(|ch: char| ch.is_alphabetic() || ch == '_'),
        take_while(|ch: char| ch.is_alphanumeric() || ch == '_'),
    ))
    .parse(input)
}
