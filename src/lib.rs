//! # exprcalc
//!
//! exprcalc is an arithmetic expression language written in Rust.
//! It parses expressions made of decimal numbers, variables, function calls,
//! the binary operators `+ - * / ^` and parentheses, and evaluates them with
//! arbitrary-precision decimals against a context of variables and functions.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    error::SessionError,
    interpreter::{step::NoSteps, value::core::Number},
    session::{Outcome, Session},
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` enum representing an arithmetic
/// expression as a tree, the binary operators, and the statements of the
/// interactive session. Trees are built by the parser and walked by the
/// evaluator.
///
/// # Responsibilities
/// - Defines the closed set of expression nodes and their rendering.
/// - Substitutes parameter values into function bodies.
/// - Defines the session statements and commands.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while parsing, while
/// evaluating, when the context rejects an operation, or when a session
/// statement is malformed.
///
/// # Responsibilities
/// - Defines one error enum per phase.
/// - Renders every error as a human readable message.
pub mod error;
/// Orchestrates the entire process of expression evaluation.
///
/// This module ties together lexing, parsing, evaluation, the binding
/// context and the numeric types. It exposes the public API for parsing and
/// evaluating expressions.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator and values.
/// - Provides entry points for parsing and evaluating user input.
/// - Reports the steps of both phases to an optional sink.
pub mod interpreter;
/// The interactive session.
///
/// Executes statements line by line against a context: expressions,
/// assignments, deletions, function definitions and commands.
pub mod session;
/// General utilities for numeric conversion.
///
/// This module provides the conversions between decimals and floats used by
/// the transcendental builtins, and the plain rendering of decimals.
pub mod util;

/// Returns the value of the last expression of a script.
///
/// Every line of `source` is executed as a session statement in a fresh
/// context, stopping at the first error or at the `exit` command. Blank lines
/// are skipped.
///
/// # Returns
/// - `Ok(Some(value))` with the value of the last expression line.
/// - `Ok(None)` if the script has no expression line.
///
/// # Errors
/// Returns the error of the first failing statement.
///
/// # Examples
/// ```
/// use exprcalc::get_result;
///
/// let source = "x = 2 + 2\nx * 3";
/// assert_eq!(get_result(source).unwrap().unwrap().to_string(), "12");
///
/// // Unknown variable.
/// let source = "y = x + 1";
/// assert!(get_result(source).is_err());
/// ```
pub fn get_result(source: &str) -> Result<Option<Number>, SessionError> {
    let mut session = Session::new();
    let mut result = None;

    for line in source.lines() {
        match session.execute_line(line, &mut NoSteps)? {
            Outcome::Exit => break,
            Outcome::Value(value) => result = Some(value),
            _ => {},
        }
    }

    Ok(result)
}
