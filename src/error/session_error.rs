use thiserror::Error;

use crate::error::{ContextError, ParseError, RuntimeError};

/// Represents every error a single session statement can produce.
///
/// The `Display` output is prefixed with `Expression error:` for the errors
/// of the expression engine, like the interactive front end prints them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The expression or a statement part failed to parse.
    #[error("Expression error: {0}")]
    Parse(#[from] ParseError),
    /// The expression failed to evaluate.
    #[error("Expression error: {0}")]
    Runtime(#[from] RuntimeError),
    /// The context rejected a mutation.
    #[error("Expression error: {0}")]
    Context(#[from] ContextError),
    /// A command word was used as a symbol name.
    #[error("{name} is a reserved word and can't be used as symbol name.")]
    ReservedWord {
        /// The reserved word.
        name: String,
    },
    /// A statement contained more than one `=`.
    #[error("Only one = operator per command is allowed.")]
    OnlyOneEquality,
    /// A function deletion listed parameter names instead of an arity.
    #[error(
        "Incorrect syntax. To delete a function, the number of arguments must be specified (e.g. \"fun(2)=\" to delete \"fun(x, y)\")."
    )]
    IncorrectDelete,
}
