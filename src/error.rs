use thiserror::Error as ThisError;

/// Identifier validation errors.
///
/// Raised whenever a variable, function or parameter name does not follow the
/// symbol rules: the first character must be a letter or an underscore, every
/// following character a letter, a digit or an underscore.
pub mod symbol_error;
/// Parsing errors.
///
/// Defines all error types that can occur while scanning and parsing source
/// text. Parse errors include unbalanced parentheses, unknown characters,
/// misplaced operators and empty sub-expressions.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation. Runtime
/// errors include unresolved symbols, division by zero, unsupported powers and
/// runaway recursion of user-defined functions.
pub mod runtime_error;
/// Context errors.
///
/// Errors returned by the binding environment when a lookup fails or a
/// mutation is rejected. A rejected mutation never changes the context.
pub mod context_error;
/// Session errors.
///
/// Statement-level errors of the interactive session, wrapping the errors of
/// every other phase.
pub mod session_error;

pub use context_error::ContextError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use session_error::SessionError;
pub use symbol_error::SymbolError;

/// Any error of the crate, for front ends that report them uniformly.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A malformed expression.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A failed evaluation.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// A rejected context operation.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// A failed session statement.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// A zero digit count was requested for the precision policy.
    #[error("The precision must keep at least one significant digit.")]
    InvalidPrecision,
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
