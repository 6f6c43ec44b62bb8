use thiserror::Error;

/// Represents a malformed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// The identifier was the empty string.
    #[error("The empty string isn't a valid symbol identifier.")]
    Empty,
    /// The identifier contains a character that is not allowed at its position.
    #[error("\"{name}\" isn't a valid symbol name because it contains the '{ch}' character.")]
    InvalidChar {
        /// The rejected identifier.
        name:  String,
        /// Character index of the first offending character.
        index: usize,
        /// The offending character.
        ch:    char,
    },
}
