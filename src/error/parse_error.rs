use thiserror::Error;

use crate::error::SymbolError;

/// Represents all errors that can occur during scanning or parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The numbers of opened and closed parentheses do not match.
    #[error("The numbers of opened and closed parenthesis don't match.")]
    MismatchedParenthesis,
    /// A character that is not part of the grammar.
    #[error("Unrecognized character '{ch}' at position {position}.")]
    UnknownChar {
        /// The offending character.
        ch:       char,
        /// Character index in the parsed text.
        position: usize,
    },
    /// An operand or operator showed up where the other one was expected.
    #[error("{}", unexpected_token_message(.operator_expected, .at_end))]
    UnexpectedToken {
        /// `true` if an operator was expected but an operand was found.
        operator_expected: bool,
        /// `true` if the end of the expression was reached while an operand
        /// was still expected.
        at_end:            bool,
    },
    /// An operator outside the supported set, or operators left over after
    /// precedence reduction.
    #[error("Unknown operator '{op}'.")]
    InvalidOperator {
        /// The operator character.
        op: char,
    },
    /// A sub-expression without any operand, such as `()`.
    #[error("An empty expression was found.")]
    EmptyExpression,
    /// A run of digits and dots that is not a decimal number, such as `1.2.3`.
    #[error("\"{literal}\" at position {position} isn't a valid number.")]
    InvalidNumber {
        /// The literal as written.
        literal:  String,
        /// Character index of the literal in the parsed text.
        position: usize,
    },
    /// `parse_range` was given bounds outside the text or inside a character.
    #[error("{begin}..{end} isn't a valid range of the expression.")]
    InvalidRange {
        /// Requested start byte offset.
        begin: usize,
        /// Requested end byte offset.
        end:   usize,
    },
    /// A symbol name rejected while building an expression node.
    /// Parentheses, calls or operators are nested too deeply.
    #[error("The expression is nested deeper than {max} levels.")]
    TooDeep {
        /// The nesting limit.
        max: usize,
    },
    #[error(transparent)]
    InvalidIdentifier(#[from] SymbolError),
}

fn unexpected_token_message(operator_expected: &bool, at_end: &bool) -> &'static str {
    match (*operator_expected, *at_end) {
        (true, _) => "An operator was expected, but an expression was found.",
        (false, true) => {
            "A sub-expression was expected, but the end of the expression was reached."
        },
        (false, false) => "A sub-expression was expected, but an operator was found.",
    }
}
