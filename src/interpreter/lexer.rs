use logos::Logos;

use crate::ast::BinaryOperator;

/// Represents a lexical token of an expression.
///
/// The parser drives the lexer one token at a time while it scans a span, and
/// skips whole parenthesised groups with [`logos::Lexer::bump`] after parsing
/// them recursively, so the input is never tokenized ahead of the parser.
///
/// Characters matching no variant are reported by the lexer as an error and
/// turned into `UnknownChar` by the parser.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    /// A run of digits and decimal points, such as `3.14`, `.5` or `1.2.3`.
    /// Whether the run is a valid number is decided by the parser.
    #[regex(r"[0-9.]+")]
    Number,
    /// Identifier tokens; variable or function names such as `x` or `sqrt`.
    /// The classes are those of [`crate::interpreter::symbol`], so every name
    /// accepted there lexes as one identifier.
    #[regex(r"[_\p{Alphabetic}][_\p{Alphabetic}\p{N}]*")]
    Identifier,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `^`
    #[token("^")]
    Caret,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `,`
    #[token(",")]
    Comma,
    /// Spaces and tabs.
    #[regex(r"[ \t]+", logos::skip)]
    Ignored,
}

impl Token {
    /// Returns the binary operator represented by this token, if any.
    ///
    /// # Example
    /// ```
    /// use exprcalc::{ast::BinaryOperator, interpreter::lexer::Token};
    ///
    /// assert_eq!(Token::Caret.operator(), Some(BinaryOperator::Pow));
    /// assert_eq!(Token::Comma.operator(), None);
    /// ```
    #[must_use]
    pub const fn operator(self) -> Option<BinaryOperator> {
        match self {
            Self::Plus => Some(BinaryOperator::Add),
            Self::Minus => Some(BinaryOperator::Sub),
            Self::Star => Some(BinaryOperator::Mul),
            Self::Slash => Some(BinaryOperator::Div),
            Self::Caret => Some(BinaryOperator::Pow),
            _ => None,
        }
    }

    /// Tests whether the token can act as a unary sign.
    #[must_use]
    pub const fn is_sign(self) -> bool {
        matches!(self, Self::Plus | Self::Minus)
    }
}
