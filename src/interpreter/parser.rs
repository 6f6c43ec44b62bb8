/// Core parsing entry points.
///
/// Scans a span of source text left to right, recursing into parenthesised
/// groups and argument lists, and hands operands and operators to an
/// [`binary::ExpressionList`] for precedence reduction.
pub mod core;

/// Precedence reduction.
///
/// Holds the flat list of operands and operators collected for one span and
/// folds it into a single tree, one precedence level at a time.
pub mod binary;

/// Utility functions for the parser.
///
/// Parenthesis matching and argument splitting over raw source spans.
pub mod utils;

/// Statement parsing.
///
/// Splits a line of the interactive session into a command, an assignment,
/// a deletion, a function definition or a plain expression.
pub mod statement;
