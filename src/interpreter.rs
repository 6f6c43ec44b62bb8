/// The evaluator module computes the value of expression trees.
///
/// The evaluator walks an [`Expr`](crate::ast::Expr) against a binding
/// context, resolving variables and functions and applying the context's
/// precision policy to every arithmetic result.
///
/// # Responsibilities
/// - Holds the binding context: variables, functions, readonly flags and
///   observers.
/// - Evaluates nodes in post-order and reports each step.
/// - Reports runtime errors such as division by zero or undefined symbols.
pub mod evaluator;
/// The lexer module classifies the characters of an expression into tokens.
///
/// The parser pulls tokens one at a time and skips over parenthesised groups
/// it parsed recursively, so there is no separate tokenizing pass.
pub mod lexer;
/// The parser module builds expression trees from text.
///
/// # Responsibilities
/// - Scans a span of text into operands and operators, recursing into
///   parentheses and argument lists.
/// - Reduces operators by precedence into a single tree.
/// - Parses the statements of the interactive session.
pub mod parser;
/// Parse and evaluation steps.
///
/// The step log is an optional, caller-owned sink receiving one entry per
/// parsed span and per evaluated node.
pub mod step;
/// Symbol name rules shared by variables, functions and parameters.
pub mod symbol;
/// The value module defines the numeric type of the language.
///
/// # Responsibilities
/// - Defines `Number`, an arbitrary-precision decimal.
/// - Defines `Precision`, the rounding policy applied after each operation.
pub mod value;
