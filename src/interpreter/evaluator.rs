/// Core evaluation logic and context management.
///
/// Contains the binding context, the evaluation entry points and the
/// dispatch over expression nodes.
pub mod core;

/// Binary operator evaluation logic.
///
/// Applies `+ - * / ^` under the precision policy of the context.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation.
pub mod unary;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls.
pub mod function;

/// Context operations.
///
/// Variable and function storage, readonly checks, clearing and observer
/// notification, plus small helpers shared by the builtins.
pub mod utils;
