/// Function definitions and call dispatch.
///
/// Declares the builtin table and user-defined functions, and evaluates
/// calls by exact name and arity.
pub mod core;
/// Built-in function implementations.
///
/// The trigonometric functions and the logarithm go through `f64`; `sqrt` and
/// `abs` use decimal arithmetic.
pub mod builtin;
