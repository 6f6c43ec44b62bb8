/// Arbitrary-precision decimal values.
///
/// Defines the `Number` type produced by every evaluation. All arithmetic
/// goes through methods that take the active [`precision::Precision`] and round
/// their result to it.
pub mod core;
/// Precision policies.
///
/// Defines the digit count and rounding mode applied after every arithmetic
/// operation, together with the common decimal presets.
pub mod precision;
