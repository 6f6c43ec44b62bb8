/// Numeric conversion helpers.
///
/// This module provides the conversions between `BigDecimal` and `f64` used by
/// the transcendental builtins, and the plain (non-scientific) rendering of
/// decimals used when printing values and expression trees.
///
/// Conversions return an `Option`, which is `None` whenever the value cannot be
/// represented on the other side (non-finite floats, magnitudes beyond `f64`).
pub mod num;
