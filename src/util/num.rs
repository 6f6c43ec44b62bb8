use std::str::FromStr;

use bigdecimal::{BigDecimal, Signed, ToPrimitive, Zero};

/// Converts a finite `f64` to a decimal.
///
/// The conversion goes through the shortest decimal representation that
/// round-trips to the same float, so `0.1` becomes exactly `0.1` rather than
/// the full binary expansion.
///
/// ## Returns
/// - `Some(BigDecimal)`: the converted value.
/// - `None`: if `value` is NaN or infinite.
///
/// ## Example
/// ```
/// use exprcalc::util::num::f64_to_decimal;
///
/// assert_eq!(f64_to_decimal(0.1).unwrap().to_string(), "0.1");
/// assert!(f64_to_decimal(f64::NAN).is_none());
/// assert!(f64_to_decimal(f64::INFINITY).is_none());
/// ```
#[must_use]
pub fn f64_to_decimal(value: f64) -> Option<BigDecimal> {
    if !value.is_finite() {
        return None;
    }
    BigDecimal::from_str(&value.to_string()).ok()
}

/// Converts a decimal to the nearest finite `f64`.
///
/// ## Returns
/// - `Some(f64)`: the converted value.
/// - `None`: if the magnitude is beyond the range of `f64`.
#[must_use]
pub fn decimal_to_f64(value: &BigDecimal) -> Option<f64> {
    value.to_f64().filter(|v| v.is_finite())
}

/// Divides two decimals, keeping at least `digits` significant digits.
///
/// The quotient is truncated after `digits` or more digits. When the division
/// is inexact a final nonzero digit is appended, so rounding the result to
/// fewer digits gives the same answer as rounding the exact quotient, in any
/// rounding mode.
///
/// `rhs` must not be zero.
///
/// ## Example
/// ```
/// use std::str::FromStr;
///
/// use bigdecimal::BigDecimal;
/// use exprcalc::util::num::divide;
///
/// let ten = BigDecimal::from(10);
///
/// assert_eq!(divide(&ten, &BigDecimal::from(4), 5), BigDecimal::from_str("2.5").unwrap());
/// assert_eq!(divide(&ten, &BigDecimal::from(-3), 5).to_string(), "-3.333331");
/// ```
#[must_use]
pub fn divide(lhs: &BigDecimal, rhs: &BigDecimal, digits: u64) -> BigDecimal {
    let (_, lhs_scale) = lhs.as_bigint_and_exponent();
    let (divisor, rhs_scale) = rhs.as_bigint_and_exponent();

    let shift = digits.saturating_add(rhs.digits())
                      .saturating_sub(lhs.digits())
                      .saturating_add(1);
    let shift = i64::try_from(shift).unwrap_or(i64::MAX);
    let (dividend, _) = lhs.with_scale(lhs_scale.saturating_add(shift))
                           .as_bigint_and_exponent();

    let quotient = &dividend / &divisor;
    let remainder = &dividend % &divisor;
    let scale = lhs_scale.saturating_sub(rhs_scale).saturating_add(shift);

    if remainder.is_zero() {
        BigDecimal::new(quotient, scale)
    } else {
        let sticky = if quotient.is_negative() { -1 } else { 1 };
        BigDecimal::new(quotient * 10 + sticky, scale.saturating_add(1))
    }
}

/// Renders a decimal without exponent notation.
///
/// Negative scales are expanded with trailing zeros and positive scales are
/// printed with a decimal point, so the output can always be read back by the
/// expression parser.
///
/// ## Example
/// ```
/// use std::str::FromStr;
///
/// use bigdecimal::BigDecimal;
/// use exprcalc::util::num::plain_string;
///
/// let big = BigDecimal::from_str("1.5E+3").unwrap();
/// let small = BigDecimal::from_str("-0.0025").unwrap();
///
/// assert_eq!(plain_string(&big), "1500");
/// assert_eq!(plain_string(&small), "-0.0025");
/// ```
#[must_use]
pub fn plain_string(value: &BigDecimal) -> String {
    let (int, scale) = value.as_bigint_and_exponent();
    let text = int.to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };

    if digits.chars().all(|c| c == '0') {
        return "0".to_string();
    }

    let Ok(scale) = usize::try_from(scale) else {
        let zeros = usize::try_from(scale.unsigned_abs()).unwrap_or(usize::MAX);
        return format!("{sign}{digits}{}", "0".repeat(zeros));
    };

    if scale == 0 {
        format!("{sign}{digits}")
    } else if digits.len() > scale {
        let (int_part, fract_part) = digits.split_at(digits.len() - scale);
        format!("{sign}{int_part}.{fract_part}")
    } else {
        format!("{sign}0.{}{digits}", "0".repeat(scale - digits.len()))
    }
}
