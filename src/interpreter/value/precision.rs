use std::{fmt, num::NonZeroU64};

use bigdecimal::{BigDecimal, Context as DecimalContext, RoundingMode, Zero};

use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Significant digits of the `decimal32` preset.
pub const DECIMAL32_DIGITS: u64 = 7;
/// Significant digits of the `decimal64` preset, the default policy.
pub const DECIMAL64_DIGITS: u64 = 16;
/// Significant digits of the `decimal128` preset.
pub const DECIMAL128_DIGITS: u64 = 34;
/// Largest adjusted exponent magnitude of a result, unless configured
/// otherwise.
pub const DEFAULT_MAX_EXPONENT: u64 = 999_999;

/// Rounding policy applied after every arithmetic operation.
///
/// A precision is a number of significant digits together with the rounding
/// mode used to drop the digits beyond it, and the largest magnitude of the
/// adjusted exponent a result may have (the exponent of its leading digit, so
/// `1500` has 3 and `0.02` has -2). It is attached to a
/// [`Context`](crate::interpreter::evaluator::core::Context) and can be
/// replaced at any time; the new policy applies to every evaluation that
/// follows, values already stored in the context keep their digits.
///
/// # Example
/// ```
/// use bigdecimal::RoundingMode;
/// use exprcalc::interpreter::value::{core::Number, precision::Precision};
///
/// let precision = Precision::new(3, RoundingMode::HalfUp).unwrap();
/// let third = Number::from(1).div(&Number::from(3), &precision).unwrap();
///
/// assert_eq!(third.to_string(), "0.333");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    digits:       NonZeroU64,
    rounding:     RoundingMode,
    max_exponent: u64,
}

const fn non_zero(digits: u64) -> NonZeroU64 {
    match NonZeroU64::new(digits) {
        Some(d) => d,
        None => NonZeroU64::MIN,
    }
}

impl Precision {
    /// Creates a policy keeping `digits` significant digits.
    ///
    /// Returns `None` when `digits` is zero.
    #[must_use]
    pub fn new(digits: u64, rounding: RoundingMode) -> Option<Self> {
        NonZeroU64::new(digits).map(|digits| Self { digits,
                                                    rounding,
                                                    max_exponent: DEFAULT_MAX_EXPONENT })
    }

    /// 7 digits, half-even rounding.
    #[must_use]
    pub const fn decimal32() -> Self {
        Self { digits:       non_zero(DECIMAL32_DIGITS),
               rounding:     RoundingMode::HalfEven,
               max_exponent: DEFAULT_MAX_EXPONENT, }
    }

    /// 16 digits, half-even rounding.
    #[must_use]
    pub const fn decimal64() -> Self {
        Self { digits:       non_zero(DECIMAL64_DIGITS),
               rounding:     RoundingMode::HalfEven,
               max_exponent: DEFAULT_MAX_EXPONENT, }
    }

    /// 34 digits, half-even rounding.
    #[must_use]
    pub const fn decimal128() -> Self {
        Self { digits:       non_zero(DECIMAL128_DIGITS),
               rounding:     RoundingMode::HalfEven,
               max_exponent: DEFAULT_MAX_EXPONENT, }
    }

    /// The number of significant digits kept.
    #[must_use]
    pub const fn digits(&self) -> u64 {
        self.digits.get()
    }

    /// The rounding mode used to drop extra digits.
    #[must_use]
    pub const fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// The largest adjusted exponent magnitude accepted in a result.
    #[must_use]
    pub const fn max_exponent(&self) -> u64 {
        self.max_exponent
    }

    /// Returns a copy of this policy with another exponent bound.
    ///
    /// # Example
    /// ```
    /// use exprcalc::interpreter::value::{core::Number, precision::Precision};
    ///
    /// let precision = Precision::default().with_max_exponent(3);
    /// let ten = Number::from(10);
    ///
    /// assert!(ten.pow(&Number::from(3), &precision).is_ok());
    /// assert!(ten.pow(&Number::from(4), &precision).is_err());
    /// assert!(ten.pow(&Number::from(-4), &precision).is_err());
    /// ```
    #[must_use]
    pub const fn with_max_exponent(self, max_exponent: u64) -> Self {
        Self { max_exponent, ..self }
    }

    /// Returns a copy of this policy keeping `extra` more digits.
    ///
    /// Used for intermediate results that are rounded again later.
    #[must_use]
    pub const fn widened(&self, extra: u64) -> Self {
        Self { digits: non_zero(self.digits.get().saturating_add(extra)),
               ..*self }
    }

    /// A bigdecimal context keeping `extra` more digits than this policy,
    /// rounding half-even, for operations rounded again afterwards.
    #[must_use]
    pub fn decimal_context(&self, extra: u64) -> DecimalContext {
        DecimalContext::new(self.digits.saturating_add(extra), RoundingMode::HalfEven)
    }

    /// Rounds `value` to this policy and checks its exponent.
    ///
    /// # Errors
    /// [`RuntimeError::ExponentOutOfRange`] if the magnitude of the adjusted
    /// exponent of the rounded value exceeds [`Precision::max_exponent`].
    pub fn bounded(&self, value: &BigDecimal) -> EvalResult<BigDecimal> {
        let rounded = self.round(value);
        if rounded.is_zero() {
            return Ok(rounded);
        }

        let (_, scale) = rounded.as_bigint_and_exponent();
        let adjusted = i128::from(rounded.digits()) - 1 - i128::from(scale);
        if adjusted.unsigned_abs() > u128::from(self.max_exponent) {
            return Err(RuntimeError::ExponentOutOfRange { max_exponent: self.max_exponent });
        }
        Ok(rounded)
    }

    /// Rounds `value` to this policy.
    ///
    /// Values that already fit are returned unchanged (apart from trailing
    /// zeros, which are stripped).
    #[must_use]
    pub fn round(&self, value: &BigDecimal) -> BigDecimal {
        let digits = value.digits();
        if digits <= self.digits.get() {
            return value.normalized();
        }

        let (_, scale) = value.as_bigint_and_exponent();
        let excess = i64::try_from(digits - self.digits.get()).unwrap_or(i64::MAX);

        value.with_scale_round(scale.saturating_sub(excess), self.rounding)
             .normalized()
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::decimal64()
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
               "{} digits, {:?}, exponent within ±{}",
               self.digits, self.rounding, self.max_exponent)
    }
}
