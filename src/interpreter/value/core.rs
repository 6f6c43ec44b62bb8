use std::{fmt, str::FromStr};

use bigdecimal::{BigDecimal, ParseBigDecimalError, Signed, ToPrimitive, Zero};

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::precision::Precision},
    util::num::{decimal_to_f64, divide, f64_to_decimal, plain_string},
};

/// Largest exponent magnitude accepted by integer powers.
pub const MAX_INTEGER_EXPONENT: i64 = 999_999_999;

/// Extra digits carried by the intermediate products of integer powers.
const POWER_GUARD_DIGITS: u64 = 10;

/// Extra digits computed by divisions and square roots before rounding.
pub(crate) const GUARD_DIGITS: u64 = 3;

/// Represents a runtime value of the language.
///
/// Every expression evaluates to a `Number`: an arbitrary-precision decimal.
/// Arithmetic is performed exactly (or, for quotients, to enough digits to
/// round correctly) and then rounded to the [`Precision`] passed by the
/// caller, which is how the evaluator applies the context's policy to every
/// intermediate result. Results whose exponent leaves the range of the policy
/// are rejected.
///
/// Equality compares numeric values, so `2.50` equals `2.5`.
///
/// # Example
/// ```
/// use exprcalc::interpreter::value::{core::Number, precision::Precision};
///
/// let precision = Precision::default();
/// let a: Number = "0.1".parse().unwrap();
/// let b: Number = "0.2".parse().unwrap();
///
/// assert_eq!(a.add(&b, &precision).unwrap().to_string(), "0.3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Number(BigDecimal);

impl From<BigDecimal> for Number {
    fn from(value: BigDecimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl FromStr for Number {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigDecimal::from_str(s).map(Self)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", plain_string(&self.0.normalized()))
    }
}

impl Number {
    /// Converts a finite float, returning `None` for NaN and infinities.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        f64_to_decimal(value).map(Self)
    }

    /// The underlying decimal.
    #[must_use]
    pub const fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Converts to the nearest `f64`, or `None` when out of range.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        decimal_to_f64(&self.0)
    }

    /// Tests whether the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Tests whether the value is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Tests whether the value has no fractional part.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    /// Rounds the value to `precision`.
    #[must_use]
    pub fn round(&self, precision: &Precision) -> Self {
        Self(precision.round(&self.0))
    }

    /// Returns the additive inverse. Negation is exact.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self(-self.0.clone())
    }

    /// Returns the absolute value. Exact.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// `self + rhs`, rounded.
    ///
    /// # Errors
    /// [`RuntimeError::ExponentOutOfRange`] if the sum leaves the exponent
    /// range of `precision`.
    pub fn add(&self, rhs: &Self, precision: &Precision) -> EvalResult<Self> {
        precision.bounded(&(&self.0 + &rhs.0)).map(Self)
    }

    /// `self - rhs`, rounded.
    ///
    /// # Errors
    /// As for [`Number::add`].
    pub fn sub(&self, rhs: &Self, precision: &Precision) -> EvalResult<Self> {
        precision.bounded(&(&self.0 - &rhs.0)).map(Self)
    }

    /// `self * rhs`, rounded.
    ///
    /// # Errors
    /// As for [`Number::add`].
    pub fn mul(&self, rhs: &Self, precision: &Precision) -> EvalResult<Self> {
        precision.bounded(&(&self.0 * &rhs.0)).map(Self)
    }

    /// `self / rhs`, correctly rounded to `precision` whatever its number of
    /// digits.
    ///
    /// # Errors
    /// - [`RuntimeError::DivisionByZero`] if `rhs` is zero.
    /// - [`RuntimeError::ExponentOutOfRange`] if the quotient leaves the
    ///   exponent range of `precision`.
    ///
    /// # Example
    /// ```
    /// use bigdecimal::RoundingMode;
    /// use exprcalc::interpreter::value::{core::Number, precision::Precision};
    ///
    /// let precision = Precision::new(120, RoundingMode::HalfEven).unwrap();
    /// let third = Number::from(1).div(&Number::from(3), &precision).unwrap();
    ///
    /// assert_eq!(third.to_string(), format!("0.{}", "3".repeat(120)));
    /// ```
    pub fn div(&self, rhs: &Self, precision: &Precision) -> EvalResult<Self> {
        if rhs.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Self::default());
        }
        let quotient = divide(&self.0, &rhs.0, precision.digits().saturating_add(GUARD_DIGITS));
        precision.bounded(&quotient).map(Self)
    }

    /// `self ^ exponent`, rounded.
    ///
    /// Integer exponents are computed with decimal arithmetic by repeated
    /// squaring, carrying a few guard digits; negative integer exponents take
    /// the reciprocal. Fractional exponents are computed in binary floating
    /// point and converted back, so at most about 16 significant digits of
    /// such a result are meaningful regardless of the precision policy.
    ///
    /// # Errors
    /// - [`RuntimeError::DivisionByZero`] for zero raised to a negative power.
    /// - [`RuntimeError::UnsupportedPower`] for a negative base with a
    ///   fractional exponent, an exponent beyond [`MAX_INTEGER_EXPONENT`], or a
    ///   result outside the range of `f64`.
    /// - [`RuntimeError::ExponentOutOfRange`] if the result leaves the exponent
    ///   range of `precision`.
    ///
    /// # Example
    /// ```
    /// use exprcalc::interpreter::value::{core::Number, precision::Precision};
    ///
    /// let precision = Precision::default();
    /// let two = Number::from(2);
    ///
    /// assert_eq!(two.pow(&Number::from(10), &precision).unwrap(), Number::from(1024));
    /// assert_eq!(two.pow(&Number::from(-2), &precision).unwrap().to_string(), "0.25");
    /// assert!(Number::from(0).pow(&Number::from(-1), &precision).is_err());
    /// ```
    pub fn pow(&self, exponent: &Self, precision: &Precision) -> EvalResult<Self> {
        if exponent.is_integer() {
            let exp = exponent.0
                              .to_i64()
                              .filter(|e| e.abs() <= MAX_INTEGER_EXPONENT)
                              .ok_or_else(|| RuntimeError::UnsupportedPower {
                                  details: format!("exponent {exponent} is too large"),
                              })?;
            return self.powi(exp, precision);
        }

        if self.is_negative() {
            return Err(RuntimeError::UnsupportedPower {
                details: format!("{self} can't be raised to the fractional power {exponent}"),
            });
        }
        if self.is_zero() {
            return if exponent.is_negative() {
                Err(RuntimeError::DivisionByZero)
            } else {
                Ok(Self::default())
            };
        }

        let out_of_range = || RuntimeError::UnsupportedPower {
            details: format!("{self}^{exponent} is out of range"),
        };
        let base = self.to_f64().ok_or_else(out_of_range)?;
        let exp = exponent.to_f64().ok_or_else(out_of_range)?;

        let power = f64_to_decimal(base.powf(exp)).ok_or_else(out_of_range)?;
        precision.bounded(&power).map(Self)
    }

    fn powi(&self, exp: i64, precision: &Precision) -> EvalResult<Self> {
        if exp < 0 && self.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }

        let working = precision.widened(POWER_GUARD_DIGITS);
        let mut result = BigDecimal::from(1);
        let mut base = self.0.clone();
        let mut e = exp.unsigned_abs();
        while e > 0 {
            if e & 1 == 1 {
                result = working.bounded(&(&result * &base))?;
            }
            e >>= 1;
            if e > 0 {
                base = working.bounded(&(&base * &base))?;
            }
        }

        if exp < 0 {
            return Self(BigDecimal::from(1)).div(&Self(result), precision);
        }
        precision.bounded(&result).map(Self)
    }
}
