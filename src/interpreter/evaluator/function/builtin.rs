use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, utils::check_arity},
        value::{
            core::{GUARD_DIGITS, Number},
            precision::Precision,
        },
    },
};

/// Applies a unary `f64` function to a number.
///
/// The generated functions accept exactly one argument, convert it to the
/// nearest `f64`, apply the float function and convert the result back,
/// rounded to the active precision. Arguments beyond the range of `f64` and
/// non-finite results produce a `DomainError`.
///
/// At most about 16 significant digits of the result are meaningful, whatever
/// the precision policy.
///
/// # Parameters
/// - `args`: Slice containing one argument.
/// - `precision`: The active precision.
///
/// # Example
/// ```
/// use exprcalc::interpreter::{
///     evaluator::function::builtin::sin,
///     value::{core::Number, precision::Precision},
/// };
///
/// let r = sin(&[Number::from(0)], &Precision::default()).unwrap();
/// assert_eq!(r, Number::from(0));
/// ```
macro_rules! float_builtin {
    ($fname:ident, $float_fn:ident) => {
        pub fn $fname(args: &[Number], precision: &Precision) -> EvalResult<Number> {
            let x = check_arity(stringify!($fname), args, 1).map(|args| &args[0])?;
            apply_float(stringify!($fname), x, precision, f64::$float_fn)
        }
    };
}

float_builtin!(sin, sin);
float_builtin!(cos, cos);
float_builtin!(tan, tan);

/// Natural logarithm.
///
/// # Errors
/// `DomainError` for zero and negative arguments.
///
/// # Example
/// ```
/// use exprcalc::interpreter::{
///     evaluator::function::builtin::log,
///     value::{core::Number, precision::Precision},
/// };
///
/// let precision = Precision::default();
/// assert_eq!(log(&[Number::from(1)], &precision).unwrap(), Number::from(0));
/// assert!(log(&[Number::from(0)], &precision).is_err());
/// ```
pub fn log(args: &[Number], precision: &Precision) -> EvalResult<Number> {
    let x = &check_arity("log", args, 1)?[0];
    if x.is_negative() || x.is_zero() {
        return Err(RuntimeError::DomainError { function: "log".to_string(),
                                               details:  format!("{x} is not positive"), });
    }
    apply_float("log", x, precision, f64::ln)
}

/// Square root, computed with decimal arithmetic to the digits of the active
/// precision plus a few guard digits, then rounded.
///
/// # Errors
/// `DomainError` for negative arguments.
///
/// # Example
/// ```
/// use exprcalc::interpreter::{
///     evaluator::function::builtin::sqrt,
///     value::{core::Number, precision::Precision},
/// };
///
/// let precision = Precision::default();
/// assert_eq!(sqrt(&[Number::from(16)], &precision).unwrap(), Number::from(4));
/// assert_eq!(sqrt(&[Number::from(2)], &precision).unwrap().to_string(), "1.414213562373095");
/// assert!(sqrt(&[Number::from(-1)], &precision).is_err());
/// ```
pub fn sqrt(args: &[Number], precision: &Precision) -> EvalResult<Number> {
    let x = &check_arity("sqrt", args, 1)?[0];
    x.as_decimal()
     .sqrt_with_context(&precision.decimal_context(GUARD_DIGITS))
     .map(|root| Number::from(root).round(precision))
     .ok_or_else(|| RuntimeError::DomainError { function: "sqrt".to_string(),
                                                details:  format!("{x} is negative"), })
}

/// Absolute value. Exact apart from the final rounding.
pub fn abs(args: &[Number], precision: &Precision) -> EvalResult<Number> {
    let x = &check_arity("abs", args, 1)?[0];
    Ok(x.abs().round(precision))
}

fn apply_float(name: &str, x: &Number, precision: &Precision, f: fn(f64) -> f64)
               -> EvalResult<Number> {
    let domain_error = |details: String| RuntimeError::DomainError { function: name.to_string(),
                                                                     details };
    let input = x.to_f64()
                 .ok_or_else(|| domain_error(format!("{x} is out of range")))?;
    Number::from_f64(f(input)).map(|n| n.round(precision))
                              .ok_or_else(|| domain_error(format!("{name}({x}) is not finite")))
}
