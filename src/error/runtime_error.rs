use thiserror::Error;

/// Represents all errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Tried to read a variable that is not bound in the context.
    #[error("The variable \"{name}\" is not defined.")]
    UndefinedVariable {
        /// The name of the variable.
        name: String,
    },
    /// Called a function that has no definition for the given arity.
    #[error("The function \"{name}\" is not defined for {arity} arguments.")]
    UndefinedFunction {
        /// The name of the function.
        name:  String,
        /// The number of arguments of the call.
        arity: usize,
    },
    /// The divisor of a division (or the base of a negative power) was zero.
    #[error("Division by zero.")]
    DivisionByZero,
    /// A power that cannot be computed with decimal arithmetic.
    #[error("Unsupported power: {details}.")]
    UnsupportedPower {
        /// Why the power was rejected.
        details: String,
    },
    /// A builtin function received an argument outside its domain.
    #[error("Invalid argument for \"{function}\": {details}.")]
    DomainError {
        /// The builtin that failed.
        function: String,
        /// Details about the argument.
        details:  String,
    },
    /// A result is too large or too small for the exponent range of the
    /// precision policy.
    #[error("The result is out of the exponent range of ±{max_exponent}.")]
    ExponentOutOfRange {
        /// The largest accepted adjusted exponent magnitude.
        max_exponent: u64,
    },
    /// The expression being evaluated is nested too deeply.
    #[error("Maximum expression nesting of {depth} exceeded.")]
    NestingLimit {
        /// The nesting limit.
        depth: usize,
    },
    /// User-defined functions were nested deeper than the context allows.
    #[error("Maximum function call depth of {depth} exceeded.")]
    RecursionLimit {
        /// The configured maximum depth.
        depth: usize,
    },
}
