use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use crate::{
    ast::Expr,
    error::{ContextError, RuntimeError},
    interpreter::{
        evaluator::{
            core::{Context, Depth, EvalResult},
            function::builtin,
            utils::check_arity,
        },
        step::StepSink,
        symbol,
        value::{core::Number, precision::Precision},
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the evaluated arguments and the active precision and
/// returns the rounded result.
pub type BuiltinFn = fn(&[Number], &Precision) -> EvalResult<Number>;

/// A native function registered in every new context.
#[derive(Clone, Copy)]
pub struct Builtin {
    name:  &'static str,
    arity: usize,
    func:  BuiltinFn,
}

impl Builtin {
    /// The name the builtin is called by.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The number of arguments the builtin takes.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Applies the builtin to already evaluated arguments.
    ///
    /// # Errors
    /// [`RuntimeError::UndefinedFunction`] if `args` doesn't match the arity,
    /// or any error of the builtin itself.
    pub fn call(&self, args: &[Number], precision: &Precision) -> EvalResult<Number> {
        (self.func)(check_arity(self.name, args, self.arity)?, precision)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
         .field("name", &self.name)
         .field("arity", &self.arity)
         .finish_non_exhaustive()
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arity == other.arity
    }
}

impl Eq for Builtin {}

/// Defines builtin functions by generating the lookup table.
///
/// Each entry provides:
/// - a string name,
/// - the number of arguments,
/// - a function pointer implementing the builtin.
///
/// The macro produces `BUILTIN_TABLE`, the static table copied into every new
/// context.
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        static BUILTIN_TABLE: &[Builtin] = &[
            $(
                Builtin { name: $name, arity: $arity, func: $func },
            )*
        ];
    };
}

builtin_functions! {
    "sin"  => { arity: 1, func: builtin::sin },
    "cos"  => { arity: 1, func: builtin::cos },
    "tan"  => { arity: 1, func: builtin::tan },
    "log"  => { arity: 1, func: builtin::log },
    "sqrt" => { arity: 1, func: builtin::sqrt },
    "abs"  => { arity: 1, func: builtin::abs },
}

/// Iterates over the builtin functions.
pub fn builtins() -> impl Iterator<Item = Builtin> {
    BUILTIN_TABLE.iter().copied()
}

/// A function defined by the user as an expression over named parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFunction {
    name:   String,
    params: Vec<String>,
    body:   Expr,
}

impl CustomFunction {
    /// Creates a function named `name` evaluating `body` over `params`.
    ///
    /// The body is not checked against any context: it may reference
    /// variables and functions that are only defined later.
    ///
    /// # Errors
    /// - [`ContextError::InvalidIdentifier`] for a malformed name or
    ///   parameter.
    /// - [`ContextError::DuplicateParameter`] if a parameter is listed twice.
    ///
    /// # Example
    /// ```
    /// use exprcalc::interpreter::{evaluator::function::core::CustomFunction, parser::core::parse};
    ///
    /// let square = CustomFunction::new("square", vec!["a".into()], parse("a^2").unwrap()).unwrap();
    /// assert_eq!(square.to_string(), "square(a)=(a^2)");
    ///
    /// assert!(CustomFunction::new("f", vec!["a".into(), "a".into()], parse("a").unwrap()).is_err());
    /// ```
    pub fn new(name: &str, params: Vec<String>, body: Expr) -> Result<Self, ContextError> {
        symbol::validate(name)?;
        let mut seen = HashSet::new();
        for param in &params {
            symbol::validate(param)?;
            if !seen.insert(param.as_str()) {
                return Err(ContextError::DuplicateParameter { name: param.clone() });
            }
        }
        Ok(Self { name: name.to_string(),
                  params,
                  body })
    }

    /// The function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameter names, in call order.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// The function body.
    #[must_use]
    pub const fn body(&self) -> &Expr {
        &self.body
    }

    /// Returns the body with every parameter replaced by its argument.
    fn bind(&self, args: &[Number]) -> Expr {
        let bindings = self.params
                           .iter()
                           .map(String::as_str)
                           .zip(args.iter().cloned())
                           .collect::<HashMap<_, _>>();
        self.body.substitute(&bindings)
    }
}

impl fmt::Display for CustomFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})={}", self.name, self.params.join(","), self.body)
    }
}

/// A function stored in a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Function {
    /// Implemented natively.
    Builtin(Builtin),
    /// Defined by the user.
    Custom(CustomFunction),
}

impl Function {
    /// The function name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(b) => b.name(),
            Self::Custom(c) => c.name(),
        }
    }

    /// The number of arguments the function takes.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Builtin(b) => b.arity(),
            Self::Custom(c) => c.params.len(),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(b) => {
                let params = (1..=b.arity).map(|i| format!("x{i}")).collect::<Vec<_>>();
                write!(f, "{}({})=<builtin>", b.name, params.join(","))
            },
            Self::Custom(c) => write!(f, "{c}"),
        }
    }
}

impl Context {
    /// Evaluates a function call.
    ///
    /// Arguments are evaluated left to right, then the definition matching
    /// the name and the number of arguments is looked up. Builtins are
    /// applied directly. User-defined functions have their parameters
    /// substituted by the argument values and the resulting tree is evaluated
    /// in this same context, one level deeper.
    ///
    /// # Errors
    /// - [`RuntimeError::UndefinedFunction`] if no definition has this arity.
    /// - [`RuntimeError::RecursionLimit`] when a user-defined call would go
    ///   beyond [`Context::max_call_depth`].
    /// - [`RuntimeError::NestingLimit`] when the called bodies nest too deep.
    /// - Any error raised while evaluating the arguments or the body.
    pub(crate) fn eval_function_call(&self,
                                     name: &str,
                                     arguments: &[Expr],
                                     depth: Depth,
                                     log: &mut dyn StepSink)
                                     -> EvalResult<Number> {
        let args = arguments.iter()
                            .map(|a| self.eval(a, depth.child(), log))
                            .collect::<EvalResult<Vec<_>>>()?;

        let function = self.get_function(name, args.len())
                           .map_err(|_| RuntimeError::UndefinedFunction { name:  name.to_string(),
                                                                          arity: args.len(), })?;

        match function {
            Function::Builtin(b) => b.call(&args, &self.precision),
            Function::Custom(c) => {
                if depth.calls >= self.max_call_depth {
                    return Err(RuntimeError::RecursionLimit { depth: self.max_call_depth });
                }
                self.eval(&c.bind(&args), depth.call(), log)
            },
        }
    }
}
