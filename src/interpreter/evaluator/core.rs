use std::{
    collections::HashMap,
    fmt,
};

use crate::{
    ast::{Expr, MAX_NESTING_DEPTH},
    error::RuntimeError,
    interpreter::{
        evaluator::function::core::{Function, builtins},
        step::{Step, StepSink},
        value::{core::Number, precision::Precision},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Name of the variable written after every top-level evaluation.
pub const ANS: &str = "ans";

/// Default limit for nested calls of user-defined functions.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;

/// How deep an evaluation currently is.
///
/// `calls` counts the user-defined calls being evaluated, `nodes` the tree
/// levels entered so far, including those of the called bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Depth {
    pub(crate) calls: usize,
    pub(crate) nodes: usize,
}

impl Depth {
    /// One tree level further down.
    pub(crate) const fn child(self) -> Self {
        Self { nodes: self.nodes + 1,
               ..self }
    }

    /// Into the body of a user-defined call.
    pub(crate) const fn call(self) -> Self {
        Self { calls: self.calls + 1,
               nodes: self.nodes + 1 }
    }
}

/// A value stored in the context together with its readonly flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding<T> {
    /// The stored value.
    pub value:    T,
    /// Readonly entries can't be replaced, deleted or cleared.
    pub readonly: bool,
}

impl<T> Binding<T> {
    pub(crate) const fn prefix(&self) -> &'static str {
        if self.readonly { "readonly " } else { "" }
    }
}

/// Describes a successful mutation of a [`Context`].
///
/// Every mutating operation returns the change it made, and the same value is
/// passed to each observer registered with [`Context::subscribe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A variable was bound or rebound.
    VariableSet {
        /// Name of the variable.
        name: String,
    },
    /// A variable deletion was requested. The variable may not have existed.
    VariableDeleted {
        /// Name of the variable.
        name: String,
    },
    /// A function was defined or redefined.
    FunctionSet {
        /// Name of the function.
        name:  String,
        /// Its arity.
        arity: usize,
    },
    /// A function deletion was requested. The function may not have existed.
    FunctionDeleted {
        /// Name of the function.
        name:  String,
        /// The arity of the deleted definition.
        arity: usize,
    },
    /// Every non-readonly entry was removed.
    Cleared,
}

/// Handle identifying an observer, used to unsubscribe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

pub(crate) type Observer = Box<dyn FnMut(&Change) + Send>;

/// Stores the binding environment of expressions.
///
/// This struct holds the variables and functions expressions are evaluated
/// against, the precision policy applied to every arithmetic result, and the
/// observers notified of every mutation.
///
/// Variables are keyed by name. Functions are keyed by name *and* arity, so
/// `f(x)` and `f(x,y)` are unrelated definitions. Every entry carries a
/// readonly flag: readonly entries can only be removed by dropping the
/// context.
///
/// ## Usage
///
/// A new context already contains the readonly builtins `sin`, `cos`, `tan`,
/// `log`, `sqrt` and `abs`. Evaluation borrows the context immutably; all
/// mutations go through the `set_*`/`delete_*`/[`clear`](Context::clear)
/// operations, which leave the context untouched when they fail.
///
/// # Example
/// ```
/// use exprcalc::interpreter::{evaluator::core::Context, parser::core::parse, step::NoSteps};
///
/// let mut ctx = Context::new();
/// ctx.set_variable("x", 4.into(), false).unwrap();
///
/// let expr = parse("sqrt(x) + 1").unwrap();
/// assert_eq!(ctx.evaluate(&expr, &mut NoSteps).unwrap().to_string(), "3");
/// ```
pub struct Context {
    pub(crate) variables:      HashMap<String, Binding<Number>>,
    pub(crate) functions:      HashMap<(String, usize), Binding<Function>>,
    pub(crate) precision:      Precision,
    pub(crate) max_call_depth: usize,
    pub(crate) observers:      Vec<(ObserverId, Observer)>,
    pub(crate) next_observer:  u64,
}

impl Context {
    /// Creates a context with the builtin functions and the default
    /// precision (16 significant digits, half-even rounding).
    #[must_use]
    pub fn new() -> Self {
        Self::with_precision(Precision::default())
    }

    /// Creates a context with the builtin functions and the given precision.
    #[must_use]
    pub fn with_precision(precision: Precision) -> Self {
        let functions = builtins().map(|b| {
                                      ((b.name().to_string(), b.arity()),
                                       Binding { value:    Function::Builtin(b),
                                                 readonly: true, })
                                  })
                                  .collect();
        Self { variables: HashMap::new(),
               functions,
               precision,
               max_call_depth: DEFAULT_MAX_CALL_DEPTH,
               observers: Vec::new(),
               next_observer: 0 }
    }

    /// The precision policy applied to evaluations.
    #[must_use]
    pub const fn precision(&self) -> Precision {
        self.precision
    }

    /// Replaces the precision policy. Stored values keep their digits; the
    /// new policy applies to every evaluation that follows.
    pub fn set_precision(&mut self, precision: Precision) {
        tracing::debug!(%precision, "precision changed");
        self.precision = precision;
    }

    /// The deepest nesting of user-defined function calls allowed.
    #[must_use]
    pub const fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    /// Sets the deepest nesting of user-defined function calls allowed.
    pub fn set_max_call_depth(&mut self, depth: usize) {
        self.max_call_depth = depth;
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. Nodes are
    /// evaluated in post-order, operands left to right, and every
    /// non-constant node reports an evaluation step to `log`.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    /// - `log`: Receiver of evaluation steps; pass
    ///   [`NoSteps`](crate::interpreter::step::NoSteps) to discard them.
    ///
    /// # Errors
    /// Any [`RuntimeError`]: unresolved variables or functions, division by
    /// zero, unsupported powers, builtin domain errors and runaway recursion.
    /// Trees nested deeper than [`MAX_NESTING_DEPTH`], counting the bodies of
    /// user-defined calls, fail with [`RuntimeError::NestingLimit`].
    pub fn evaluate(&self, expr: &Expr, log: &mut dyn StepSink) -> EvalResult<Number> {
        self.eval(expr, Depth::default(), log)
    }

    /// Evaluates a top-level expression and stores the result in `ans`.
    ///
    /// The store goes through [`Context::set_variable`], so observers are
    /// notified and a readonly `ans` is respected. A failed store does not fail
    /// the evaluation: it is reported as a warning step and logged.
    ///
    /// # Example
    /// ```
    /// use exprcalc::interpreter::{evaluator::core::Context, parser::core::parse};
    ///
    /// let mut ctx = Context::new();
    /// ctx.set_variable("ans", 0.into(), true).unwrap();
    ///
    /// let mut steps: Vec<String> = Vec::new();
    /// let value = ctx.evaluate_and_store(&parse("3").unwrap(), &mut steps).unwrap();
    ///
    /// assert_eq!(value, 3.into());
    /// assert_eq!(steps,
    ///            vec!["Warning: failed to store result. Reason: The \"ans\" variable is defined as read-only."]);
    /// ```
    pub fn evaluate_and_store(&mut self, expr: &Expr, log: &mut dyn StepSink)
                              -> EvalResult<Number> {
        let value = self.evaluate(expr, log)?;
        if let Err(reason) = self.set_variable(ANS, value.clone(), false) {
            tracing::warn!(%reason, "failed to store result");
            log.record(&Step::StoreFailed { reason: &reason });
        }
        Ok(value)
    }

    /// Evaluates `expr` at the given depth.
    pub(crate) fn eval(&self, expr: &Expr, depth: Depth, log: &mut dyn StepSink)
                       -> EvalResult<Number> {
        if depth.nodes >= MAX_NESTING_DEPTH {
            return Err(RuntimeError::NestingLimit { depth: MAX_NESTING_DEPTH });
        }
        let value = match expr {
            Expr::Constant { value } => return Ok(value.round(&self.precision)),
            Expr::Variable { name } => self.eval_variable(name)?,
            Expr::Negation { expr: inner } => self.eval_negation(inner, depth, log)?,
            Expr::BinaryOp { left, op, right } => {
                self.eval_binary_op(left, *op, right, depth, log)?
            },
            Expr::FunctionCall { name, arguments } => {
                self.eval_function_call(name, arguments, depth, log)?
            },
        };

        tracing::trace!(%expr, %value, "evaluated");
        log.record(&Step::Evaluate { expr,
                                     value: &value });
        Ok(value)
    }

    fn eval_variable(&self, name: &str) -> EvalResult<Number> {
        self.variables
            .get(name)
            .map(|binding| binding.value.clone())
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.to_string() })
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Context {
    /// Writes one `name=value` line per variable, then one `signature=body`
    /// line per function, readonly entries prefixed with `readonly `.
    ///
    /// Entries are sorted by name so the dump is stable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut variables = self.variables.iter().collect::<Vec<_>>();
        variables.sort_by(|a, b| a.0.cmp(b.0));
        let mut functions = self.functions.iter().collect::<Vec<_>>();
        functions.sort_by(|a, b| a.0.cmp(b.0));

        let lines = variables.into_iter()
                             .map(|(name, b)| format!("{}{name}={}", b.prefix(), b.value))
                             .chain(functions.into_iter()
                                             .map(|(_, b)| format!("{}{}", b.prefix(), b.value)));
        for (i, line) in lines.enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
         .field("variables", &self.variables)
         .field("functions", &self.functions)
         .field("precision", &self.precision)
         .field("max_call_depth", &self.max_call_depth)
         .field("observers", &self.observers.len())
         .finish()
    }
}
