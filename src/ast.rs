use std::{collections::HashMap, fmt};

use crate::{
    error::{ParseError, SymbolError},
    interpreter::{symbol, value::core::Number},
};

/// Deepest expression tree accepted by the parser, and deepest nesting of
/// nodes (across user-defined calls) reached by the evaluator.
pub const MAX_NESTING_DEPTH: usize = 256;

/// An abstract syntax tree (AST) node representing an arithmetic expression.
///
/// `Expr` is a closed set of node kinds. Every node owns its children, so a
/// tree never shares structure and never contains cycles. Trees are immutable
/// once built: parameter binding for user-defined functions produces a new tree
/// through [`Expr::substitute`] instead of modifying the function body.
///
/// Structural validity (balanced parentheses, operator arity) is guaranteed by
/// the parser. Whether every variable and function resolves is only known at
/// evaluation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A constant value.
    Constant {
        /// The value of the constant.
        value: Number,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
    },
    /// Arithmetic negation of the operand.
    Negation {
        /// The negated expression.
        expr: Box<Self>,
    },
    /// A binary operation.
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
    },
    /// Function call expression (e.g. `sqrt(x)`).
    FunctionCall {
        /// Name of the function being called.
        name:      String,
        /// Arguments to the function, in call order.
        arguments: Vec<Self>,
    },
}

impl Expr {
    /// Builds a constant node.
    #[must_use]
    pub fn constant(value: impl Into<Number>) -> Self {
        Self::Constant { value: value.into() }
    }

    /// Builds a variable reference, validating the name.
    ///
    /// # Errors
    /// Returns a [`SymbolError`] if `name` isn't a valid symbol name.
    pub fn variable(name: impl Into<String>) -> Result<Self, SymbolError> {
        let name = name.into();
        symbol::validate(&name)?;
        Ok(Self::Variable { name })
    }

    /// Wraps `expr` in a negation node.
    #[must_use]
    pub fn negation(expr: Self) -> Self {
        Self::Negation { expr: Box::new(expr) }
    }

    /// Builds a binary operation from an operator character.
    ///
    /// # Errors
    /// Returns [`ParseError::InvalidOperator`] if `op` is not one of
    /// `+ - * / ^`.
    ///
    /// # Example
    /// ```
    /// use exprcalc::ast::Expr;
    ///
    /// let sum = Expr::binary(Expr::constant(1), '+', Expr::constant(2)).unwrap();
    /// assert_eq!(sum.to_string(), "(1+2)");
    ///
    /// assert!(Expr::binary(Expr::constant(1), '%', Expr::constant(2)).is_err());
    /// ```
    pub fn binary(left: Self, op: char, right: Self) -> Result<Self, ParseError> {
        let op = BinaryOperator::try_from(op)?;
        Ok(Self::BinaryOp { left: Box::new(left),
                            op,
                            right: Box::new(right) })
    }

    /// Builds a function call, validating the name.
    ///
    /// # Errors
    /// Returns a [`SymbolError`] if `name` isn't a valid symbol name.
    pub fn call(name: impl Into<String>, arguments: Vec<Self>) -> Result<Self, SymbolError> {
        let name = name.into();
        symbol::validate(&name)?;
        Ok(Self::FunctionCall { name, arguments })
    }

    /// Returns the direct sub-expressions of this node, left to right.
    ///
    /// ## Example
    /// ```
    /// use exprcalc::ast::Expr;
    ///
    /// let expr = Expr::binary(Expr::constant(1), '*', Expr::variable("x").unwrap()).unwrap();
    ///
    /// assert_eq!(expr.children().len(), 2);
    /// assert!(Expr::constant(3).children().is_empty());
    /// ```
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match self {
            Self::Constant { .. } | Self::Variable { .. } => Vec::new(),
            Self::Negation { expr } => vec![&**expr],
            Self::BinaryOp { left, right, .. } => vec![&**left, &**right],
            Self::FunctionCall { arguments, .. } => arguments.iter().collect(),
        }
    }

    /// Returns the number of levels of the tree, `1` for a leaf.
    ///
    /// The tree is walked without recursion.
    ///
    /// ## Example
    /// ```
    /// use exprcalc::interpreter::parser::core::parse;
    ///
    /// assert_eq!(parse("x").unwrap().depth(), 1);
    /// assert_eq!(parse("-(1+2)*f(3)").unwrap().depth(), 4);
    /// ```
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((expr, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(expr.children().into_iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Tests whether this node is a constant.
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        matches!(self, Self::Constant { .. })
    }

    /// Returns a copy of this tree with every variable named in `bindings`
    /// replaced by a constant holding the bound value.
    ///
    /// Function names are never substituted, only variable references
    /// (including those inside call arguments).
    ///
    /// ## Example
    /// ```
    /// use std::collections::HashMap;
    ///
    /// use exprcalc::{ast::Expr, interpreter::value::core::Number};
    ///
    /// let body = Expr::binary(Expr::variable("x").unwrap(), '+', Expr::variable("y").unwrap())
    ///     .unwrap();
    /// let bindings = HashMap::from([("x", Number::from(3))]);
    ///
    /// assert_eq!(body.substitute(&bindings).to_string(), "(3+y)");
    /// assert_eq!(body.to_string(), "(x+y)");
    /// ```
    #[must_use]
    pub fn substitute(&self, bindings: &HashMap<&str, Number>) -> Self {
        match self {
            Self::Constant { .. } => self.clone(),
            Self::Variable { name } => match bindings.get(name.as_str()) {
                Some(value) => Self::Constant { value: value.clone() },
                None => self.clone(),
            },
            Self::Negation { expr } => Self::negation(expr.substitute(bindings)),
            Self::BinaryOp { left, op, right } => {
                Self::BinaryOp { left:  Box::new(left.substitute(bindings)),
                                 op:    *op,
                                 right: Box::new(right.substitute(bindings)), }
            },
            Self::FunctionCall { name, arguments } => {
                Self::FunctionCall { name:      name.clone(),
                                     arguments: arguments.iter()
                                                         .map(|a| a.substitute(bindings))
                                                         .collect(), }
            },
        }
    }
}

impl fmt::Display for Expr {
    /// Renders the expression with every compound node fully parenthesised,
    /// so the output parses back to an equivalent tree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant { value } => write!(f, "{value}"),
            Self::Variable { name } => write!(f, "{name}"),
            Self::Negation { expr } => write!(f, "(-({expr}))"),
            Self::BinaryOp { left, op, right } => write!(f, "({left}{op}{right})"),
            Self::FunctionCall { name, arguments } => {
                write!(f, "{name}(")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ")")
            },
        }
    }
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Exponentiation (`^`)
    Pow,
}

impl BinaryOperator {
    /// All supported operators.
    pub const ALL: [Self; 5] = [Self::Add, Self::Sub, Self::Mul, Self::Div, Self::Pow];

    /// Operator groups in the order they are reduced by the parser: `^` first,
    /// then `*` and `/`, then `+` and `-`. Operators within a group associate
    /// to the left.
    pub const PRECEDENCE_PASSES: [&'static [Self]; 3] =
        [&[Self::Pow], &[Self::Mul, Self::Div], &[Self::Add, Self::Sub]];

    /// The character representing the operator.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Pow => '^',
        }
    }

    /// Tests whether `c` is a supported operator character.
    #[must_use]
    pub fn is_allowed(c: char) -> bool {
        Self::try_from(c).is_ok()
    }
}

impl TryFrom<char> for BinaryOperator {
    type Error = ParseError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::ALL.into_iter()
                 .find(|op| op.symbol() == c)
                 .ok_or(ParseError::InvalidOperator { op: c })
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Built-in commands of the interactive session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Prints every variable and function of the context.
    Context,
    /// Deletes every non-readonly variable and function.
    Clear,
    /// Prints the help text.
    Help,
    /// Stops reading input.
    Exit,
}

/// Represents one line of the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A session command such as `help`.
    Command(Command),
    /// An expression evaluated for its result, which is stored in `ans`.
    Expression(Expr),
    /// `name=expr`, optionally prefixed by `readonly`.
    AssignVariable {
        /// The name of the variable.
        name:     String,
        /// The expression whose value is bound.
        value:    Expr,
        /// Whether the binding is readonly.
        readonly: bool,
    },
    /// `name=` deletes the variable.
    DeleteVariable {
        /// The name of the variable.
        name: String,
    },
    /// `name(a,b)=expr` defines a function, optionally prefixed by `readonly`.
    DefineFunction {
        /// The name of the function.
        name:     String,
        /// The parameter names.
        params:   Vec<String>,
        /// The function body.
        body:     Expr,
        /// Whether the definition is readonly.
        readonly: bool,
    },
    /// `name(n)=` deletes the function taking `n` arguments.
    DeleteFunction {
        /// The name of the function.
        name:  String,
        /// The arity of the definition to delete.
        arity: usize,
    },
}
