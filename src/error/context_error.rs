use thiserror::Error;

use crate::error::SymbolError;

/// Represents all errors returned by the binding context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The variable, function or parameter name is malformed.
    #[error(transparent)]
    InvalidIdentifier(#[from] SymbolError),
    /// Tried to replace or delete a readonly variable.
    #[error("The \"{name}\" variable is defined as read-only.")]
    ReadonlyVariable {
        /// The name of the variable.
        name: String,
    },
    /// Tried to replace or delete a readonly function.
    #[error("The \"{name}\" function is defined as read-only for {arity} arguments.")]
    ReadonlyFunction {
        /// The name of the function.
        name:  String,
        /// The arity of the readonly definition.
        arity: usize,
    },
    /// No variable with this name is bound.
    #[error("The variable \"{name}\" is not defined.")]
    UndefinedVariable {
        /// The name of the variable.
        name: String,
    },
    /// No function with this name and arity is defined.
    #[error("The function \"{name}\" is not defined for {arity} arguments.")]
    UndefinedFunction {
        /// The name of the function.
        name:  String,
        /// The requested arity.
        arity: usize,
    },
    /// A custom function lists the same parameter twice.
    #[error("The parameter \"{name}\" is declared more than once.")]
    DuplicateParameter {
        /// The repeated parameter name.
        name: String,
    },
}
