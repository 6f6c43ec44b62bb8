use crate::{
    ast::Expr,
    error::{ContextError, RuntimeError},
    interpreter::{
        evaluator::{
            core::{Binding, Change, Context, EvalResult, ObserverId},
            function::core::{CustomFunction, Function},
        },
        symbol,
        value::core::Number,
    },
};

impl Context {
    /// Looks up a variable by name.
    ///
    /// # Errors
    /// [`ContextError::UndefinedVariable`] if no variable is bound to `name`.
    ///
    /// # Example
    /// ```
    /// use exprcalc::interpreter::evaluator::core::Context;
    ///
    /// let mut ctx = Context::new();
    /// ctx.set_variable("x", 5.into(), false).unwrap();
    ///
    /// assert_eq!(ctx.get_variable("x").unwrap().to_string(), "5");
    /// assert!(ctx.get_variable("y").is_err());
    /// ```
    pub fn get_variable(&self, name: &str) -> Result<&Number, ContextError> {
        self.variables
            .get(name)
            .map(|binding| &binding.value)
            .ok_or_else(|| ContextError::UndefinedVariable { name: name.to_string() })
    }

    /// Tests whether `name` is bound to a readonly variable.
    #[must_use]
    pub fn is_readonly_variable(&self, name: &str) -> bool {
        self.variables.get(name).is_some_and(|b| b.readonly)
    }

    /// Iterates over every variable, in no particular order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &Binding<Number>)> {
        self.variables.iter().map(|(name, b)| (name.as_str(), b))
    }

    /// Binds `name` to `value`, replacing any previous non-readonly binding.
    ///
    /// # Errors
    /// - [`ContextError::InvalidIdentifier`] if `name` isn't a valid symbol.
    /// - [`ContextError::ReadonlyVariable`] if `name` is bound readonly.
    pub fn set_variable(&mut self, name: &str, value: Number, readonly: bool)
                        -> Result<Change, ContextError> {
        symbol::validate(name)?;
        if self.is_readonly_variable(name) {
            return Err(ContextError::ReadonlyVariable { name: name.to_string() });
        }

        tracing::debug!(name, %value, readonly, "variable set");
        self.variables
            .insert(name.to_string(), Binding { value, readonly });
        Ok(self.publish(Change::VariableSet { name: name.to_string() }))
    }

    /// Removes the variable bound to `name`.
    ///
    /// Deleting an unbound name succeeds and still notifies observers.
    ///
    /// # Errors
    /// [`ContextError::ReadonlyVariable`] if `name` is bound readonly.
    pub fn delete_variable(&mut self, name: &str) -> Result<Change, ContextError> {
        if self.is_readonly_variable(name) {
            return Err(ContextError::ReadonlyVariable { name: name.to_string() });
        }

        tracing::debug!(name, "variable deleted");
        self.variables.remove(name);
        Ok(self.publish(Change::VariableDeleted { name: name.to_string() }))
    }

    /// Looks up the function `name` taking exactly `arity` arguments.
    ///
    /// # Errors
    /// [`ContextError::UndefinedFunction`] if there is no such definition.
    pub fn get_function(&self, name: &str, arity: usize) -> Result<&Function, ContextError> {
        self.functions
            .get(&(name.to_string(), arity))
            .map(|binding| &binding.value)
            .ok_or_else(|| ContextError::UndefinedFunction { name: name.to_string(),
                                                             arity })
    }

    /// Tests whether the function `name` with `arity` arguments is readonly.
    #[must_use]
    pub fn is_readonly_function(&self, name: &str, arity: usize) -> bool {
        self.functions
            .get(&(name.to_string(), arity))
            .is_some_and(|b| b.readonly)
    }

    /// Iterates over every function definition, in no particular order.
    pub fn functions(&self) -> impl Iterator<Item = &Binding<Function>> {
        self.functions.values()
    }

    /// Adds a function definition, replacing any non-readonly definition with
    /// the same name and arity.
    ///
    /// # Errors
    /// - [`ContextError::InvalidIdentifier`] if the name isn't a valid symbol.
    /// - [`ContextError::ReadonlyFunction`] if the same name and arity is
    ///   defined readonly.
    pub fn set_function(&mut self, function: Function, readonly: bool)
                        -> Result<Change, ContextError> {
        let (name, arity) = (function.name().to_string(), function.arity());
        symbol::validate(&name)?;
        if self.is_readonly_function(&name, arity) {
            return Err(ContextError::ReadonlyFunction { name, arity });
        }

        tracing::debug!(%function, readonly, "function set");
        self.functions.insert((name.clone(), arity),
                              Binding { value: function,
                                        readonly });
        Ok(self.publish(Change::FunctionSet { name, arity }))
    }

    /// Defines a user function from its parts.
    ///
    /// # Errors
    /// - [`ContextError::InvalidIdentifier`] for a malformed function or
    ///   parameter name.
    /// - [`ContextError::DuplicateParameter`] if a parameter is listed twice.
    /// - [`ContextError::ReadonlyFunction`] as for [`Context::set_function`].
    ///
    /// # Example
    /// ```
    /// use exprcalc::interpreter::{evaluator::core::Context, parser::core::parse, step::NoSteps};
    ///
    /// let mut ctx = Context::new();
    /// ctx.define_function("sum", vec!["x".into(), "y".into()], parse("x+y").unwrap(), false)
    ///    .unwrap();
    ///
    /// let value = ctx.evaluate(&parse("sum(2, 3)").unwrap(), &mut NoSteps).unwrap();
    /// assert_eq!(value.to_string(), "5");
    /// ```
    pub fn define_function(&mut self,
                           name: &str,
                           params: Vec<String>,
                           body: Expr,
                           readonly: bool)
                           -> Result<Change, ContextError> {
        let function = CustomFunction::new(name, params, body)?;
        self.set_function(Function::Custom(function), readonly)
    }

    /// Removes the function `name` taking `arity` arguments.
    ///
    /// Deleting an undefined function succeeds and still notifies observers.
    ///
    /// # Errors
    /// [`ContextError::ReadonlyFunction`] if the definition is readonly.
    pub fn delete_function(&mut self, name: &str, arity: usize) -> Result<Change, ContextError> {
        if self.is_readonly_function(name, arity) {
            return Err(ContextError::ReadonlyFunction { name: name.to_string(),
                                                        arity });
        }

        tracing::debug!(name, arity, "function deleted");
        self.functions.remove(&(name.to_string(), arity));
        Ok(self.publish(Change::FunctionDeleted { name: name.to_string(),
                                                  arity }))
    }

    /// Removes every non-readonly variable and function.
    ///
    /// Observers are notified once.
    pub fn clear(&mut self) -> Change {
        self.variables.retain(|_, b| b.readonly);
        self.functions.retain(|_, b| b.readonly);

        tracing::debug!("context cleared");
        self.publish(Change::Cleared)
    }

    /// Registers an observer, called synchronously after every successful
    /// mutation with a description of the change.
    ///
    /// # Example
    /// ```
    /// use std::sync::{Arc, Mutex};
    ///
    /// use exprcalc::interpreter::evaluator::core::{Change, Context};
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let mut ctx = Context::new();
    ///
    /// let sink = Arc::clone(&seen);
    /// let id = ctx.subscribe(move |change: &Change| sink.lock().unwrap().push(change.clone()));
    ///
    /// ctx.set_variable("x", 1.into(), false).unwrap();
    /// assert!(ctx.unsubscribe(id));
    /// ctx.clear();
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![Change::VariableSet { name: "x".to_string() }]);
    /// ```
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
        where F: FnMut(&Change) + Send + 'static
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if `id` wasn't registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(other, _)| *other != id);
        self.observers.len() != before
    }

    fn publish(&mut self, change: Change) -> Change {
        for (_, observer) in &mut self.observers {
            observer(&change);
        }
        change
    }
}

/// Checks the number of arguments passed to a builtin function.
///
/// # Parameters
/// - `name`: Name of the called function, for error reporting.
/// - `args`: Slice of arguments.
/// - `expected`: Required number of arguments.
///
/// # Returns
/// `args` itself, so the caller can index into it.
///
/// # Errors
/// [`RuntimeError::UndefinedFunction`] naming the arity actually used.
///
/// # Example
/// ```
/// use exprcalc::interpreter::evaluator::utils::check_arity;
///
/// assert!(check_arity("f", &[1, 2], 2).is_ok());
/// assert!(check_arity("f", &[1], 2).is_err());
/// ```
pub fn check_arity<'a, T>(name: &str, args: &'a [T], expected: usize) -> EvalResult<&'a [T]> {
    if args.len() == expected {
        Ok(args)
    } else {
        Err(RuntimeError::UndefinedFunction { name:  name.to_string(),
                                              arity: args.len(), })
    }
}
