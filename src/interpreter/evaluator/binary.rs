use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        evaluator::core::{Context, Depth, EvalResult},
        step::StepSink,
        value::{core::Number, precision::Precision},
    },
};

impl Context {
    /// Evaluates a binary operation.
    ///
    /// The left operand is evaluated first, then the right one, then the
    /// operator is applied under the active precision.
    ///
    /// # Parameters
    /// - `left`: Left operand.
    /// - `op`: The operator.
    /// - `right`: Right operand.
    /// - `depth`: Depth of this node.
    /// - `log`: Receiver of evaluation steps.
    ///
    /// # Returns
    /// The rounded result.
    pub(crate) fn eval_binary_op(&self,
                                 left: &Expr,
                                 op: BinaryOperator,
                                 right: &Expr,
                                 depth: Depth,
                                 log: &mut dyn StepSink)
                                 -> EvalResult<Number> {
        let lhs = self.eval(left, depth.child(), log)?;
        let rhs = self.eval(right, depth.child(), log)?;
        Self::eval_binary(op, &lhs, &rhs, &self.precision)
    }

    /// Applies a binary operator to two values.
    ///
    /// # Errors
    /// - `DivisionByZero` for `/` by zero and for zero raised to a negative
    ///   power.
    /// - `UnsupportedPower` for powers that can't be computed.
    /// - `ExponentOutOfRange` for results beyond the exponent range of
    ///   `precision`.
    ///
    /// # Example
    /// ```
    /// use exprcalc::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::{core::Number, precision::Precision}},
    /// };
    ///
    /// let precision = Precision::default();
    /// let v = Context::eval_binary(BinaryOperator::Div, &Number::from(1), &Number::from(4), &precision)
    ///     .unwrap();
    /// assert_eq!(v.to_string(), "0.25");
    ///
    /// assert!(Context::eval_binary(BinaryOperator::Div, &Number::from(1), &Number::from(0), &precision)
    ///     .is_err());
    /// ```
    pub fn eval_binary(op: BinaryOperator, lhs: &Number, rhs: &Number, precision: &Precision)
                       -> EvalResult<Number> {
        match op {
            BinaryOperator::Add => lhs.add(rhs, precision),
            BinaryOperator::Sub => lhs.sub(rhs, precision),
            BinaryOperator::Mul => lhs.mul(rhs, precision),
            BinaryOperator::Div => lhs.div(rhs, precision),
            BinaryOperator::Pow => lhs.pow(rhs, precision),
        }
    }
}
