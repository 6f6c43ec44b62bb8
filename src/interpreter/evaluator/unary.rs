use crate::{
    ast::Expr,
    interpreter::{
        evaluator::core::{Context, Depth, EvalResult},
        step::StepSink,
        value::core::Number,
    },
};

impl Context {
    /// Evaluates the operand of a negation node and flips its sign.
    ///
    /// Negation is exact, so `-(x)` keeps every digit of `x`.
    pub(crate) fn eval_negation(&self, expr: &Expr, depth: Depth, log: &mut dyn StepSink)
                                -> EvalResult<Number> {
        self.eval(expr, depth.child(), log).map(|value| value.neg())
    }
}
