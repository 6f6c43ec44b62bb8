use crate::{
    ast::{BinaryOperator, Expr, MAX_NESTING_DEPTH},
    error::ParseError,
    interpreter::parser::core::ParseResult,
};

/// Operands and operators collected while scanning one span, in source order.
///
/// Operands and operators must alternate, starting and ending with an
/// operand. The list tracks which kind it expects next and rejects anything
/// out of turn, so once scanning is done [`ExpressionList::simplify`] only has
/// to fold the operators by precedence.
///
/// # Example
/// ```
/// use exprcalc::{
///     ast::{BinaryOperator, Expr, MAX_NESTING_DEPTH},
///     interpreter::parser::binary::ExpressionList,
/// };
///
/// let mut list = ExpressionList::new();
/// list.push_item(Expr::constant(1)).unwrap();
/// list.push_operator(BinaryOperator::Add).unwrap();
/// list.push_item(Expr::constant(2)).unwrap();
/// list.push_operator(BinaryOperator::Mul).unwrap();
/// list.push_item(Expr::constant(3)).unwrap();
///
/// assert_eq!(list.simplify().unwrap().to_string(), "(1+(2*3))");
/// ```
#[derive(Debug, Default, Clone)]
pub struct ExpressionList {
    items:           Vec<Expr>,
    depths:          Vec<usize>,
    operators:       Vec<BinaryOperator>,
    expect_operator: bool,
}

impl ExpressionList {
    /// Creates an empty list, expecting an operand.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tests whether the next element must be an operator.
    #[must_use]
    pub const fn is_expecting_operator(&self) -> bool {
        self.expect_operator
    }

    /// Appends an operand.
    ///
    /// # Errors
    /// [`ParseError::UnexpectedToken`] with `operator_expected` set if the
    /// previous element was also an operand.
    pub fn push_item(&mut self, item: Expr) -> ParseResult<()> {
        if self.expect_operator {
            return Err(ParseError::UnexpectedToken { operator_expected: true,
                                                     at_end:            false, });
        }
        self.depths.push(item.depth());
        self.items.push(item);
        self.expect_operator = true;
        Ok(())
    }

    /// Appends an operator.
    ///
    /// # Errors
    /// [`ParseError::UnexpectedToken`] if an operand was expected instead.
    pub fn push_operator(&mut self, op: BinaryOperator) -> ParseResult<()> {
        if !self.expect_operator {
            return Err(ParseError::UnexpectedToken { operator_expected: false,
                                                     at_end:            false, });
        }
        self.operators.push(op);
        self.expect_operator = false;
        Ok(())
    }

    /// Folds the list into a single tree.
    ///
    /// Operators are reduced in the passes given by
    /// [`BinaryOperator::PRECEDENCE_PASSES`]. Within a pass the leftmost
    /// remaining operator is reduced first, so every operator, `^` included,
    /// associates to the left: `2^3^2` is `(2^3)^2`.
    ///
    /// # Errors
    /// - [`ParseError::EmptyExpression`] if no operand was pushed.
    /// - [`ParseError::UnexpectedToken`] with `at_end` set if the list ends
    ///   with an operator.
    /// - [`ParseError::InvalidOperator`] if operators are left over after the
    ///   last pass.
    /// - [`ParseError::TooDeep`] if the folded tree would be deeper than
    ///   [`MAX_NESTING_DEPTH`].
    pub fn simplify(mut self) -> ParseResult<Expr> {
        if self.items.is_empty() {
            return Err(ParseError::EmptyExpression);
        }
        if !self.expect_operator {
            return Err(ParseError::UnexpectedToken { operator_expected: false,
                                                     at_end:            true, });
        }

        for pass in BinaryOperator::PRECEDENCE_PASSES {
            self.reduce(pass)?;
        }

        if let Some(op) = self.operators.first() {
            return Err(ParseError::InvalidOperator { op: op.symbol() });
        }
        match (self.items.pop(), self.items.is_empty()) {
            (Some(expr), true) => Ok(expr),
            _ => Err(ParseError::EmptyExpression),
        }
    }

    /// Replaces every `left op right` triple whose operator is in `pass` by a
    /// single binary node, scanning left to right.
    fn reduce(&mut self, pass: &[BinaryOperator]) -> ParseResult<()> {
        let mut i = 0;
        while i < self.operators.len() {
            if !pass.contains(&self.operators[i]) {
                i += 1;
                continue;
            }
            let depth = self.depths[i].max(self.depths[i + 1]) + 1;
            if depth > MAX_NESTING_DEPTH {
                return Err(ParseError::TooDeep { max: MAX_NESTING_DEPTH });
            }
            let op = self.operators.remove(i);
            let right = self.items.remove(i + 1);
            self.depths.remove(i + 1);
            self.depths[i] = depth;
            let left = std::mem::replace(&mut self.items[i], Expr::constant(0));
            self.items[i] = Expr::BinaryOp { left: Box::new(left),
                                             op,
                                             right: Box::new(right) };
        }
        Ok(())
    }
}
