use std::{fmt, io::Write};

use crate::{ast::Expr, error::ContextError, interpreter::value::core::Number};

/// One step of a parse or evaluation, reported to a [`StepSink`].
///
/// Steps render to the human readable lines printed by the verbose mode of
/// the interactive session.
#[derive(Debug, Clone, Copy)]
pub enum Step<'a> {
    /// A span of source text was parsed into a tree.
    Rewrite {
        /// The parsed span, as written.
        source: &'a str,
        /// The resulting tree.
        result: &'a Expr,
    },
    /// A non-constant node was evaluated.
    Evaluate {
        /// The evaluated node.
        expr:  &'a Expr,
        /// Its value.
        value: &'a Number,
    },
    /// A top-level result could not be stored in `ans`.
    StoreFailed {
        /// Why the context rejected the write.
        reason: &'a ContextError,
    },
}

impl fmt::Display for Step<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rewrite { source, result } => {
                write!(f, "{} can be rewritten as {result}", source.trim())
            },
            Self::Evaluate { expr, value } => write!(f, "{expr} evaluates to {value}"),
            Self::StoreFailed { reason } => {
                write!(f, "Warning: failed to store result. Reason: {reason}")
            },
        }
    }
}

/// Receiver of parse and evaluation steps.
///
/// The sink is owned by the caller and borrowed for the duration of a single
/// `parse_with_log` or `evaluate` call, so recording a step never outlives the
/// operation that produced it.
pub trait StepSink {
    /// Records one step.
    fn record(&mut self, step: &Step<'_>);
}

/// A sink that discards every step.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSteps;

impl StepSink for NoSteps {
    fn record(&mut self, _step: &Step<'_>) {}
}

/// Collects the rendered steps, one line per entry.
///
/// # Example
/// ```
/// use exprcalc::interpreter::{evaluator::core::Context, parser::core::parse};
///
/// let ctx = Context::new();
/// let expr = parse("2*3+1").unwrap();
/// let mut steps: Vec<String> = Vec::new();
///
/// ctx.evaluate(&expr, &mut steps).unwrap();
///
/// assert_eq!(steps, vec!["(2*3) evaluates to 6", "((2*3)+1) evaluates to 7"]);
/// ```
impl StepSink for Vec<String> {
    fn record(&mut self, step: &Step<'_>) {
        self.push(step.to_string());
    }
}

/// Writes every step as a line to the wrapped writer.
///
/// Write failures are logged and otherwise ignored: a broken verbose stream
/// never fails the evaluation it describes.
pub struct WriterSink<'w>(pub &'w mut dyn Write);

impl StepSink for WriterSink<'_> {
    fn record(&mut self, step: &Step<'_>) {
        if let Err(err) = writeln!(self.0, "{step}") {
            tracing::warn!(%err, "failed to write step");
        }
    }
}

impl fmt::Debug for WriterSink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WriterSink")
    }
}
