use logos::Logos;

use crate::{
    ast::{Expr, MAX_NESTING_DEPTH},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            binary::ExpressionList,
            utils::{char_position, find_close_paren, split_arguments},
        },
        step::{NoSteps, Step, StepSink},
        value::core::Number,
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
///
/// # Parameters
/// - `source`: The expression text, e.g. `"2*(x+1)"`.
///
/// # Returns
/// The root of the parsed tree.
///
/// # Errors
/// Any [`ParseError`]; see [`parse_range`].
///
/// # Example
/// ```
/// use exprcalc::interpreter::parser::core::parse;
///
/// let expr = parse("1 + 2*x^2").unwrap();
/// assert_eq!(expr.to_string(), "(1+(2*(x^2)))");
///
/// assert!(parse("2+").is_err());
/// ```
pub fn parse(source: &str) -> ParseResult<Expr> {
    parse_range(source, 0, source.len())
}

/// Parses a full expression, reporting a rewrite step for every span parsed.
///
/// Steps are emitted innermost first: each parenthesised group and call
/// argument is reported when it is done, and the whole text last.
///
/// # Example
/// ```
/// use exprcalc::interpreter::parser::core::parse_with_log;
///
/// let mut steps: Vec<String> = Vec::new();
/// parse_with_log("2*(1+3)", &mut steps).unwrap();
///
/// assert_eq!(steps, vec!["1+3 can be rewritten as (1+3)",
///                        "2*(1+3) can be rewritten as (2*(1+3))"]);
/// ```
pub fn parse_with_log(source: &str, log: &mut dyn StepSink) -> ParseResult<Expr> {
    check_range(source, 0, source.len())?;
    parse_span(source, 0, source.len(), 0, log)
}

/// Parses the part of `source` between the byte offsets `begin` and `end`.
///
/// Error positions are reported as character indices into the whole
/// `source`, not into the parsed range.
///
/// # Errors
/// - [`ParseError::InvalidRange`] if the bounds are out of order, past the
///   end of `source` or not on character boundaries.
/// - [`ParseError::MismatchedParenthesis`] for unbalanced parentheses.
/// - [`ParseError::UnknownChar`] for characters outside the grammar.
/// - [`ParseError::UnexpectedToken`] when operands and operators don't
///   alternate.
/// - [`ParseError::EmptyExpression`] for an empty (sub-)expression.
/// - [`ParseError::InvalidNumber`] for malformed numeric literals.
/// - [`ParseError::TooDeep`] when groups, calls or operators nest deeper
///   than [`MAX_NESTING_DEPTH`].
///
/// # Example
/// ```
/// use exprcalc::{error::ParseError, interpreter::parser::core::parse_range};
///
/// let source = "x = 4*(y-1)";
/// assert_eq!(parse_range(source, 4, source.len()).unwrap().to_string(), "(4*(y-1))");
///
/// assert_eq!(parse_range("3$4", 0, 3), Err(ParseError::UnknownChar { ch: '$', position: 1 }));
/// ```
pub fn parse_range(source: &str, begin: usize, end: usize) -> ParseResult<Expr> {
    check_range(source, begin, end)?;
    parse_span(source, begin, end, 0, &mut NoSteps)
}

fn check_range(source: &str, begin: usize, end: usize) -> ParseResult<()> {
    if begin <= end && source.get(begin..end).is_some() {
        Ok(())
    } else {
        Err(ParseError::InvalidRange { begin, end })
    }
}

/// Scans `source[begin..end]`, which must be a valid range.
///
/// The lexer only ever sees the span, so its offsets are relative to `begin`.
/// Parenthesised groups and argument lists are parsed by recursive calls on
/// their inner range and then skipped in one bump. `nesting` counts the
/// enclosing groups and calls.
fn parse_span(source: &str,
              begin: usize,
              end: usize,
              nesting: usize,
              log: &mut dyn StepSink)
              -> ParseResult<Expr> {
    if nesting > MAX_NESTING_DEPTH {
        return Err(ParseError::TooDeep { max: MAX_NESTING_DEPTH });
    }

    let span = &source[begin..end];
    let mut list = ExpressionList::new();
    let mut negate = false;
    let mut lexer = Token::lexer(span);

    while let Some(token) = lexer.next() {
        let range = lexer.span();
        let start = begin + range.start;

        let Ok(token) = token else {
            return Err(unknown_char(source, start));
        };

        if token.is_sign() && !list.is_expecting_operator() {
            if token == Token::Minus {
                negate = !negate;
            }
            continue;
        }
        if let Some(op) = token.operator() {
            list.push_operator(op)?;
            continue;
        }

        let operand = match token {
            Token::Number => parse_number(source, start, &span[range])?,
            Token::Identifier => {
                let name = &span[range.clone()];
                if span[range.end..].starts_with('(') {
                    let open = begin + range.end;
                    let close = find_close_paren(source, open, end)?;
                    let arguments = split_arguments(source, open + 1, close)
                        .into_iter()
                        .map(|(b, e)| parse_span(source, b, e, nesting + 1, log))
                        .collect::<ParseResult<Vec<_>>>()?;
                    lexer.bump(close + 1 - open);
                    Expr::call(name, arguments)?
                } else {
                    Expr::variable(name)?
                }
            },
            Token::LParen => {
                let close = find_close_paren(source, start, end)?;
                let inner = parse_span(source, start + 1, close, nesting + 1, log)?;
                lexer.bump(close - start);
                inner
            },
            Token::RParen => return Err(ParseError::MismatchedParenthesis),
            _ => return Err(unknown_char(source, start)),
        };

        let operand = if negate { Expr::negation(operand) } else { operand };
        negate = false;
        list.push_item(operand)?;
    }

    let result = list.simplify()?;
    log.record(&Step::Rewrite { source: span,
                                result: &result });
    Ok(result)
}

fn parse_number(source: &str, start: usize, literal: &str) -> ParseResult<Expr> {
    literal.parse::<Number>()
           .map(Expr::constant)
           .map_err(|_| ParseError::InvalidNumber { literal:  literal.to_string(),
                                                    position: char_position(source, start), })
}

fn unknown_char(source: &str, start: usize) -> ParseError {
    let ch = source[start..].chars().next().unwrap_or_default();
    ParseError::UnknownChar { ch,
                              position: char_position(source, start) }
}
