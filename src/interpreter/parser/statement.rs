use std::collections::HashMap;

use crate::{
    ast::{Command, Expr, Statement},
    error::{ParseError, SessionError},
    interpreter::{
        parser::core::parse_with_log,
        step::StepSink,
    },
};

/// Keyword marking an assignment or a function definition as readonly.
pub const READONLY_KEYWORD: &str = "readonly";

/// Parses one line of the interactive session.
///
/// A line is, in order of precedence:
/// - a command, when the trimmed line is exactly one of the keys of
///   `commands`;
/// - an assignment, definition or deletion, when it contains `=`;
/// - an expression otherwise.
///
/// Rewrite steps of every expression parsed are sent to `log`.
///
/// # Errors
/// - [`SessionError::OnlyOneEquality`] if the line has more than one `=`.
/// - [`SessionError::ReservedWord`] if a command word is used as a name.
/// - [`SessionError::IncorrectDelete`] for a function deletion listing
///   parameter names instead of an arity, e.g. `f(x)=`.
/// - [`SessionError::Parse`] for malformed expressions or signatures.
///
/// # Example
/// ```
/// use std::collections::HashMap;
///
/// use exprcalc::{
///     ast::Statement,
///     interpreter::{parser::statement::parse_statement, step::NoSteps},
/// };
///
/// let commands = HashMap::new();
/// let statement = parse_statement("f(2)=", &commands, &mut NoSteps).unwrap();
///
/// assert_eq!(statement, Statement::DeleteFunction { name: "f".to_string(), arity: 2 });
/// ```
pub fn parse_statement(line: &str,
                       commands: &HashMap<String, Command>,
                       log: &mut dyn StepSink)
                       -> Result<Statement, SessionError> {
    let trimmed = line.trim();
    if let Some(command) = commands.get(trimmed) {
        return Ok(Statement::Command(*command));
    }

    let Some((lhs, rhs)) = line.split_once('=') else {
        return Ok(Statement::Expression(parse_with_log(line, log)?));
    };
    if rhs.contains('=') {
        return Err(SessionError::OnlyOneEquality);
    }

    let (lhs, readonly) = strip_readonly(lhs.trim());
    let deletion = rhs.trim().is_empty();

    match lhs.split_once('(') {
        None => {
            let name = reserved_checked(lhs, commands)?;
            if deletion {
                Ok(Statement::DeleteVariable { name })
            } else {
                let value = parse_with_log(rhs, log)?;
                Ok(Statement::AssignVariable { name, value, readonly })
            }
        },
        Some((name, rest)) => {
            let name = reserved_checked(name.trim(), commands)?;
            let inner = rest.trim_end()
                            .strip_suffix(')')
                            .ok_or(ParseError::MismatchedParenthesis)?;
            if deletion {
                let arity = inner.trim()
                                 .parse::<usize>()
                                 .map_err(|_| SessionError::IncorrectDelete)?;
                Ok(Statement::DeleteFunction { name, arity })
            } else {
                let params = split_params(inner);
                let body: Expr = parse_with_log(rhs, log)?;
                Ok(Statement::DefineFunction { name,
                                               params,
                                               body,
                                               readonly })
            }
        },
    }
}

/// Removes a leading `readonly` keyword, which must be followed by
/// whitespace to count as one.
fn strip_readonly(lhs: &str) -> (&str, bool) {
    match lhs.strip_prefix(READONLY_KEYWORD) {
        Some(rest) if rest.starts_with(char::is_whitespace) => (rest.trim_start(), true),
        _ => (lhs, false),
    }
}

fn reserved_checked(name: &str, commands: &HashMap<String, Command>)
                    -> Result<String, SessionError> {
    if commands.contains_key(name) {
        return Err(SessionError::ReservedWord { name: name.to_string() });
    }
    Ok(name.to_string())
}

/// Splits a parameter list on commas. A blank list declares no parameters.
fn split_params(inner: &str) -> Vec<String> {
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner.split(',').map(|p| p.trim().to_string()).collect()
}
