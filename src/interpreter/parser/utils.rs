use crate::{error::ParseError, interpreter::parser::core::ParseResult};

/// Finds the parenthesis closing the one at byte offset `open`.
///
/// Only the bytes before `end` are searched, so a group can never close
/// outside the span it was opened in.
///
/// # Parameters
/// - `source`: The full source text.
/// - `open`: Byte offset of a `(` in `source`.
/// - `end`: Byte offset one past the last byte of the enclosing span.
///
/// # Returns
/// The byte offset of the matching `)`.
///
/// # Errors
/// [`ParseError::MismatchedParenthesis`] if the group isn't closed before
/// `end`.
///
/// # Example
/// ```
/// use exprcalc::interpreter::parser::utils::find_close_paren;
///
/// assert_eq!(find_close_paren("(1+(2))*3", 0, 9), Ok(6));
/// assert!(find_close_paren("((3)", 0, 4).is_err());
/// ```
pub fn find_close_paren(source: &str, open: usize, end: usize) -> ParseResult<usize> {
    let mut depth = 0usize;
    for (i, byte) in source.bytes().enumerate().take(end).skip(open) {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(i);
                }
            },
            _ => {},
        }
    }
    Err(ParseError::MismatchedParenthesis)
}

/// Splits the argument span `begin..end` of a call on its top-level commas.
///
/// Commas nested in parentheses belong to inner calls and are kept. A span
/// holding nothing but whitespace is a call without arguments and yields no
/// range at all.
///
/// # Returns
/// The byte ranges `(begin, end)` of every argument, in order.
///
/// # Example
/// ```
/// use exprcalc::interpreter::parser::utils::split_arguments;
///
/// let source = "f(2, g(3,4))";
/// assert_eq!(split_arguments(source, 2, 11), vec![(2, 3), (4, 11)]);
/// assert!(split_arguments("f( )", 2, 3).is_empty());
/// ```
#[must_use]
pub fn split_arguments(source: &str, begin: usize, end: usize) -> Vec<(usize, usize)> {
    let span = &source.as_bytes()[begin..end];
    if span.iter().all(|b| matches!(b, b' ' | b'\t')) {
        return Vec::new();
    }

    let mut ranges = Vec::new();
    let mut depth = 0usize;
    let mut start = begin;
    for (offset, byte) in span.iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                ranges.push((start, begin + offset));
                start = begin + offset + 1;
            },
            _ => {},
        }
    }
    ranges.push((start, end));
    ranges
}

/// Converts a byte offset into a character index of `source`.
#[must_use]
pub fn char_position(source: &str, byte_offset: usize) -> usize {
    source.get(..byte_offset)
          .map_or(byte_offset, |prefix| prefix.chars().count())
}
