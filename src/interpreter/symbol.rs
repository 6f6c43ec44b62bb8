use crate::error::SymbolError;

/// Position of the first character that breaks the symbol rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidIndex {
    /// The name is the empty string.
    Empty,
    /// Character index of the first invalid character.
    At(usize),
}

/// Tests whether `c` may start a symbol name.
///
/// Characters with the Unicode `Alphabetic` property and the underscore are
/// accepted, which includes letter numbers such as `Ⅻ`.
///
/// # Example
/// ```
/// use exprcalc::interpreter::symbol::is_valid_first_char;
///
/// assert!(is_valid_first_char('x'));
/// assert!(is_valid_first_char('_'));
/// assert!(!is_valid_first_char('1'));
/// ```
#[must_use]
pub fn is_valid_first_char(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

/// Tests whether `c` may appear after the first character of a symbol name.
///
/// Everything accepted by [`is_valid_first_char`] plus the Unicode numeric
/// categories (`Nd`, `Nl` and `No`), so `x2`, `x٣` and `x²` are names.
#[must_use]
pub fn is_valid_char(c: char) -> bool {
    is_valid_first_char(c) || c.is_numeric()
}

/// Finds the first character of `name` that breaks the symbol rules.
///
/// # Returns
/// - `None` if `name` is a valid symbol name.
/// - `Some(InvalidIndex::Empty)` for the empty string.
/// - `Some(InvalidIndex::At(i))` with the character index of the first invalid
///   character otherwise.
///
/// # Example
/// ```
/// use exprcalc::interpreter::symbol::{InvalidIndex, first_invalid_index};
///
/// assert_eq!(first_invalid_index("some_var2"), None);
/// assert_eq!(first_invalid_index(""), Some(InvalidIndex::Empty));
/// assert_eq!(first_invalid_index("2var"), Some(InvalidIndex::At(0)));
/// assert_eq!(first_invalid_index("var$"), Some(InvalidIndex::At(3)));
/// ```
#[must_use]
pub fn first_invalid_index(name: &str) -> Option<InvalidIndex> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Some(InvalidIndex::Empty);
    };
    if !is_valid_first_char(first) {
        return Some(InvalidIndex::At(0));
    }
    chars.position(|c| !is_valid_char(c))
         .map(|i| InvalidIndex::At(i + 1))
}

/// Tests whether `name` is a valid symbol name.
#[must_use]
pub fn is_valid(name: &str) -> bool {
    first_invalid_index(name).is_none()
}

/// Validates a symbol name.
///
/// # Errors
/// - [`SymbolError::Empty`] for the empty string.
/// - [`SymbolError::InvalidChar`] naming the first offending character.
pub fn validate(name: &str) -> Result<(), SymbolError> {
    match first_invalid_index(name) {
        None => Ok(()),
        Some(InvalidIndex::Empty) => Err(SymbolError::Empty),
        Some(InvalidIndex::At(index)) => {
            let ch = name.chars().nth(index).unwrap_or_default();
            Err(SymbolError::InvalidChar { name: name.to_string(),
                                           index,
                                           ch })
        },
    }
}
