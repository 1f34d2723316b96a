//! Helpers for ISBN-13 identifiers.
//!
//! Identifiers are always handled as digit strings, never as numbers, so leading zeros and
//! full precision are preserved.

use crate::{Error, ErrorKind};

/// Strips everything but ASCII digits from `input`.
///
/// ```
/// assert_eq!("9780380815937", shelf::isbn::digits_only("978-0380815937"));
/// ```
#[must_use]
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Normalizes a caller supplied identifier to the digit string used throughout the crate.
///
/// # Errors
///
/// An [`ErrorKind::InvalidInput`] error is returned when `input` contains no digits at all.
pub fn normalize(input: &str) -> Result<String, Error> {
    let isbn = digits_only(input);
    if isbn.is_empty() {
        Err(Error::new(
            ErrorKind::InvalidInput,
            format!("'{input}' does not contain any digits"),
        ))
    } else {
        Ok(isbn)
    }
}

/// Returns `true` if `value` is exactly thirteen ASCII digits.
#[must_use]
pub fn is_isbn13(value: &str) -> bool {
    value.len() == 13 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Validates the ISBN-13 check digit (alternating weights of 1 and 3, modulo 10).
///
/// Returns `false` for anything that is not shaped like an ISBN-13.
#[must_use]
pub fn has_valid_check_digit(value: &str) -> bool {
    if !is_isbn13(value) {
        return false;
    }

    let sum: u32 = value
        .bytes()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d } else { d * 3 })
        .sum();

    sum % 10 == 0
}
