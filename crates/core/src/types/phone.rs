//! Customer phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input contains no digits.
    #[error("phone number cannot be empty")]
    Empty,
    /// Too few digits to be dialable.
    #[error("phone number must have at least {min} digits")]
    TooShort {
        /// Minimum number of digits.
        min: usize,
    },
    /// Too many digits for E.164.
    #[error("phone number must have at most {max} digits")]
    TooLong {
        /// Maximum number of digits.
        max: usize,
    },
    /// Contains characters other than digits and common separators.
    #[error("phone number contains invalid character '{0}'")]
    InvalidCharacter(char),
}

/// A customer phone number, stored as digits only (with an optional leading `+`).
///
/// Checkout identifies the customer profile by phone, so two spellings of the
/// same number (`(11) 98765-4321` and `11987654321`) must compare equal.
///
/// ## Examples
///
/// ```
/// use forkful_core::Phone;
///
/// let a = Phone::parse("(11) 98765-4321").unwrap();
/// let b = Phone::parse("11987654321").unwrap();
/// assert_eq!(a, b);
///
/// assert!(Phone::parse("").is_err());
/// assert!(Phone::parse("12-ab").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum number of digits (area code + local number).
    pub const MIN_DIGITS: usize = 8;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `Phone`, stripping spaces, dashes, dots and parentheses.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits, has an unexpected
    /// character, or has a digit count outside `MIN_DIGITS..=MAX_DIGITS`.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        let (plus, rest) = trimmed
            .strip_prefix('+')
            .map_or((false, trimmed), |rest| (true, rest));

        let mut digits = String::with_capacity(rest.len());
        for c in rest.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' | '.' | '(' | ')' => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }
        if digits.len() < Self::MIN_DIGITS {
            return Err(PhoneError::TooShort {
                min: Self::MIN_DIGITS,
            });
        }
        if digits.len() > Self::MAX_DIGITS {
            return Err(PhoneError::TooLong {
                max: Self::MAX_DIGITS,
            });
        }

        if plus {
            digits.insert(0, '+');
        }
        Ok(Self(digits))
    }

    /// Returns the normalized phone string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_separators() {
        let phone = Phone::parse("(11) 98765-4321").unwrap();
        assert_eq!(phone.as_str(), "11987654321");
    }

    #[test]
    fn test_parse_keeps_leading_plus() {
        let phone = Phone::parse("+55 11 98765.4321").unwrap();
        assert_eq!(phone.as_str(), "+5511987654321");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Phone::parse("  "), Err(PhoneError::Empty));
        assert_eq!(Phone::parse("()-"), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Phone::parse("12345"),
            Err(PhoneError::TooShort { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            Phone::parse("1234567890123456"),
            Err(PhoneError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            Phone::parse("1198765x321"),
            Err(PhoneError::InvalidCharacter('x'))
        );
    }

    #[test]
    fn test_serde_transparent() {
        let phone = Phone::parse("11987654321").unwrap();
        assert_eq!(serde_json::to_string(&phone).unwrap(), "\"11987654321\"");
    }
}
