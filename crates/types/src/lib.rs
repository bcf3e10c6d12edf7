//! Validated text primitives shared across the workspace.
//!
//! Every type here guarantees its invariant once constructed, so the record
//! store and the workflow services can hold them without re-checking.
//! Digit-only identifiers are normalised on construction: any character that
//! is not an ASCII digit is dropped before the length is checked, so
//! `"123.456.789-01"` and `"12345678901"` produce the same [`NationalId`].

use std::fmt;

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// A digit-only field did not have an accepted number of digits
    #[error("{field} must contain {expected} digits")]
    DigitCount {
        field: &'static str,
        expected: &'static str,
    },

    /// State code was not two ASCII letters
    #[error("state code must contain exactly 2 letters")]
    StateCode,

    /// E-mail address is not of the form `local@domain`
    #[error("invalid e-mail address")]
    Email,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match, used by registry searches.
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Keeps only the ASCII digits of `input`.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

fn digits_with_len(
    input: &str,
    field: &'static str,
    expected: &'static str,
    accepted: &[usize],
) -> Result<String, TextError> {
    let digits = digits_only(input);
    if accepted.contains(&digits.len()) {
        Ok(digits)
    } else {
        Err(TextError::DigitCount { field, expected })
    }
}

/// Patient national identifier (CPF): exactly 11 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
    pub const DIGITS: usize = 11;

    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        digits_with_len(input.as_ref(), "national id", "11", &[Self::DIGITS]).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Phone number with area code: 10 or 11 digits.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        digits_with_len(input.as_ref(), "phone", "10 or 11", &[10, 11]).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Public health system card number (SUS): exactly 15 digits.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HealthCardNumber(String);

impl HealthCardNumber {
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        digits_with_len(input.as_ref(), "health card", "15", &[15]).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Postal code (CEP): exactly 8 digits.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        digits_with_len(input.as_ref(), "postal code", "8", &[8]).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Two-letter federative unit code, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateCode(String);

impl StateCode {
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let upper = input.as_ref().trim().to_ascii_uppercase();
        if upper.len() == 2 && upper.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(upper))
        } else {
            Err(TextError::StateCode)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Minimal e-mail address: one `@` with a non-empty local part and a dotted domain.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        let valid = match trimmed.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !trimmed.chars().any(char::is_whitespace)
            }
            None => false,
        };
        if valid {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(TextError::Email)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_conversions {
    ($($ty:ident => $ctor:ident),* $(,)?) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = TextError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::$ctor(value)
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.0
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
    };
}

string_conversions! {
    NationalId => parse,
    PhoneNumber => parse,
    HealthCardNumber => parse,
    PostalCode => parse,
    StateCode => parse,
    EmailAddress => parse,
}
