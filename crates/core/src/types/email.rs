//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a typed-in address was refused.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must look like name@example.com")]
    Malformed,
}

/// An email address as entered on the login, registration, checkout and
/// admin user forms.
///
/// Surrounding whitespace is dropped. The address needs one `@` with a
/// non-empty name before it and a dotted domain after it. Addresses coming
/// back from the backend deserialize without re-validation.
///
/// ```
/// use bazaar_core::Email;
///
/// assert_eq!(Email::parse(" ada@example.com ").unwrap().as_str(), "ada@example.com");
/// assert!(Email::parse("ada@localhost").is_err());
/// assert!(Email::parse("ada example@example.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// # Errors
    ///
    /// Returns [`EmailError`] when the trimmed input is empty, too long, or
    /// not shaped like `name@domain.tld`.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let address = input.trim();
        if address.is_empty() {
            return Err(EmailError::Empty);
        }
        if address.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if address.chars().any(char::is_whitespace) {
            return Err(EmailError::Malformed);
        }

        let (name, domain) = address.split_once('@').ok_or(EmailError::Malformed)?;
        let dotted = domain.contains('.') && domain.split('.').all(|label| !label.is_empty());
        if name.is_empty() || domain.contains('@') || !dotted {
            return Err(EmailError::Malformed);
        }

        Ok(Self(address.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_shop_addresses() {
        for address in [
            "shopper@example.com",
            "first.last+orders@mail.example.co.uk",
            "a@b.c",
        ] {
            assert_eq!(Email::parse(address).unwrap().as_str(), address);
        }
    }

    #[test]
    fn test_trims_form_input() {
        let email = Email::parse("  shopper@example.com \n").unwrap();
        assert_eq!(email.to_string(), "shopper@example.com");
    }

    #[test]
    fn test_rejects_blank_and_oversized() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            Email::parse(&long),
            Err(EmailError::TooLong {
                max: Email::MAX_LENGTH
            })
        );
    }

    #[test]
    fn test_rejects_malformed() {
        for address in [
            "no-at-symbol",
            "@example.com",
            "shopper@",
            "shopper@localhost",
            "shopper@example..com",
            "shopper@.example.com",
            "two@at@example.com",
            "shop per@example.com",
        ] {
            assert_eq!(Email::parse(address), Err(EmailError::Malformed), "{address}");
        }
    }

    #[test]
    fn test_backend_values_deserialize_as_is() {
        let email: Email = serde_json::from_str("\"legacy@host\"").unwrap();
        assert_eq!(email.as_str(), "legacy@host");
    }
}
