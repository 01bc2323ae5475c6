//! Environment variable lookups for the binaries and `bz-cli`.
//!
//! A variable set to the empty string counts as unset.

use thiserror::Error;

/// Shortest session secret either binary accepts.
pub const MIN_SECRET_LEN: usize = 32;

/// Shannon entropy floor for secrets, in bits per character.
const MIN_SECRET_ENTROPY: f64 = 3.3;

/// Fragments that give away a copied sample value (matched lowercase).
const PLACEHOLDERS: &[&str] = &[
    "changeme",
    "change-me",
    "placeholder",
    "replace-me",
    "your-",
    "example",
    "secret",
    "password",
    "xxxx",
    "todo",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

#[must_use]
pub fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// # Errors
///
/// [`ConfigError::MissingEnvVar`] when `key` is unset or empty.
pub fn required(key: &str) -> Result<String, ConfigError> {
    optional(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// The first of `keys` that is set, e.g. a service-specific database URL
/// with the generic `DATABASE_URL` behind it.
///
/// # Errors
///
/// Names the first key when none of them is set.
pub fn first_of(keys: &[&str]) -> Result<String, ConfigError> {
    keys.iter().find_map(|key| optional(key)).ok_or_else(|| {
        ConfigError::MissingEnvVar(keys.first().copied().unwrap_or_default().to_string())
    })
}

/// Parse `key`, falling back to `default` when unset.
///
/// # Errors
///
/// [`ConfigError::InvalidEnvVar`] when the value (or default) does not parse.
pub fn parse_or<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = optional(key);
    raw.as_deref()
        .unwrap_or(default)
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Read a session secret and make sure it is fit to sign cookies.
///
/// # Errors
///
/// Missing, or anything [`check_secret`] refuses.
pub fn session_secret(key: &str) -> Result<String, ConfigError> {
    let value = required(key)?;
    check_secret(key, &value)?;
    Ok(value)
}

/// Refuse secrets that are short, look like sample values, or repeat too
/// few characters to be random.
///
/// # Errors
///
/// [`ConfigError::InsecureSecret`] naming `key` and the reason.
pub fn check_secret(key: &str, value: &str) -> Result<(), ConfigError> {
    let insecure = |reason: String| Err(ConfigError::InsecureSecret(key.to_string(), reason));

    let len = value.chars().count();
    if len < MIN_SECRET_LEN {
        return insecure(format!("must be at least {MIN_SECRET_LEN} characters (got {len})"));
    }

    let lower = value.to_lowercase();
    if let Some(fragment) = PLACEHOLDERS.iter().find(|fragment| lower.contains(*fragment)) {
        return insecure(format!("looks like a placeholder (contains '{fragment}')"));
    }

    let entropy = bits_per_char(value);
    if entropy < MIN_SECRET_ENTROPY {
        return insecure(format!(
            "entropy {entropy:.2} bits/char is below {MIN_SECRET_ENTROPY:.1}; generate it randomly"
        ));
    }

    Ok(())
}

/// Shannon entropy of the character distribution.
#[allow(clippy::cast_precision_loss)]
fn bits_per_char(value: &str) -> f64 {
    let mut chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        return 0.0;
    }
    chars.sort_unstable();

    let total = chars.len() as f64;
    chars
        .chunk_by(|a, b| a == b)
        .map(|run| {
            let p = run.len() as f64 / total;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STRONG: &str = "q8#Lm2!vR7@tZ4$wN9%kB3^hF6&dJ1*s";

    #[test]
    fn test_entropy_of_uniform_and_repeated_text() {
        assert!(bits_per_char("").abs() < f64::EPSILON);
        assert!(bits_per_char("zzzzzz").abs() < f64::EPSILON);
        assert!((bits_per_char("abab") - 1.0).abs() < 1e-9);
        assert!(bits_per_char(STRONG) > MIN_SECRET_ENTROPY);
    }

    #[test]
    fn test_strong_secret_passes() {
        assert!(check_secret("STOREFRONT_SESSION_SECRET", STRONG).is_ok());
    }

    #[test]
    fn test_short_secret_names_the_variable() {
        let err = check_secret("ADMIN_SESSION_SECRET", "q8#Lm2!v").unwrap_err();
        assert!(
            matches!(err, ConfigError::InsecureSecret(ref key, ref reason)
                if key == "ADMIN_SESSION_SECRET" && reason.contains("got 8"))
        );
    }

    #[test]
    fn test_sample_values_rejected() {
        let err = check_secret("K", "changeme-q8#Lm2!vR7@tZ4$wN9%kB3^hF6").unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn test_low_entropy_rejected() {
        let err = check_secret("K", &"ab".repeat(20)).unwrap_err();
        assert!(err.to_string().contains("entropy"));
    }
}
