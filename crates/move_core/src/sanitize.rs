//! Feature token sanitization
//!
//! Board snapshots are logged as a mix of decimal numerals and single
//! hexadecimal digits (`0`-`9`, `A`-`F`). Training rows and inference
//! requests both go through [`sanitize_row`] so the two call sites can never
//! disagree on how a token maps to an integer.

use thiserror::Error;

/// Number of feature columns in a board snapshot row
pub const FEATURE_COUNT: usize = 8;

/// Errors raised while converting raw tokens into integer features
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("malformed feature at position {position}: {token:?} is neither decimal nor hexadecimal")]
    MalformedFeature { position: usize, token: String },

    #[error("expected {expected} features, got {found}")]
    WrongArity { expected: usize, found: usize },
}

impl SanitizeError {
    fn at(self, position: usize) -> Self {
        match self {
            SanitizeError::MalformedFeature { token, .. } => {
                SanitizeError::MalformedFeature { position, token }
            }
            other => other,
        }
    }
}

/// Convert a single raw token into a non-negative integer.
///
/// Tokens made only of decimal digits are read in base 10, everything else
/// in base 16. Surrounding whitespace is ignored.
pub fn sanitize_token(token: &str) -> Result<i64, SanitizeError> {
    let trimmed = token.trim();
    let malformed = || SanitizeError::MalformedFeature {
        position: 0,
        token: token.to_string(),
    };

    if trimmed.is_empty() {
        return Err(malformed());
    }

    let radix = if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        10
    } else if trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
        16
    } else {
        return Err(malformed());
    };

    i64::from_str_radix(trimmed, radix).map_err(|_| malformed())
}

/// Sanitize a full feature row of exactly [`FEATURE_COUNT`] tokens.
pub fn sanitize_row<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<i64>, SanitizeError> {
    if tokens.len() != FEATURE_COUNT {
        return Err(SanitizeError::WrongArity {
            expected: FEATURE_COUNT,
            found: tokens.len(),
        });
    }

    tokens
        .iter()
        .enumerate()
        .map(|(position, token)| sanitize_token(token.as_ref()).map_err(|e| e.at(position)))
        .collect()
}
