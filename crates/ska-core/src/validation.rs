//! Validation outcome types.

use std::fmt;

/// Reason a signature failed validation.
///
/// Each code carries a stable integer and a human readable message, which
/// together form the wire-visible part of a failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The recomputed signature does not match the presented one.
    InvalidSignature,
    /// The `valid_until` timestamp lies in the past.
    SignatureTimestampExpired,
}

impl ErrorCode {
    /// Integer code of the error.
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Self::InvalidSignature => 1,
            Self::SignatureTimestampExpired => 2,
        }
    }

    /// Human readable message of the error.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidSignature => "Invalid signature!",
            Self::SignatureTimestampExpired => "Signature timestamp expired!",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<ErrorCode> for u32 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Result of validating a signature.
///
/// `errors` is empty if and only if `result` is `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureValidationResult {
    /// Whether the signature matched and is not expired.
    pub result: bool,
    /// Reasons for failure, in detection order.
    pub errors: Vec<ErrorCode>,
}

impl SignatureValidationResult {
    /// A successful validation.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            result: true,
            errors: Vec::new(),
        }
    }

    /// Build a result from the two independent checks.
    #[must_use]
    pub fn from_checks(signature_matches: bool, expired: bool) -> Self {
        let mut errors = Vec::with_capacity(2);
        if !signature_matches {
            errors.push(ErrorCode::InvalidSignature);
        }
        if expired {
            errors.push(ErrorCode::SignatureTimestampExpired);
        }
        Self {
            result: errors.is_empty(),
            errors,
        }
    }

    /// Whether the validation succeeded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.result
    }

    /// Human readable message of all errors, space separated.
    #[must_use]
    pub fn message(&self) -> String {
        self.reason().join(" ")
    }

    /// Messages of all errors.
    #[must_use]
    pub fn reason(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for SignatureValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.result {
            f.write_str("True")
        } else {
            f.write_str("False")
        }
    }
}

impl From<&SignatureValidationResult> for bool {
    fn from(result: &SignatureValidationResult) -> Self {
        result.result
    }
}
