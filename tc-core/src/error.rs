//! Time-capsule errors.
//!
//! Structural and authentication errors indicate a malformed or adversarial
//! input and must never be retried. [`Error::Oracle`] and
//! [`Error::Transport`] wrap collaborator failures that a caller may retry
//! with backoff; the core itself performs no hidden retries.

use core::{array::TryFromSliceError, num::TryFromIntError};

/// A time-capsule error.
#[derive(Debug)]
pub enum Error {
    /// The payload is structurally invalid: bad mode byte, bad length
    /// fields, or a violated bounds invariant.
    MalformedPayload(&'static str),
    /// The symmetric tail carries an unsupported sub-format version.
    UnsupportedSubFormat {
        /// The only supported version.
        expected: u8,
        /// The version found in the payload.
        found: u8,
    },
    /// The authentication tag over the ciphertext did not verify.
    AuthenticationFailure,
    /// The beacon has not yet published a signature for the target round.
    PrematureUnlock,
    /// A required envelope tag is absent, duplicated, or incomplete.
    MissingMetadata(&'static str),
    /// Non-canonical base64, or a locked blob in a non-binary encoding.
    Encoding(&'static str),
    /// The envelope is missing its identity or signature, or the signature
    /// failed verification.
    SignatureInvalid,
    /// The envelope kind does not identify a time capsule.
    UnexpectedKind(u32),
    /// Constraint violation (a conversion or derivation out of range).
    ConstraintViolation,
    /// Serde JSON error.
    Json(serde_json::Error),
    /// Timelock oracle failure, potentially transient.
    Oracle(String),
    /// Transport failure, potentially transient.
    Transport(String),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MalformedPayload(s) => write!(f, "malformed payload: {s}"),
            Self::UnsupportedSubFormat { expected, found } => write!(
                f,
                "unsupported sub-format version, expected: {expected:#04x}, found: {found:#04x}"
            ),
            Self::AuthenticationFailure => write!(f, "authentication tag mismatch"),
            Self::PrematureUnlock => {
                write!(f, "the target round's beacon signature is not yet published")
            }
            Self::MissingMetadata(s) => write!(f, "missing metadata: {s}"),
            Self::Encoding(s) => write!(f, "encoding failure: {s}"),
            Self::SignatureInvalid => write!(f, "envelope signature missing or invalid"),
            Self::UnexpectedKind(k) => write!(f, "unexpected envelope kind: {k}"),
            Self::ConstraintViolation => write!(f, "constraint violation"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Oracle(s) => write!(f, "oracle error: {s}"),
            Self::Transport(s) => write!(f, "transport error: {s}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<TryFromIntError> for Error {
    fn from(_: TryFromIntError) -> Self {
        Self::ConstraintViolation
    }
}

impl From<TryFromSliceError> for Error {
    fn from(_: TryFromSliceError) -> Self {
        Self::ConstraintViolation
    }
}

impl From<base64ct::Error> for Error {
    fn from(_: base64ct::Error) -> Self {
        Self::Encoding("non-canonical base64")
    }
}

impl From<hkdf::InvalidLength> for Error {
    fn from(_: hkdf::InvalidLength) -> Self {
        Self::ConstraintViolation
    }
}

impl From<hkdf::InvalidPrkLength> for Error {
    fn from(_: hkdf::InvalidPrkLength) -> Self {
        Self::ConstraintViolation
    }
}
