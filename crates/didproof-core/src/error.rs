//! Error types for didproof core.

use thiserror::Error;

/// Errors raised while producing canonical bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CanonicalError {
    /// Only records are canonicalized for signing.
    #[error("canonicalization requires a record at the top level, found {found}")]
    NotARecord { found: &'static str },

    /// The input could not be converted into a structured value.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors raised while creating a proof.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProofError {
    /// The signature primitive refused to sign (e.g. corrupt key material).
    #[error("signing failed: {0}")]
    SigningFailure(String),
}

/// Errors raised while verifying a proof.
///
/// The first two variants are protocol errors: the proof cannot even be
/// interpreted. `SignatureMismatch` is a trust failure: the proof is well
/// formed but does not hold for the given bytes and key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("unsupported proof type: expected {expected}, got {found}")]
    UnsupportedProofType { expected: String, found: String },

    #[error("malformed signature encoding: {0}")]
    MalformedSignatureEncoding(String),

    #[error("signature does not match document, nonce and public key")]
    SignatureMismatch,
}

impl VerificationError {
    /// True if the proof is syntactically unusable (wrong scheme or encoding).
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            VerificationError::UnsupportedProofType { .. }
                | VerificationError::MalformedSignatureEncoding(_)
        )
    }

    /// True if the proof is well formed but cryptographically invalid.
    pub fn is_trust_failure(&self) -> bool {
        matches!(self, VerificationError::SignatureMismatch)
    }
}

/// Errors for key material, encodings and timestamps.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("invalid base58: {0}")]
    Base58(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl From<bs58::decode::Error> for CoreError {
    fn from(e: bs58::decode::Error) -> Self {
        CoreError::Base58(e.to_string())
    }
}
