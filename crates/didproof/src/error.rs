//! Error types for document assembly, signing and validation.

use didproof_core::{CanonicalError, CoreError, ProofError, VerificationError};
use thiserror::Error;

/// Errors that can occur while building, signing or validating documents.
#[derive(Debug, Error)]
pub enum Error {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonical(#[from] CanonicalError),

    /// The signature primitive refused to sign.
    #[error("proof error: {0}")]
    Proof(#[from] ProofError),

    /// The proof did not verify.
    #[error("verification error: {0}")]
    Verification(#[from] VerificationError),

    /// Key material or encoding error.
    #[error("key error: {0}")]
    Core(#[from] CoreError),

    /// Identifier is not a valid DID for this method.
    #[error("invalid DID: {0}")]
    InvalidDid(String),

    /// Key reference is not of the form `<did>#<fragment>`.
    #[error("invalid key reference: {0}")]
    InvalidKeyReference(String),

    /// `proof.creator` does not name a key listed in the document.
    #[error("proof creator {0} is not listed in the document")]
    UnknownCreator(String),

    /// Signing key reference is not listed in the document.
    #[error("signing key {0} is not listed in the document")]
    KeyNotListed(String),

    /// Listed key does not match the signing keypair.
    #[error("signing keypair does not match listed key {0}")]
    KeyMismatch(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The verification outcome, if this error is one.
    pub fn as_verification(&self) -> Option<&VerificationError> {
        match self {
            Error::Verification(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, Error>;
