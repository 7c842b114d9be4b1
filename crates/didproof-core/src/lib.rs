//! # didproof core
//!
//! Pure primitives for signed identity documents: canonical JSON and
//! detached Ed25519 proofs.
//!
//! This crate contains no I/O and keeps no state between calls. Everything
//! except [`create_proof`] (clock) and [`generate_nonce`] (randomness) is a
//! pure function.
//!
//! ## Key Types
//!
//! - [`StructuredValue`] - JSON-shaped input to canonicalization
//! - [`CanonicalBytes`] - Output of [`canonicalize`], the exact signing input
//! - [`Proof`] - Detached proof: `{created, creator, nonce, signatureValue, type}`
//! - [`Keypair`] / [`Ed25519PublicKey`] - Key material
//!
//! ## Canonicalization
//!
//! Records are emitted with byte-wise sorted keys and no whitespace; list
//! order is kept. See [`canonical`] module.

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod proof;
pub mod value;

pub use canonical::{canonicalize, canonicalize_serializable, CanonicalBytes};
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::{CanonicalError, CoreError, ProofError, VerificationError};
pub use proof::{
    create_proof, create_proof_at, generate_nonce, signing_input, verify_proof, Proof,
    ED25519_SIGNATURE_TYPE, ED25519_VERIFICATION_KEY_TYPE,
};
pub use value::{Record, StructuredValue};
