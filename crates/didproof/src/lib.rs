//! # didproof
//!
//! Self-describing identity documents with detached Ed25519 proofs.
//!
//! ## Overview
//!
//! - **Documents**: an identifier, the keys it controls, and its services
//! - **Canonical form**: byte-wise sorted keys, no whitespace, list order kept
//! - **Proofs**: Ed25519 over `canonical_bytes || "." || nonce`, base58 encoded
//! - **Identifiers**: `did:work:` + base58 of the first 16 public-key bytes
//!
//! ## Usage
//!
//! ```rust
//! use didproof::{
//!     sign, validate, Did, DocumentBuilder, KeyReference, Keypair, ServiceDescriptor,
//! };
//!
//! let keypair = Keypair::generate();
//! let did = Did::from_public_key(&keypair.public_key());
//! let key_ref = KeyReference::initial(&did);
//!
//! let document = DocumentBuilder::new(&did)
//!     .ed25519_key(&key_ref, did.as_str(), &keypair.public_key())
//!     .service(ServiceDescriptor::new("schemas", "schema", "https://example.com/schemas"))
//!     .build();
//!
//! let signed = sign(document, &keypair, &key_ref).unwrap();
//! validate(&signed, &keypair.public_key()).unwrap();
//! ```
//!
//! ## Re-exports
//!
//! - `didproof::core` - canonicalizer, proof engine, key material

pub mod did;
pub mod document;
pub mod error;
pub mod signer;

// Re-export the core crate
pub use didproof_core as core;

pub use did::{Did, KeyReference, DID_METHOD_PREFIX, INITIAL_KEY};
pub use document::{
    DocumentBuilder, KeyDescriptor, ServiceDescriptor, SignedDocument, UnsignedDocument,
};
pub use error::{Error, Result};
pub use signer::{sign, sign_with_nonce, validate, validate_embedded, Signer, SignerConfig};

// Re-export commonly used core types
pub use didproof_core::{
    canonicalize, CanonicalBytes, CanonicalError, Ed25519PublicKey, Ed25519Signature, Keypair,
    Proof, ProofError, Record, StructuredValue, VerificationError,
};
