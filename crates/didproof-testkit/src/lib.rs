//! # didproof testkit
//!
//! Testing utilities for didproof.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: canonical forms and signatures every implementation must reproduce
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Ready-made issuers and documents
//!
//! ## Golden Vectors
//!
//! ```rust
//! use didproof_testkit::vectors::verify_all_vectors;
//!
//! let failures = verify_all_vectors();
//! assert!(failures.is_empty(), "{:?}", failures);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use didproof::core::canonicalize;
//! use didproof_testkit::generators::shuffled_record_pair;
//!
//! proptest! {
//!     #[test]
//!     fn field_order_is_irrelevant((a, b) in shuffled_record_pair()) {
//!         prop_assert_eq!(canonicalize(&a).unwrap(), canonicalize(&b).unwrap());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use didproof_testkit::fixtures::TestIssuer;
//!
//! let issuer = TestIssuer::new();
//! let signed = issuer.make_signed("fooIssuer", "nonce");
//! didproof::validate(&signed, &issuer.public_key()).unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_issuers, TestIssuer, REFERENCE_NONCE, REFERENCE_SEED};
pub use generators::{record, shuffled_record_pair, signed_document_inputs, structured_value};
pub use vectors::{canonical_vectors, signature_vectors, verify_all_vectors, REFERENCE_DOCUMENT};
