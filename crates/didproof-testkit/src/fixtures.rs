//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use didproof::{
    sign_with_nonce, Did, DocumentBuilder, KeyReference, Keypair, ServiceDescriptor,
    SignedDocument, UnsignedDocument,
};

/// Seed of the reference issuer used by the golden vectors.
pub const REFERENCE_SEED: [u8; 32] = *b"12345678901234567890123456789012";

/// Nonce used by the golden vectors.
pub const REFERENCE_NONCE: &str = "0948bb75-60c2-4a92-ad50-01ccee169ae0";

/// An issuer: a keypair with its derived DID and initial key reference.
pub struct TestIssuer {
    pub keypair: Keypair,
    pub did: Did,
    pub key_ref: KeyReference,
}

impl TestIssuer {
    /// Create an issuer with a random keypair.
    pub fn new() -> Self {
        Self::from_keypair(Keypair::generate())
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::from_keypair(Keypair::from_seed(&seed))
    }

    /// The issuer behind the golden vectors.
    pub fn reference() -> Self {
        Self::with_seed(REFERENCE_SEED)
    }

    fn from_keypair(keypair: Keypair) -> Self {
        let did = Did::from_public_key(&keypair.public_key());
        let key_ref = KeyReference::initial(&did);
        Self {
            keypair,
            did,
            key_ref,
        }
    }

    /// Get the keypair's public key.
    pub fn public_key(&self) -> didproof::Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// Build a document listing this issuer's key, controlled by `controller`.
    pub fn make_document(&self, controller: &str) -> UnsignedDocument {
        DocumentBuilder::new(&self.did)
            .ed25519_key(&self.key_ref, controller, &self.public_key())
            .service(ServiceDescriptor::new("schemaID", "schema", "schemaID"))
            .build()
    }

    /// Build and sign a document with a fixed nonce.
    pub fn make_signed(&self, controller: &str, nonce: &str) -> SignedDocument {
        sign_with_nonce(
            self.make_document(controller),
            &self.keypair,
            &self.key_ref,
            nonce,
        )
        .expect("fixture document signs")
    }
}

impl Default for TestIssuer {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple issuers for multi-party tests.
pub fn multi_party_issuers(count: usize) -> Vec<TestIssuer> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[..8].copy_from_slice(&(i as u64).to_le_bytes());
            TestIssuer::with_seed(seed)
        })
        .collect()
}
