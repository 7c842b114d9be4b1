//! Signing and validation of documents.
//!
//! Free functions implement the bare protocol: canonicalize the unsigned
//! document, then create or verify a detached proof over those bytes.
//! [`Signer`] layers configurable policy on top.

use didproof_core::{create_proof, generate_nonce, verify_proof, Ed25519PublicKey, Keypair};
use tracing::{debug, warn};

use crate::did::KeyReference;
use crate::document::{SignedDocument, UnsignedDocument};
use crate::error::{Error, Result};

/// Sign a document with a freshly generated nonce.
pub fn sign(
    document: UnsignedDocument,
    keypair: &Keypair,
    key_ref: &KeyReference,
) -> Result<SignedDocument> {
    sign_with_nonce(document, keypair, key_ref, &generate_nonce())
}

/// Sign a document with a caller-supplied nonce.
pub fn sign_with_nonce(
    document: UnsignedDocument,
    keypair: &Keypair,
    key_ref: &KeyReference,
    nonce: &str,
) -> Result<SignedDocument> {
    let bytes = document.canonical_bytes()?;
    let proof = create_proof(bytes.as_bytes(), &key_ref.to_string(), keypair, nonce)?;

    debug!(
        did = %document.id,
        creator = %key_ref,
        nonce,
        canonical_len = bytes.len(),
        "signed document"
    );

    Ok(SignedDocument::new(document, proof))
}

/// Validate a signed document against a caller-supplied public key.
pub fn validate(document: &SignedDocument, public_key: &Ed25519PublicKey) -> Result<()> {
    let bytes = document.unsigned().canonical_bytes()?;

    match verify_proof(public_key, document.proof(), bytes.as_bytes()) {
        Ok(()) => {
            debug!(did = %document.document.id, creator = document.proof.creator(), "proof valid");
            Ok(())
        }
        Err(e) => {
            warn!(
                did = %document.document.id,
                creator = document.proof.creator(),
                protocol_error = e.is_protocol_error(),
                "proof rejected: {}",
                e
            );
            Err(e.into())
        }
    }
}

/// Validate a signed document using the key its proof names.
///
/// `proof.creator` must match the `id` of a key listed in the document.
pub fn validate_embedded(document: &SignedDocument) -> Result<()> {
    let creator = document.proof().creator();
    let _: KeyReference = creator.parse()?;

    let key = document
        .unsigned()
        .find_key(creator)
        .ok_or_else(|| Error::UnknownCreator(creator.to_string()))?;

    let public_key = key.decode_public_key()?;
    validate(document, &public_key)
}

/// Configuration for [`Signer`].
#[derive(Debug, Clone)]
pub struct SignerConfig {
    /// Refuse to sign unless the key reference is listed in the document and
    /// its listed public key belongs to the signing keypair.
    pub require_listed_key: bool,
    /// Verify every proof right after creating it.
    pub verify_after_sign: bool,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            require_listed_key: true,
            verify_after_sign: true,
        }
    }
}

/// Signs documents with a fixed keypair and key reference.
pub struct Signer {
    /// The signing keypair.
    keypair: Keypair,
    /// Reference recorded as `proof.creator`.
    key_ref: KeyReference,
    /// Configuration.
    config: SignerConfig,
}

impl Signer {
    /// Create a signer.
    pub fn new(keypair: Keypair, key_ref: KeyReference, config: SignerConfig) -> Self {
        Self {
            keypair,
            key_ref,
            config,
        }
    }

    /// The signing key's public half.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    pub fn key_ref(&self) -> &KeyReference {
        &self.key_ref
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Sign with a fresh nonce.
    pub fn sign(&self, document: UnsignedDocument) -> Result<SignedDocument> {
        self.sign_with_nonce(document, &generate_nonce())
    }

    /// Sign with a caller-supplied nonce.
    pub fn sign_with_nonce(&self, document: UnsignedDocument, nonce: &str) -> Result<SignedDocument> {
        if self.config.require_listed_key {
            self.check_listed_key(&document)?;
        }

        let signed = sign_with_nonce(document, &self.keypair, &self.key_ref, nonce)?;

        if self.config.verify_after_sign {
            validate(&signed, &self.keypair.public_key())?;
        }

        Ok(signed)
    }

    /// Validate a document against this signer's public key.
    pub fn validate(&self, document: &SignedDocument) -> Result<()> {
        validate(document, &self.keypair.public_key())
    }

    fn check_listed_key(&self, document: &UnsignedDocument) -> Result<()> {
        let key_id = self.key_ref.to_string();
        let listed = document
            .find_key(&key_id)
            .ok_or_else(|| Error::KeyNotListed(key_id.clone()))?;

        if listed.decode_public_key()? != self.keypair.public_key() {
            return Err(Error::KeyMismatch(key_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::did::Did;
    use crate::document::{DocumentBuilder, ServiceDescriptor};
    use didproof_core::VerificationError;

    fn issuer() -> (Keypair, KeyReference, UnsignedDocument) {
        let keypair = Keypair::from_seed(b"12345678901234567890123456789012");
        let did = Did::from_public_key(&keypair.public_key());
        let key_ref = KeyReference::initial(&did);
        let doc = DocumentBuilder::new(&did)
            .ed25519_key(&key_ref, "fooIssuer", &keypair.public_key())
            .service(ServiceDescriptor::new("schemaID", "schema", "schemaID"))
            .build();
        (keypair, key_ref, doc)
    }

    #[test]
    fn test_sign_and_validate() {
        let (keypair, key_ref, doc) = issuer();
        let signed = sign(doc.clone(), &keypair, &key_ref).unwrap();

        assert_eq!(signed.unsigned(), &doc);
        assert_eq!(signed.proof().creator(), key_ref.to_string());
        validate(&signed, &keypair.public_key()).unwrap();
        validate_embedded(&signed).unwrap();
    }

    #[test]
    fn test_fresh_nonce_per_signature() {
        let (keypair, key_ref, doc) = issuer();
        let s1 = sign(doc.clone(), &keypair, &key_ref).unwrap();
        let s2 = sign(doc, &keypair, &key_ref).unwrap();
        assert_ne!(s1.proof().nonce(), s2.proof().nonce());
        assert_ne!(s1.proof().signature_value(), s2.proof().signature_value());
    }

    #[test]
    fn test_tampered_document_rejected() {
        let (keypair, key_ref, doc) = issuer();
        let mut signed = sign(doc, &keypair, &key_ref).unwrap();
        signed.document.service[0].service_endpoint = "https://evil.example".into();

        let err = validate(&signed, &keypair.public_key()).unwrap_err();
        assert_eq!(
            err.as_verification(),
            Some(&VerificationError::SignatureMismatch)
        );
    }

    #[test]
    fn test_validate_embedded_unknown_creator() {
        let (keypair, _, doc) = issuer();
        let did = doc.did().unwrap();
        let signed = sign(doc, &keypair, &KeyReference::new(&did, "key-2")).unwrap();

        assert!(matches!(
            validate_embedded(&signed),
            Err(Error::UnknownCreator(_))
        ));
    }

    #[test]
    fn test_signer_requires_listed_key() {
        let (keypair, _, doc) = issuer();
        let did = doc.did().unwrap();

        let signer = Signer::new(
            keypair.clone(),
            KeyReference::new(&did, "key-9"),
            SignerConfig::default(),
        );
        assert!(matches!(signer.sign(doc.clone()), Err(Error::KeyNotListed(_))));

        let relaxed = Signer::new(
            keypair,
            KeyReference::new(&did, "key-9"),
            SignerConfig {
                require_listed_key: false,
                ..SignerConfig::default()
            },
        );
        let signed = relaxed.sign(doc).unwrap();
        relaxed.validate(&signed).unwrap();
    }

    #[test]
    fn test_signer_detects_key_mismatch() {
        let (_, key_ref, doc) = issuer();
        let signer = Signer::new(
            Keypair::from_seed(&[3u8; 32]),
            key_ref,
            SignerConfig::default(),
        );
        assert!(matches!(signer.sign(doc), Err(Error::KeyMismatch(_))));
    }

    #[test]
    fn test_signer_with_fixed_nonce() {
        let (keypair, key_ref, doc) = issuer();
        let signer = Signer::new(keypair.clone(), key_ref.clone(), SignerConfig::default());

        let s1 = signer.sign_with_nonce(doc.clone(), "fixed").unwrap();
        let s2 = sign_with_nonce(doc, &keypair, &key_ref, "fixed").unwrap();
        assert_eq!(s1.proof().signature_value(), s2.proof().signature_value());
        assert_eq!(signer.public_key(), keypair.public_key());
        assert!(signer.config().verify_after_sign);
    }
}
