//! Detached Ed25519 proofs.
//!
//! A proof binds one snapshot of canonical document bytes and one nonce to a
//! signing key. The signed message is
//!
//! ```text
//! document_bytes || "." || utf8(nonce)
//! ```
//!
//! signed directly with Ed25519 (no pre-hash) and encoded as base58.
//!
//! **CRITICAL**: The message layout is FROZEN. Changes break all existing
//! proofs.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::{Ed25519PublicKey, Ed25519Signature, Keypair};
use crate::error::{CoreError, ProofError, VerificationError};

/// Signature-scheme tag carried in `proof.type`.
pub const ED25519_SIGNATURE_TYPE: &str = "WorkdayEd25519Signature2020";

/// Verification-method tag for Ed25519 keys listed in a document.
pub const ED25519_VERIFICATION_KEY_TYPE: &str = "WorkdayEd25519VerificationKey2020";

/// Separator between document bytes and nonce. Never escaped or
/// length-prefixed.
pub const NONCE_SEPARATOR: u8 = b'.';

/// A detached proof over canonical document bytes.
///
/// Fields are read-only; a proof is produced by [`create_proof`] or
/// deserialized from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    created: String,
    creator: String,
    nonce: String,
    signature_value: String,
    #[serde(rename = "type")]
    proof_type: String,
}

impl Proof {
    /// RFC 3339 creation time.
    pub fn created(&self) -> &str {
        &self.created
    }

    /// Fully qualified reference of the signing key (`<did>#<fragment>`).
    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Base58 signature.
    pub fn signature_value(&self) -> &str {
        &self.signature_value
    }

    /// Signature-scheme tag.
    pub fn proof_type(&self) -> &str {
        &self.proof_type
    }

    /// Parse `created` back into a UTC timestamp.
    pub fn created_at(&self) -> Result<DateTime<Utc>, CoreError> {
        DateTime::parse_from_rfc3339(&self.created)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| CoreError::InvalidTimestamp(format!("{}: {e}", self.created)))
    }
}

/// Build the message to sign.
pub fn signing_input(document_bytes: &[u8], nonce: &str) -> Vec<u8> {
    let mut msg = Vec::with_capacity(document_bytes.len() + 1 + nonce.len());
    msg.extend_from_slice(document_bytes);
    msg.push(NONCE_SEPARATOR);
    msg.extend_from_slice(nonce.as_bytes());
    msg
}

/// Generate a random nonce (UUID v4, hyphenated).
pub fn generate_nonce() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Create a proof stamped with the current time.
pub fn create_proof(
    document_bytes: &[u8],
    key_ref: &str,
    signing_key: &Keypair,
    nonce: &str,
) -> Result<Proof, ProofError> {
    create_proof_at(document_bytes, key_ref, signing_key, nonce, Utc::now())
}

/// Create a proof with an explicit creation time.
///
/// `signature_value` depends only on the document bytes, nonce and key; the
/// timestamp is not signed.
pub fn create_proof_at(
    document_bytes: &[u8],
    key_ref: &str,
    signing_key: &Keypair,
    nonce: &str,
    created: DateTime<Utc>,
) -> Result<Proof, ProofError> {
    let message = signing_input(document_bytes, nonce);
    let signature = signing_key.sign(&message)?;

    Ok(Proof {
        created: created.to_rfc3339_opts(SecondsFormat::Secs, true),
        creator: key_ref.to_string(),
        nonce: nonce.to_string(),
        signature_value: signature.to_base58(),
        proof_type: ED25519_SIGNATURE_TYPE.to_string(),
    })
}

/// Verify a proof against document bytes and a public key.
///
/// Checks run in order: scheme tag, signature encoding, signature.
pub fn verify_proof(
    public_key: &Ed25519PublicKey,
    proof: &Proof,
    document_bytes: &[u8],
) -> Result<(), VerificationError> {
    // 1. Never interpret another scheme's bytes as Ed25519
    if proof.proof_type != ED25519_SIGNATURE_TYPE {
        return Err(VerificationError::UnsupportedProofType {
            expected: ED25519_SIGNATURE_TYPE.to_string(),
            found: proof.proof_type.clone(),
        });
    }

    // 2. Decode the signature
    let signature = Ed25519Signature::from_base58(&proof.signature_value)
        .map_err(|e| VerificationError::MalformedSignatureEncoding(e.to_string()))?;

    // 3. Verify over the rebuilt message
    let message = signing_input(document_bytes, &proof.nonce);
    if !public_key.verify(&message, &signature) {
        return Err(VerificationError::SignatureMismatch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SEED: &[u8; 32] = b"12345678901234567890123456789012";
    const NONCE: &str = "0948bb75-60c2-4a92-ad50-01ccee169ae0";
    const CREATOR: &str = "did:work:6sYe1y3zXhmyrBkgHgAgaq#key-1";
    const EXPECTED_SIGNATURE: &str =
        "2NQNA7SXVrTJRPYGAtpdxXAaKZDdzzQ3XYEghVVhRKH8AGrNS9kHa4USgbUYxbgG3wHpF8Qzou34P5jqYC9x4UYE";

    const TEST_JSON: &[u8] = br#"{"some":"one","test":"two","structure":"three"}"#;
    const DIFFERENT_JSON: &[u8] = br#"{"some":"one","test":"two","structure":"banana"}"#;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_signing_input_layout() {
        assert_eq!(signing_input(b"{}", "n"), b"{}.n".to_vec());
        assert_eq!(signing_input(b"", ""), b".".to_vec());
    }

    #[test]
    fn test_known_signature() {
        let keypair = Keypair::from_seed(SEED);
        let proof = create_proof(TEST_JSON, CREATOR, &keypair, NONCE).unwrap();

        assert_eq!(proof.nonce(), NONCE);
        assert_eq!(proof.creator(), CREATOR);
        assert_eq!(proof.proof_type(), ED25519_SIGNATURE_TYPE);
        assert_eq!(proof.signature_value(), EXPECTED_SIGNATURE);

        verify_proof(&keypair.public_key(), &proof, TEST_JSON).unwrap();
    }

    #[test]
    fn test_different_document_fails() {
        let keypair = Keypair::from_seed(SEED);
        let proof = create_proof(TEST_JSON, CREATOR, &keypair, NONCE).unwrap();

        let err = verify_proof(&keypair.public_key(), &proof, DIFFERENT_JSON).unwrap_err();
        assert_eq!(err, VerificationError::SignatureMismatch);
        assert!(err.is_trust_failure());
    }

    #[test]
    fn test_created_timestamp_format() {
        let keypair = Keypair::from_seed(SEED);
        let proof = create_proof_at(TEST_JSON, CREATOR, &keypair, NONCE, fixed_time()).unwrap();
        assert_eq!(proof.created(), "2020-01-02T03:04:05Z");
        assert_eq!(proof.created_at().unwrap(), fixed_time());
        assert_eq!(proof.signature_value(), EXPECTED_SIGNATURE);
    }

    #[test]
    fn test_created_now_is_parseable() {
        let keypair = Keypair::generate();
        let before = Utc::now().timestamp();
        let proof = create_proof(b"{}", CREATOR, &keypair, "n").unwrap();
        let created = proof.created_at().unwrap().timestamp();
        assert!(created >= before - 1 && created <= Utc::now().timestamp());
        assert!(proof.created().ends_with('Z'));
    }

    #[test]
    fn test_wrong_nonce_fails() {
        let keypair = Keypair::from_seed(SEED);
        let mut proof = create_proof(TEST_JSON, CREATOR, &keypair, NONCE).unwrap();
        proof.nonce = "another-nonce".into();

        assert_eq!(
            verify_proof(&keypair.public_key(), &proof, TEST_JSON),
            Err(VerificationError::SignatureMismatch)
        );
    }

    #[test]
    fn test_wrong_key_fails() {
        let keypair = Keypair::from_seed(SEED);
        let other = Keypair::from_seed(&[7u8; 32]);
        let proof = create_proof(TEST_JSON, CREATOR, &keypair, NONCE).unwrap();

        assert_eq!(
            verify_proof(&other.public_key(), &proof, TEST_JSON),
            Err(VerificationError::SignatureMismatch)
        );
    }

    #[test]
    fn test_unsupported_type_checked_first() {
        let keypair = Keypair::from_seed(SEED);
        let mut proof = create_proof(TEST_JSON, CREATOR, &keypair, NONCE).unwrap();
        proof.proof_type = "RsaSignature2018".into();
        proof.signature_value = "not base58 0OIl".into();

        let err = verify_proof(&keypair.public_key(), &proof, TEST_JSON).unwrap_err();
        assert_eq!(
            err,
            VerificationError::UnsupportedProofType {
                expected: ED25519_SIGNATURE_TYPE.into(),
                found: "RsaSignature2018".into(),
            }
        );
        assert!(err.is_protocol_error());
    }

    #[test]
    fn test_malformed_signature_encoding() {
        let keypair = Keypair::from_seed(SEED);
        let mut proof = create_proof(TEST_JSON, CREATOR, &keypair, NONCE).unwrap();

        // Characters outside the alphabet
        proof.signature_value = "0OIl".into();
        assert!(matches!(
            verify_proof(&keypair.public_key(), &proof, TEST_JSON),
            Err(VerificationError::MalformedSignatureEncoding(_))
        ));

        // Valid base58, wrong length
        proof.signature_value = bs58::encode([9u8; 32]).into_string();
        assert!(matches!(
            verify_proof(&keypair.public_key(), &proof, TEST_JSON),
            Err(VerificationError::MalformedSignatureEncoding(_))
        ));
    }

    #[test]
    fn test_verify_is_repeatable() {
        let keypair = Keypair::from_seed(SEED);
        let proof = create_proof(TEST_JSON, CREATOR, &keypair, NONCE).unwrap();
        for _ in 0..3 {
            verify_proof(&keypair.public_key(), &proof, TEST_JSON).unwrap();
        }
    }

    #[test]
    fn test_nonce_generation() {
        let n1 = generate_nonce();
        let n2 = generate_nonce();
        assert_ne!(n1, n2);
        assert_eq!(n1.len(), 36);
        assert!(uuid::Uuid::parse_str(&n1).is_ok());
    }

    #[test]
    fn test_proof_wire_format() {
        let keypair = Keypair::from_seed(SEED);
        let proof = create_proof_at(TEST_JSON, CREATOR, &keypair, NONCE, fixed_time()).unwrap();
        let json = serde_json::to_value(&proof).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "created": "2020-01-02T03:04:05Z",
                "creator": CREATOR,
                "nonce": NONCE,
                "signatureValue": EXPECTED_SIGNATURE,
                "type": ED25519_SIGNATURE_TYPE,
            })
        );

        let back: Proof = serde_json::from_value(json).unwrap();
        assert_eq!(back, proof);
    }

    #[test]
    fn test_invalid_created_timestamp() {
        let keypair = Keypair::from_seed(SEED);
        let mut proof = create_proof(TEST_JSON, CREATOR, &keypair, NONCE).unwrap();
        proof.created = "yesterday".into();
        assert!(matches!(
            proof.created_at(),
            Err(CoreError::InvalidTimestamp(_))
        ));
    }
}
