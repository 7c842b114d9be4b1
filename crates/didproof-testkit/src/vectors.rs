//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical encoding and the signatures over it, so
//! that any implementation of the protocol produces identical bytes.

use didproof_core::{canonicalize, create_proof, verify_proof, Keypair, StructuredValue};

use crate::fixtures::{TestIssuer, REFERENCE_NONCE, REFERENCE_SEED};

/// A canonicalization vector: input JSON and its expected canonical form.
#[derive(Debug, Clone)]
pub struct CanonicalVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Input, as JSON text. Field order is significant only in the input.
    pub input: &'static str,
    /// Expected canonical text.
    pub expected: &'static str,
}

/// A signature vector: a signer, the signed bytes, and the expected proof.
#[derive(Debug, Clone)]
pub struct SignatureVector {
    pub name: &'static str,
    /// Seed for deterministic key generation.
    pub seed: [u8; 32],
    /// Document bytes, signed as-is.
    pub document: &'static str,
    pub nonce: &'static str,
    /// Expected public key (base58).
    pub expected_public_key: &'static str,
    /// Expected `signatureValue` (base58).
    pub expected_signature: &'static str,
}

/// Canonical form of the reference issuer's sample document.
pub const REFERENCE_DOCUMENT: &str = concat!(
    r#"{"authentication":null,"id":"did:work:6sYe1y3zXhmyrBkgHgAgaq","#,
    r#""publicKey":[{"controller":"fooIssuer","id":"did:work:6sYe1y3zXhmyrBkgHgAgaq#key-1","#,
    r#""publicKeyBase58":"4CcKDtU1JNGi8U4D8Rv9CHzfmF7xzaxEAPFA54eQjRHF","#,
    r#""type":"WorkdayEd25519VerificationKey2020"}],"#,
    r#""service":[{"id":"schemaID","serviceEndpoint":"schemaID","type":"schema"}]}"#
);

/// Get all canonicalization vectors.
pub fn canonical_vectors() -> Vec<CanonicalVector> {
    vec![
        CanonicalVector {
            name: "keys sorted",
            input: r#"{"B":"Value2","A":"Value1"}"#,
            expected: r#"{"A":"Value1","B":"Value2"}"#,
        },
        CanonicalVector {
            name: "list order preserved",
            input: r#"{"A":"Value1","B":["a","z","b"]}"#,
            expected: r#"{"A":"Value1","B":["a","z","b"]}"#,
        },
        CanonicalVector {
            name: "records inside lists sorted",
            input: r#"{"L":[{"D":"2","C":"1"},{"D":"6","C":"5"}]}"#,
            expected: r#"{"L":[{"C":"1","D":"2"},{"C":"5","D":"6"}]}"#,
        },
        CanonicalVector {
            name: "nested records sorted",
            input: r#"{"z":{"y":1,"x":{"b":true,"a":null}},"a":[]}"#,
            expected: r#"{"a":[],"z":{"x":{"a":null,"b":true},"y":1}}"#,
        },
        CanonicalVector {
            name: "byte-wise key order",
            input: r#"{"b":1,"B":2,"a":3,"_":4,"1":5}"#,
            expected: r#"{"1":5,"B":2,"_":4,"a":3,"b":1}"#,
        },
        CanonicalVector {
            name: "whitespace removed",
            input: "{ \"a\" : [ 1 , 2 ] ,\n  \"b\" : \"x y\" }",
            expected: r#"{"a":[1,2],"b":"x y"}"#,
        },
        CanonicalVector {
            name: "empty record",
            input: "{}",
            expected: "{}",
        },
    ]
}

/// Get all signature vectors.
pub fn signature_vectors() -> Vec<SignatureVector> {
    vec![
        SignatureVector {
            name: "raw JSON with reference key",
            seed: REFERENCE_SEED,
            document: r#"{"some":"one","test":"two","structure":"three"}"#,
            nonce: REFERENCE_NONCE,
            expected_public_key: "4CcKDtU1JNGi8U4D8Rv9CHzfmF7xzaxEAPFA54eQjRHF",
            expected_signature: "2NQNA7SXVrTJRPYGAtpdxXAaKZDdzzQ3XYEghVVhRKH8AGrNS9kHa4USgbUYxbgG3wHpF8Qzou34P5jqYC9x4UYE",
        },
        SignatureVector {
            name: "canonical JSON with reference key",
            seed: REFERENCE_SEED,
            document: r#"{"some":"one","structure":"three","test":"two"}"#,
            nonce: REFERENCE_NONCE,
            expected_public_key: "4CcKDtU1JNGi8U4D8Rv9CHzfmF7xzaxEAPFA54eQjRHF",
            expected_signature: "PkS9UGSkqivn7JcttyzTe6bWC3MzAC7SKi5z67Bo4cED7VK3CTiJ2j78zJZ4GsgezfLvLAM7XVDwaLw2im9AJLh",
        },
        SignatureVector {
            name: "reference document",
            seed: REFERENCE_SEED,
            document: REFERENCE_DOCUMENT,
            nonce: REFERENCE_NONCE,
            expected_public_key: "4CcKDtU1JNGi8U4D8Rv9CHzfmF7xzaxEAPFA54eQjRHF",
            expected_signature: "2WgpcjN66FGXjBMajSQCYsB1b5jSCjUyUDpsR13foWVsrCBa2pBE26HMdn7jn7yHFbq6Fvtk73DcnEMubvi7SCdg",
        },
        SignatureVector {
            name: "empty record, empty nonce",
            seed: [0x42; 32],
            document: "{}",
            nonce: "",
            expected_public_key: "3F5qRPtKg8GhGNnbd3qCj6nVJxWsGxq7pvH84okYLAqf",
            expected_signature: "2enGzrznUTHoz84Zhtw7khnHHVnZRJkJ6huFiPxp7uQ8Apu2gdecTkUphdYmb5zEWjQ1aMDzd65odi3DNWiQFv3S",
        },
    ]
}

/// Canonicalize a vector's input.
pub fn canonicalize_vector(vector: &CanonicalVector) -> Result<String, String> {
    let value: StructuredValue = serde_json::from_str(vector.input).map_err(|e| e.to_string())?;
    let bytes = canonicalize(&value).map_err(|e| e.to_string())?;
    Ok(bytes.as_str().to_string())
}

/// Verify every vector, returning a description of each failure.
pub fn verify_all_vectors() -> Vec<String> {
    let mut failures = Vec::new();

    for vector in canonical_vectors() {
        match canonicalize_vector(&vector) {
            Ok(actual) if actual == vector.expected => {}
            Ok(actual) => failures.push(format!(
                "{}: expected {}, got {}",
                vector.name, vector.expected, actual
            )),
            Err(e) => failures.push(format!("{}: {}", vector.name, e)),
        }
    }

    for vector in signature_vectors() {
        let keypair = Keypair::from_seed(&vector.seed);
        let public_key = keypair.public_key();
        if public_key.to_base58() != vector.expected_public_key {
            failures.push(format!("{}: public key {}", vector.name, public_key));
            continue;
        }

        let creator = TestIssuer::with_seed(vector.seed).key_ref.to_string();
        let proof = match create_proof(vector.document.as_bytes(), &creator, &keypair, vector.nonce)
        {
            Ok(proof) => proof,
            Err(e) => {
                failures.push(format!("{}: {}", vector.name, e));
                continue;
            }
        };

        if proof.signature_value() != vector.expected_signature {
            failures.push(format!(
                "{}: signature {}",
                vector.name,
                proof.signature_value()
            ));
        }
        if let Err(e) = verify_proof(&public_key, &proof, vector.document.as_bytes()) {
            failures.push(format!("{}: {}", vector.name, e));
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_pass() {
        let failures = verify_all_vectors();
        assert!(failures.is_empty(), "vector failures: {:#?}", failures);
    }

    #[test]
    fn test_reference_document_matches_fixture() {
        let issuer = TestIssuer::reference();
        let bytes = issuer.make_document("fooIssuer").canonical_bytes().unwrap();
        assert_eq!(bytes.as_str(), REFERENCE_DOCUMENT);
    }

    #[test]
    fn test_reference_document_signature_through_signer() {
        let issuer = TestIssuer::reference();
        let signed = issuer.make_signed("fooIssuer", REFERENCE_NONCE);

        let expected = signature_vectors()
            .into_iter()
            .find(|v| v.name == "reference document")
            .unwrap();
        assert_eq!(signed.proof().signature_value(), expected.expected_signature);
    }

    #[test]
    fn test_canonical_vectors_are_fixed_points() {
        for vector in canonical_vectors() {
            let again = canonicalize_vector(&CanonicalVector {
                input: vector.expected,
                ..vector.clone()
            })
            .unwrap();
            assert_eq!(again, vector.expected, "{}", vector.name);
        }
    }
}
