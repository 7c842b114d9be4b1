//! Decentralized identifiers and fully qualified key references.

use std::fmt;
use std::str::FromStr;

use didproof_core::Ed25519PublicKey;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Method prefix of every identifier issued here.
pub const DID_METHOD_PREFIX: &str = "did:work:";

/// Number of leading public-key bytes embedded in the identifier.
pub const DID_KEY_BYTES: usize = 16;

/// Fragment assigned to the first key of a document.
pub const INITIAL_KEY: &str = "key-1";

/// A decentralized identifier derived from an Ed25519 public key.
///
/// Format: `did:work:<base58(first 16 bytes of public key)>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did(String);

impl Did {
    /// Derive the identifier for a public key.
    pub fn from_public_key(public_key: &Ed25519PublicKey) -> Self {
        let encoded = bs58::encode(&public_key.as_bytes()[..DID_KEY_BYTES]).into_string();
        Self(format!("{DID_METHOD_PREFIX}{encoded}"))
    }

    /// Return the full DID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this identifier was derived from `public_key`.
    pub fn matches_key(&self, public_key: &Ed25519PublicKey) -> bool {
        *self == Self::from_public_key(public_key)
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Did {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoded = s
            .strip_prefix(DID_METHOD_PREFIX)
            .ok_or_else(|| Error::InvalidDid(format!("must start with '{DID_METHOD_PREFIX}'")))?;

        if encoded.is_empty() {
            return Err(Error::InvalidDid("missing key portion".into()));
        }

        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| Error::InvalidDid(e.to_string()))?;
        if bytes.len() != DID_KEY_BYTES {
            return Err(Error::InvalidDid(format!(
                "key portion must decode to {DID_KEY_BYTES} bytes, got {}",
                bytes.len()
            )));
        }

        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Did {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.0
    }
}

/// A fully qualified key reference: `<did>#<fragment>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyReference {
    did: String,
    fragment: String,
}

impl KeyReference {
    /// Reference `fragment` within `did`.
    pub fn new(did: &Did, fragment: impl Into<String>) -> Self {
        Self {
            did: did.to_string(),
            fragment: fragment.into(),
        }
    }

    /// Reference to the initial key (`key-1`) of `did`.
    pub fn initial(did: &Did) -> Self {
        Self::new(did, INITIAL_KEY)
    }

    /// The owning identifier.
    pub fn did(&self) -> &str {
        &self.did
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

impl fmt::Display for KeyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.did, self.fragment)
    }
}

impl FromStr for KeyReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('#') {
            Some((did, fragment)) if !did.is_empty() && !fragment.is_empty() => Ok(Self {
                did: did.to_string(),
                fragment: fragment.to_string(),
            }),
            _ => Err(Error::InvalidKeyReference(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use didproof_core::Keypair;

    const SEED: &[u8; 32] = b"12345678901234567890123456789012";

    #[test]
    fn test_known_did() {
        let keypair = Keypair::from_seed(SEED);
        let did = Did::from_public_key(&keypair.public_key());
        assert_eq!(did.as_str(), "did:work:6sYe1y3zXhmyrBkgHgAgaq");
        assert!(did.matches_key(&keypair.public_key()));
    }

    #[test]
    fn test_did_is_stable() {
        let pk = Keypair::generate().public_key();
        assert_eq!(Did::from_public_key(&pk), Did::from_public_key(&pk));
    }

    #[test]
    fn test_did_roundtrip() {
        let did = Did::from_public_key(&Keypair::generate().public_key());
        let parsed: Did = did.as_str().parse().unwrap();
        assert_eq!(parsed, did);
    }

    #[test]
    fn test_did_parse_errors() {
        assert!(matches!("did:other:abc".parse::<Did>(), Err(Error::InvalidDid(_))));
        assert!(matches!("did:work:".parse::<Did>(), Err(Error::InvalidDid(_))));
        assert!(matches!("did:work:0OIl".parse::<Did>(), Err(Error::InvalidDid(_))));
        // Full 32-byte key is too long for this method
        let long = format!("did:work:{}", bs58::encode([1u8; 32]).into_string());
        assert!(matches!(long.parse::<Did>(), Err(Error::InvalidDid(_))));
    }

    #[test]
    fn test_did_serde() {
        let did = Did::from_public_key(&Keypair::from_seed(SEED).public_key());
        let json = serde_json::to_string(&did).unwrap();
        assert_eq!(json, "\"did:work:6sYe1y3zXhmyrBkgHgAgaq\"");
        let back: Did = serde_json::from_str(&json).unwrap();
        assert_eq!(back, did);

        assert!(serde_json::from_str::<Did>("\"did:web:example.com\"").is_err());
    }

    #[test]
    fn test_key_reference() {
        let did: Did = "did:work:6sYe1y3zXhmyrBkgHgAgaq".parse().unwrap();
        let key_ref = KeyReference::initial(&did);
        assert_eq!(key_ref.to_string(), "did:work:6sYe1y3zXhmyrBkgHgAgaq#key-1");

        let parsed: KeyReference = key_ref.to_string().parse().unwrap();
        assert_eq!(parsed, key_ref);
        assert_eq!(parsed.did(), did.as_str());
        assert_eq!(parsed.fragment(), INITIAL_KEY);
    }

    #[test]
    fn test_key_reference_errors() {
        for bad in ["no-fragment", "#key-1", "did:work:abc#", ""] {
            assert!(
                matches!(bad.parse::<KeyReference>(), Err(Error::InvalidKeyReference(_))),
                "{bad} should not parse"
            );
        }
    }
}
