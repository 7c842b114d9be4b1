//! Cryptographic primitives for didproof.
//!
//! Wraps Ed25519 signing with strong types. Keys and signatures travel on the
//! wire as base58 (Bitcoin alphabet, no checksum).

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{CoreError, ProofError};

/// Length of a raw Ed25519 public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Length of a raw Ed25519 signature.
pub const SIGNATURE_LENGTH: usize = 64;

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Encode as base58.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    /// Parse from base58.
    pub fn from_base58(s: &str) -> Result<Self, CoreError> {
        let bytes = bs58::decode(s).into_vec()?;
        Self::try_from(bytes.as_slice())
    }

    /// Verify a signature over a message.
    ///
    /// A key that is not a valid curve point verifies nothing.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        let verifying_key = match VerifyingKey::from_bytes(&self.0) {
            Ok(vk) => vk,
            Err(_) => return false,
        };

        let sig = Signature::from_bytes(&signature.0);

        verifying_key.verify(message, &sig).is_ok()
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl AsRef<[u8]> for Ed25519PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Ed25519PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Ed25519PublicKey {
    type Error = CoreError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 32] = slice.try_into().map_err(|_| CoreError::InvalidKeyLength {
            expected: PUBLIC_KEY_LENGTH,
            actual: slice.len(),
        })?;
        Ok(Self(arr))
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

impl Ed25519Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Encode as base58.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    /// Parse from base58. Fails on bad characters or a decoded length other
    /// than 64 bytes.
    pub fn from_base58(s: &str) -> Result<Self, CoreError> {
        let bytes = bs58::decode(s).into_vec()?;
        let arr: [u8; 64] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CoreError::InvalidKeyLength {
                expected: SIGNATURE_LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Sig({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Ed25519Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 64]> for Ed25519Signature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }
}

/// A keypair for signing documents.
///
/// This wraps ed25519-dalek's SigningKey. It does not implement `Serialize`
/// and its `Debug` output shows only the public half.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Create from 64 bytes of `seed || public key`.
    ///
    /// Fails if the public half does not belong to the seed.
    pub fn from_keypair_bytes(bytes: &[u8; 64]) -> Result<Self, CoreError> {
        let signing_key = SigningKey::from_keypair_bytes(bytes)
            .map_err(|e| CoreError::InvalidKeyMaterial(e.to_string()))?;
        Ok(Self { signing_key })
    }

    /// Create from a byte slice holding either a 32-byte seed or 64 bytes of
    /// `seed || public key`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        if let Ok(seed) = <&[u8; 32]>::try_from(bytes) {
            return Ok(Self::from_seed(seed));
        }
        if let Ok(full) = <&[u8; 64]>::try_from(bytes) {
            return Self::from_keypair_bytes(full);
        }
        Err(CoreError::InvalidKeyLength {
            expected: 32,
            actual: bytes.len(),
        })
    }

    /// Get the public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Result<Ed25519Signature, ProofError> {
        let sig = self
            .signing_key
            .try_sign(message)
            .map_err(|e| ProofError::SigningFailure(e.to_string()))?;
        Ok(Ed25519Signature(sig.to_bytes()))
    }

    /// Get the raw seed bytes (secret key material).
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key())
    }
}
