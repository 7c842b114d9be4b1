//! DID documents: the unsigned record, its descriptors, and the signed
//! composition of record + detached proof.

use std::io::Read;

use didproof_core::{
    canonicalize, CanonicalBytes, CanonicalError, Ed25519PublicKey, Proof, StructuredValue,
    ED25519_VERIFICATION_KEY_TYPE,
};
use serde::{Deserialize, Serialize};

use crate::did::{Did, KeyReference};
use crate::error::Result;

/// A public key listed in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyDescriptor {
    /// Fully qualified reference (`<did>#<fragment>`).
    pub id: String,

    /// Verification-method tag.
    #[serde(rename = "type")]
    pub key_type: String,

    /// Controlling party. Omitted on the wire when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub controller: String,

    /// Base58 of the raw public key bytes.
    pub public_key_base58: String,
}

impl KeyDescriptor {
    /// Describe an Ed25519 key.
    pub fn ed25519(
        key_ref: &KeyReference,
        controller: impl Into<String>,
        public_key: &Ed25519PublicKey,
    ) -> Self {
        Self {
            id: key_ref.to_string(),
            key_type: ED25519_VERIFICATION_KEY_TYPE.to_string(),
            controller: controller.into(),
            public_key_base58: public_key.to_base58(),
        }
    }

    /// Decode the listed public key.
    pub fn decode_public_key(&self) -> Result<Ed25519PublicKey> {
        Ok(Ed25519PublicKey::from_base58(&self.public_key_base58)?)
    }
}

/// A service endpoint. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub service_endpoint: String,
}

impl ServiceDescriptor {
    pub fn new(
        id: impl Into<String>,
        service_type: impl Into<String>,
        service_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            service_type: service_type.into(),
            service_endpoint: service_endpoint.into(),
        }
    }
}

/// A document before a proof is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedDocument {
    /// Globally unique identifier.
    pub id: String,

    /// Keys controlled by the subject.
    pub public_key: Vec<KeyDescriptor>,

    /// Key references usable for authentication. Absent is `null` on the
    /// wire and in the signed bytes; a missing field reads as absent.
    #[serde(default)]
    pub authentication: Option<Vec<String>>,

    /// Service endpoints.
    pub service: Vec<ServiceDescriptor>,
}

impl UnsignedDocument {
    /// The document as a structured value.
    pub fn to_structured(&self) -> std::result::Result<StructuredValue, CanonicalError> {
        StructuredValue::from_serializable(self)
    }

    /// Canonical bytes: the exact input to signing and verification.
    pub fn canonical_bytes(&self) -> std::result::Result<CanonicalBytes, CanonicalError> {
        canonicalize(&self.to_structured()?)
    }

    /// Parse `id` as a DID of this method.
    pub fn did(&self) -> Result<Did> {
        self.id.parse()
    }

    /// Find a listed key by its fully qualified reference.
    pub fn find_key(&self, key_id: &str) -> Option<&KeyDescriptor> {
        self.public_key.iter().find(|k| k.id == key_id)
    }
}

/// An unsigned document with its detached proof.
///
/// On the wire the document fields and `proof` sit side by side in one
/// object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedDocument {
    #[serde(flatten)]
    pub document: UnsignedDocument,
    pub proof: Proof,
}

impl SignedDocument {
    /// Compose a document and its proof.
    pub fn new(document: UnsignedDocument, proof: Proof) -> Self {
        Self { document, proof }
    }

    /// The unsigned portion the proof covers.
    pub fn unsigned(&self) -> &UnsignedDocument {
        &self.document
    }

    pub fn proof(&self) -> &Proof {
        &self.proof
    }

    /// Split into document and proof.
    pub fn into_parts(self) -> (UnsignedDocument, Proof) {
        (self.document, self.proof)
    }

    /// Compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON, for humans.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON. Field order is not significant.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse from a reader, e.g. a stored document file.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Builder for unsigned documents.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    id: String,
    public_key: Vec<KeyDescriptor>,
    authentication: Option<Vec<String>>,
    service: Vec<ServiceDescriptor>,
}

impl DocumentBuilder {
    /// Start a document for `did`.
    pub fn new(did: &Did) -> Self {
        Self {
            id: did.to_string(),
            public_key: Vec::new(),
            authentication: None,
            service: Vec::new(),
        }
    }

    /// List a key.
    pub fn public_key(mut self, key: KeyDescriptor) -> Self {
        self.public_key.push(key);
        self
    }

    /// List an Ed25519 key under `key_ref`.
    pub fn ed25519_key(
        self,
        key_ref: &KeyReference,
        controller: impl Into<String>,
        public_key: &Ed25519PublicKey,
    ) -> Self {
        self.public_key(KeyDescriptor::ed25519(key_ref, controller, public_key))
    }

    /// Add an authentication key reference.
    pub fn authentication(mut self, key_ref: &KeyReference) -> Self {
        self.authentication
            .get_or_insert_with(Vec::new)
            .push(key_ref.to_string());
        self
    }

    /// Add a service endpoint.
    pub fn service(mut self, service: ServiceDescriptor) -> Self {
        self.service.push(service);
        self
    }

    pub fn build(self) -> UnsignedDocument {
        UnsignedDocument {
            id: self.id,
            public_key: self.public_key,
            authentication: self.authentication,
            service: self.service,
        }
    }
}
