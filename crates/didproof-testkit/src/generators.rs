//! Proptest generators for property-based testing.

use proptest::prelude::*;

use didproof::{
    Did, DocumentBuilder, KeyReference, Keypair, ServiceDescriptor, StructuredValue,
    UnsignedDocument,
};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a record key.
pub fn key() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,12}".prop_map(String::from)
}

/// Generate a nonce.
pub fn nonce() -> impl Strategy<Value = String> {
    "[a-z0-9-]{0,40}".prop_map(String::from)
}

/// Generate a scalar value.
pub fn scalar() -> impl Strategy<Value = StructuredValue> {
    prop_oneof![
        any::<String>().prop_map(StructuredValue::from),
        any::<i64>().prop_map(StructuredValue::from),
        any::<u64>().prop_map(StructuredValue::from),
        (-1.0e12f64..1.0e12f64).prop_filter_map("finite", StructuredValue::from_f64),
        any::<bool>().prop_map(StructuredValue::from),
        Just(StructuredValue::Null),
    ]
}

/// Generate a finite float across the full `f64` range.
pub fn float() -> impl Strategy<Value = StructuredValue> {
    any::<f64>().prop_filter_map("finite", StructuredValue::from_f64)
}

/// Generate an arbitrary nested value.
pub fn structured_value() -> impl Strategy<Value = StructuredValue> {
    scalar().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(StructuredValue::List),
            prop::collection::btree_map(key(), inner, 0..6)
                .prop_map(|m| StructuredValue::Record(m.into_iter().collect())),
        ]
    })
}

/// Generate the entries of a record (unique keys, sorted order).
pub fn record_entries() -> impl Strategy<Value = Vec<(String, StructuredValue)>> {
    prop::collection::btree_map(key(), structured_value(), 0..8)
        .prop_map(|m| m.into_iter().collect::<Vec<_>>())
}

/// Generate a record value.
pub fn record() -> impl Strategy<Value = StructuredValue> {
    record_entries().prop_map(StructuredValue::record)
}

/// Generate the same record twice, with entries inserted in two different
/// orders.
pub fn shuffled_record_pair() -> impl Strategy<Value = (StructuredValue, StructuredValue)> {
    record_entries().prop_flat_map(|entries| {
        let original = StructuredValue::record(entries.clone());
        Just(entries)
            .prop_shuffle()
            .prop_map(move |shuffled| (original.clone(), StructuredValue::record(shuffled)))
    })
}

/// Generate an unsigned document for a random issuer, with its keypair.
pub fn signed_document_inputs() -> impl Strategy<Value = (Keypair, UnsignedDocument)> {
    (
        keypair(),
        "[A-Za-z ]{0,16}",
        prop::collection::vec(("[a-z]{1,8}", "[a-z]{1,8}", "https://[a-z]{1,12}\\.example"), 0..4),
        any::<bool>(),
    )
        .prop_map(|(keypair, controller, services, with_auth)| {
            let did = Did::from_public_key(&keypair.public_key());
            let key_ref = KeyReference::initial(&did);

            let mut builder =
                DocumentBuilder::new(&did).ed25519_key(&key_ref, controller, &keypair.public_key());
            for (id, kind, endpoint) in services {
                builder = builder.service(ServiceDescriptor::new(id, kind, endpoint));
            }
            if with_auth {
                builder = builder.authentication(&key_ref);
            }

            (keypair, builder.build())
        })
}
