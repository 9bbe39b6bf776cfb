// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decrypts a single [`SealedField`] into a typed plaintext value.

use std::sync::Arc;

use base64ct::{Base64, Encoding};
use chrono::{DateTime, TimeZone, Utc};

use crate::keys::{KeyStore, KeyStoreError};

use super::envelope::{PlaintextType, SealedField, SealingAlgorithm, SEALED_KEY_LEN};

/// Error raised while unsealing one field.
#[derive(Debug, thiserror::Error)]
pub enum UnsealingError {
    /// The decoded envelope is shorter than the sealed AES key block.
    #[error("sealed data too short: {len} bytes, envelope requires at least {min}")]
    SealedDataTooShort { len: usize, min: usize },

    /// The record carried an algorithm tag this client does not support.
    #[error("unsupported sealing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The sealed payload was not valid base64.
    #[error("sealed payload is not valid base64: {0}")]
    Encoding(String),

    /// The key store rejected a decrypt call. The original error is carried
    /// verbatim as the source.
    #[error("key store error while unsealing: {0}")]
    KeyStore(#[from] KeyStoreError),

    /// The decrypted plaintext could not be coerced to the declared type.
    #[error("sealed plaintext is not a valid {expected}: {message}")]
    InvalidPlaintext {
        expected: &'static str,
        message: String,
    },
}

/// A decrypted sealed value, coerced to its declared plaintext type.
#[derive(Debug, Clone, PartialEq)]
pub enum UnsealedValue {
    String(String),
    Number(f64),
    DateTime(DateTime<Utc>),
}

/// Decrypts sealed fields via an injected [`KeyStore`].
///
/// Stateless: every unseal is a pure function of the field and the key
/// store's current contents. Keys are looked up fresh per call, never cached
/// here.
#[derive(Clone)]
pub struct Unsealer {
    key_store: Arc<dyn KeyStore>,
}

impl Unsealer {
    pub fn new(key_store: Arc<dyn KeyStore>) -> Self {
        Self { key_store }
    }

    /// Open one sealed field: split the envelope, recover the AES key with
    /// the private key named by the field, decrypt the payload, and coerce
    /// to the declared plaintext type.
    pub fn unseal(&self, field: &SealedField) -> Result<UnsealedValue, UnsealingError> {
        let algorithm = SealingAlgorithm::parse(&field.algorithm)
            .ok_or_else(|| UnsealingError::UnsupportedAlgorithm(field.algorithm.clone()))?;

        let envelope = Base64::decode_vec(&field.ciphertext)
            .map_err(|e| UnsealingError::Encoding(e.to_string()))?;
        if envelope.len() < SEALED_KEY_LEN {
            return Err(UnsealingError::SealedDataTooShort {
                len: envelope.len(),
                min: SEALED_KEY_LEN,
            });
        }

        let (sealed_key, payload) = envelope.split_at(SEALED_KEY_LEN);
        let aes_key = self
            .key_store
            .decrypt_with_private_key(&field.key_id, sealed_key, algorithm)?;
        let plaintext = self
            .key_store
            .decrypt_with_symmetric_key(&aes_key, payload)?;

        coerce(field.plaintext_type, &plaintext)
    }

    /// Unseal a field declared as a string.
    pub fn unseal_string(&self, field: &SealedField) -> Result<String, UnsealingError> {
        match self.unseal(field)? {
            UnsealedValue::String(s) => Ok(s),
            other => Err(type_mismatch("string", &other)),
        }
    }

    /// Unseal a field declared as a number.
    pub fn unseal_number(&self, field: &SealedField) -> Result<f64, UnsealingError> {
        match self.unseal(field)? {
            UnsealedValue::Number(n) => Ok(n),
            other => Err(type_mismatch("number", &other)),
        }
    }

    /// Unseal a field declared as an epoch-millisecond timestamp.
    pub fn unseal_datetime(&self, field: &SealedField) -> Result<DateTime<Utc>, UnsealingError> {
        match self.unseal(field)? {
            UnsealedValue::DateTime(dt) => Ok(dt),
            other => Err(type_mismatch("timestamp", &other)),
        }
    }
}

impl std::fmt::Debug for Unsealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Unsealer(<key store>)")
    }
}

fn coerce(plaintext_type: PlaintextType, plaintext: &[u8]) -> Result<UnsealedValue, UnsealingError> {
    let text = String::from_utf8(plaintext.to_vec()).map_err(|e| UnsealingError::InvalidPlaintext {
        expected: "UTF-8 string",
        message: e.to_string(),
    })?;

    match plaintext_type {
        PlaintextType::String => Ok(UnsealedValue::String(text)),
        PlaintextType::Number => {
            let n: f64 = text.trim().parse().map_err(|e: std::num::ParseFloatError| {
                UnsealingError::InvalidPlaintext {
                    expected: "number",
                    message: e.to_string(),
                }
            })?;
            Ok(UnsealedValue::Number(n))
        }
        PlaintextType::DateTime => {
            let millis: i64 = text.trim().parse().map_err(|e: std::num::ParseIntError| {
                UnsealingError::InvalidPlaintext {
                    expected: "epoch-millisecond timestamp",
                    message: e.to_string(),
                }
            })?;
            let dt = Utc
                .timestamp_millis_opt(millis)
                .single()
                .ok_or(UnsealingError::InvalidPlaintext {
                    expected: "epoch-millisecond timestamp",
                    message: format!("{millis} is out of range"),
                })?;
            Ok(UnsealedValue::DateTime(dt))
        }
    }
}

fn type_mismatch(expected: &'static str, got: &UnsealedValue) -> UnsealingError {
    UnsealingError::InvalidPlaintext {
        expected,
        message: format!("unsealed to {got:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyStoreResult;

    /// Pass-through key store: the "sealed key" block decrypts to itself and
    /// symmetric decryption is the identity. Lets envelope handling be
    /// tested without real crypto.
    struct PassThroughKeyStore;

    impl KeyStore for PassThroughKeyStore {
        fn decrypt_with_private_key(
            &self,
            _key_id: &str,
            ciphertext: &[u8],
            _algorithm: SealingAlgorithm,
        ) -> KeyStoreResult<Vec<u8>> {
            Ok(ciphertext.to_vec())
        }

        fn decrypt_with_symmetric_key(
            &self,
            _key: &[u8],
            ciphertext: &[u8],
        ) -> KeyStoreResult<Vec<u8>> {
            Ok(ciphertext.to_vec())
        }

        fn current_public_key(&self) -> KeyStoreResult<Option<crate::keys::PublicKey>> {
            Ok(None)
        }
    }

    /// Key store whose private-key decrypt always reports a missing key.
    struct MissingKeyStore;

    impl KeyStore for MissingKeyStore {
        fn decrypt_with_private_key(
            &self,
            key_id: &str,
            _ciphertext: &[u8],
            _algorithm: SealingAlgorithm,
        ) -> KeyStoreResult<Vec<u8>> {
            Err(KeyStoreError::KeyNotFound {
                key_id: key_id.to_string(),
            })
        }

        fn decrypt_with_symmetric_key(
            &self,
            _key: &[u8],
            _ciphertext: &[u8],
        ) -> KeyStoreResult<Vec<u8>> {
            unreachable!("symmetric stage must not run when the key is missing")
        }

        fn current_public_key(&self) -> KeyStoreResult<Option<crate::keys::PublicKey>> {
            Ok(None)
        }
    }

    fn sealed(plaintext_type: PlaintextType, payload: &[u8]) -> SealedField {
        let mut envelope = vec![0u8; SEALED_KEY_LEN];
        envelope.extend_from_slice(payload);
        SealedField::new(
            "key-1",
            SealingAlgorithm::RsaOaepSha256AesGcm.wire_tag(),
            plaintext_type,
            Base64::encode_string(&envelope),
        )
    }

    fn unsealer() -> Unsealer {
        Unsealer::new(Arc::new(PassThroughKeyStore))
    }

    #[test]
    fn unseals_string_payload() {
        let field = sealed(PlaintextType::String, b"card holder");
        assert_eq!(unsealer().unseal_string(&field).unwrap(), "card holder");
    }

    #[test]
    fn unseals_number_payload() {
        let field = sealed(PlaintextType::Number, b"1299.5");
        let n = unsealer().unseal_number(&field).unwrap();
        assert!((n - 1299.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unseals_epoch_millisecond_timestamp() {
        let field = sealed(PlaintextType::DateTime, b"1700000000000");
        let dt = unsealer().unseal_datetime(&field).unwrap();
        assert_eq!(dt.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn too_short_envelope_is_rejected_before_any_decrypt() {
        let field = SealedField::new(
            "key-1",
            SealingAlgorithm::RsaOaepSha256AesGcm.wire_tag(),
            PlaintextType::String,
            Base64::encode_string(&[0u8; SEALED_KEY_LEN - 1]),
        );
        let err = Unsealer::new(Arc::new(MissingKeyStore))
            .unseal(&field)
            .unwrap_err();
        assert!(matches!(
            err,
            UnsealingError::SealedDataTooShort {
                len,
                min: SEALED_KEY_LEN
            } if len == SEALED_KEY_LEN - 1
        ));
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let mut field = sealed(PlaintextType::String, b"x");
        field.algorithm = "ROT13".to_string();
        let err = unsealer().unseal(&field).unwrap_err();
        assert!(matches!(err, UnsealingError::UnsupportedAlgorithm(tag) if tag == "ROT13"));
    }

    #[test]
    fn malformed_base64_is_rejected() {
        let mut field = sealed(PlaintextType::String, b"x");
        field.ciphertext = "not base64!!".to_string();
        assert!(matches!(
            unsealer().unseal(&field).unwrap_err(),
            UnsealingError::Encoding(_)
        ));
    }

    #[test]
    fn missing_key_propagates_as_key_store_error() {
        let field = sealed(PlaintextType::String, b"x");
        let err = Unsealer::new(Arc::new(MissingKeyStore))
            .unseal(&field)
            .unwrap_err();
        match err {
            UnsealingError::KeyStore(KeyStoreError::KeyNotFound { key_id }) => {
                assert_eq!(key_id, "key-1");
            }
            other => panic!("expected key-not-found, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_plaintext_fails_number_coercion() {
        let field = sealed(PlaintextType::Number, b"twelve");
        assert!(matches!(
            unsealer().unseal(&field).unwrap_err(),
            UnsealingError::InvalidPlaintext { expected: "number", .. }
        ));
    }

    #[test]
    fn non_numeric_plaintext_fails_timestamp_coercion() {
        let field = sealed(PlaintextType::DateTime, b"yesterday");
        assert!(matches!(
            unsealer().unseal(&field).unwrap_err(),
            UnsealingError::InvalidPlaintext { .. }
        ));
    }
}
