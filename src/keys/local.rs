// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory key store backed by RSA-2048 OAEP and AES-256-GCM.
//!
//! Implements the hybrid envelope described in [`crate::unsealing::envelope`]:
//! the sealed AES key occupies the leading RSA block, and the AES payload is
//! a 12-byte nonce followed by the GCM ciphertext. The `seal` helper exists
//! so that embedders and tests can produce envelopes this store can open;
//! production sealing is done server-side.

use std::collections::HashMap;
use std::sync::RwLock;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use rsa::pkcs8::EncodePublicKey;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use uuid::Uuid;

use crate::unsealing::{SealingAlgorithm, AES_NONCE_LEN};

use super::{KeyStore, KeyStoreError, KeyStoreResult, PublicKey};

const RSA_BITS: usize = 2048;
const AES_KEY_LEN: usize = 32;

struct Inner {
    keys: HashMap<String, RsaPrivateKey>,
    current_key_id: Option<String>,
}

/// In-memory [`KeyStore`] over RustCrypto primitives.
///
/// Thread-safe; all state lives behind one `RwLock`. Keys never leave the
/// store and are not serializable.
pub struct LocalKeyStore {
    key_ring_id: String,
    inner: RwLock<Inner>,
}

impl LocalKeyStore {
    /// Create an empty key store with a fresh key ring id.
    pub fn new() -> Self {
        Self {
            key_ring_id: Uuid::new_v4().to_string(),
            inner: RwLock::new(Inner {
                keys: HashMap::new(),
                current_key_id: None,
            }),
        }
    }

    /// Identifier of the key ring all keys in this store belong to.
    pub fn key_ring_id(&self) -> &str {
        &self.key_ring_id
    }

    /// Generate an RSA-2048 key pair, register it under `key_id`, and make
    /// it the current key. Returns the public half.
    pub fn generate_key_pair(&self, key_id: &str) -> KeyStoreResult<PublicKey> {
        let mut rng = rand::rngs::OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, RSA_BITS)
            .map_err(|e| KeyStoreError::InvalidKey(e.to_string()))?;
        let public = self.export_public(key_id, &private_key)?;

        let mut inner = self.inner.write().expect("key store lock poisoned");
        inner.keys.insert(key_id.to_string(), private_key);
        inner.current_key_id = Some(key_id.to_string());
        Ok(public)
    }

    /// Seal `plaintext` for the key pair registered under `key_id`,
    /// producing the hybrid envelope this store can unseal.
    pub fn seal(&self, key_id: &str, plaintext: &[u8]) -> KeyStoreResult<Vec<u8>> {
        let inner = self.inner.read().expect("key store lock poisoned");
        let private_key = inner.keys.get(key_id).ok_or_else(|| KeyStoreError::KeyNotFound {
            key_id: key_id.to_string(),
        })?;
        let public_key = RsaPublicKey::from(private_key);

        let mut rng = rand::rngs::OsRng;
        let mut aes_key = [0u8; AES_KEY_LEN];
        rng.fill_bytes(&mut aes_key);
        let mut nonce = [0u8; AES_NONCE_LEN];
        rng.fill_bytes(&mut nonce);

        let cipher = Aes256Gcm::new_from_slice(&aes_key)
            .map_err(|e| KeyStoreError::InvalidKey(e.to_string()))?;
        let sealed_payload = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| KeyStoreError::Encryption(e.to_string()))?;

        let sealed_key = public_key
            .encrypt(&mut rng, Oaep::new::<Sha256>(), &aes_key)
            .map_err(|e| KeyStoreError::Encryption(e.to_string()))?;

        let mut envelope = sealed_key;
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&sealed_payload);
        Ok(envelope)
    }

    fn export_public(&self, key_id: &str, private_key: &RsaPrivateKey) -> KeyStoreResult<PublicKey> {
        let der = RsaPublicKey::from(private_key)
            .to_public_key_der()
            .map_err(|e| KeyStoreError::InvalidKey(e.to_string()))?;
        Ok(PublicKey {
            key_id: key_id.to_string(),
            key_ring_id: self.key_ring_id.clone(),
            public_key: der.as_bytes().to_vec(),
        })
    }
}

impl Default for LocalKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyStore for LocalKeyStore {
    fn decrypt_with_private_key(
        &self,
        key_id: &str,
        ciphertext: &[u8],
        algorithm: SealingAlgorithm,
    ) -> KeyStoreResult<Vec<u8>> {
        // Single supported algorithm today; matching keeps the contract
        // explicit when more are added.
        match algorithm {
            SealingAlgorithm::RsaOaepSha256AesGcm => {}
        }

        let inner = self.inner.read().expect("key store lock poisoned");
        let private_key = inner.keys.get(key_id).ok_or_else(|| KeyStoreError::KeyNotFound {
            key_id: key_id.to_string(),
        })?;
        private_key
            .decrypt(Oaep::new::<Sha256>(), ciphertext)
            .map_err(|e| KeyStoreError::Decryption(e.to_string()))
    }

    fn decrypt_with_symmetric_key(&self, key: &[u8], ciphertext: &[u8]) -> KeyStoreResult<Vec<u8>> {
        if ciphertext.len() < AES_NONCE_LEN {
            return Err(KeyStoreError::Decryption(format!(
                "payload too short for nonce: {} bytes",
                ciphertext.len()
            )));
        }
        let (nonce, sealed) = ciphertext.split_at(AES_NONCE_LEN);
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| KeyStoreError::InvalidKey(e.to_string()))?;
        cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|e| KeyStoreError::Decryption(e.to_string()))
    }

    fn current_public_key(&self) -> KeyStoreResult<Option<PublicKey>> {
        let inner = self.inner.read().expect("key store lock poisoned");
        let Some(key_id) = inner.current_key_id.clone() else {
            return Ok(None);
        };
        let private_key = inner.keys.get(&key_id).ok_or_else(|| KeyStoreError::KeyNotFound {
            key_id: key_id.clone(),
        })?;
        self.export_public(&key_id, private_key).map(Some)
    }
}

impl std::fmt::Debug for LocalKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocalKeyStore(key_ring_id={})", self.key_ring_id)
    }
}
