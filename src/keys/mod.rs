// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key store collaborator boundary.
//!
//! The SDK never implements asymmetric/symmetric primitives itself; it
//! delegates to a [`KeyStore`] implementation. On device builds this is
//! backed by the platform keychain; [`LocalKeyStore`] is an in-memory
//! implementation suitable for desktop embedding and tests.

mod local;

pub use local::LocalKeyStore;

use crate::unsealing::SealingAlgorithm;

/// Error type for key store operations.
#[derive(Debug, thiserror::Error)]
pub enum KeyStoreError {
    /// No private key is registered under the requested key id.
    #[error("key not found: {key_id}")]
    KeyNotFound { key_id: String },

    /// A decrypt primitive rejected its input (wrong key, corrupt
    /// ciphertext, bad padding).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// An encrypt primitive failed while producing an envelope.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Key material could not be loaded or parsed.
    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

/// Result type for key store operations.
pub type KeyStoreResult<T> = Result<T, KeyStoreError>;

/// A public key registered on the service, identifying the key ring used to
/// seal response data for this client.
///
/// The key store owns the underlying key pair; the unsealing core only ever
/// references keys by id and looks them up fresh per operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    /// Identifier of the key pair within the key ring.
    pub key_id: String,
    /// Identifier of the key ring this key belongs to.
    pub key_ring_id: String,
    /// DER-encoded public key bytes.
    pub public_key: Vec<u8>,
}

/// Cryptographic service consumed by the unsealing core.
///
/// Implementations must be thread-safe read services: the core issues only
/// read-only decrypt calls and holds no key material of its own.
pub trait KeyStore: Send + Sync {
    /// Decrypt `ciphertext` with the private key registered under `key_id`.
    ///
    /// Used for the first stage of the hybrid envelope (the sealed AES key).
    fn decrypt_with_private_key(
        &self,
        key_id: &str,
        ciphertext: &[u8],
        algorithm: SealingAlgorithm,
    ) -> KeyStoreResult<Vec<u8>>;

    /// Decrypt `ciphertext` with the raw symmetric `key` recovered from the
    /// envelope's first stage.
    fn decrypt_with_symmetric_key(&self, key: &[u8], ciphertext: &[u8]) -> KeyStoreResult<Vec<u8>>;

    /// The currently enrolled public key, or `None` when the client has not
    /// registered a key pair yet.
    fn current_public_key(&self) -> KeyStoreResult<Option<PublicKey>>;
}
