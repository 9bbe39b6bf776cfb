// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sealed-field wire format.
//!
//! ## Envelope Layout
//!
//! Sealed values use a hybrid envelope. The service generates a fresh
//! AES-256 key per value, encrypts the plaintext with it, and encrypts the
//! AES key with the client's RSA-2048 public key:
//!
//! ```text
//! [ RSA-encrypted AES key : SEALED_KEY_LEN bytes ][ AES-encrypted payload ]
//! ```
//!
//! The boundary is a fixed wire-format constant ([`SEALED_KEY_LEN`]), not
//! inferred from library behavior. The AES payload itself is prefixed with a
//! [`AES_NONCE_LEN`]-byte nonce; that prefix is a key-store concern, the
//! envelope split only cares about the RSA block.

/// Length in bytes of the RSA-encrypted AES key block (RSA-2048).
pub const SEALED_KEY_LEN: usize = 256;

/// Length in bytes of the nonce prefixed to the AES-GCM payload.
pub const AES_NONCE_LEN: usize = 12;

/// Sealing algorithm declared by the record's `algorithm` tag.
///
/// Closed enum; unrecognized wire tags fail parsing so that the unsealer can
/// surface an unsupported-algorithm error rather than guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SealingAlgorithm {
    /// Hybrid envelope: RSA-2048 OAEP (SHA-256) sealed AES key followed by
    /// an AES-256-GCM payload.
    RsaOaepSha256AesGcm,
}

impl SealingAlgorithm {
    /// Parse the wire `algorithm` tag. Returns `None` for unrecognized tags.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "RSA_2048_OAEP_SHA256/AES_256_GCM" => Some(Self::RsaOaepSha256AesGcm),
            _ => None,
        }
    }

    /// The wire tag for this algorithm.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            Self::RsaOaepSha256AesGcm => "RSA_2048_OAEP_SHA256/AES_256_GCM",
        }
    }
}

impl std::fmt::Display for SealingAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_tag())
    }
}

/// Declared plaintext type of a sealed value, driving coercion after
/// decryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaintextType {
    /// UTF-8 string, passed through.
    String,
    /// Decimal number rendered as a UTF-8 string.
    Number,
    /// Epoch-millisecond timestamp rendered as a UTF-8 decimal string.
    DateTime,
}

/// One ciphertext blob from an API record: base64 payload plus the key id
/// and algorithm tag needed to open it.
///
/// Immutable; created from the raw record and consumed once per unseal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedField {
    /// Id of the key pair that sealed this value.
    pub key_id: String,
    /// Raw algorithm tag from the record. Parsed at unseal time so that an
    /// unknown tag degrades one field, not deserialization of the page.
    pub algorithm: String,
    /// Declared plaintext type.
    pub plaintext_type: PlaintextType,
    /// Base64-encoded envelope.
    pub ciphertext: String,
}

impl SealedField {
    /// Build a sealed field from record-level metadata and one attribute's
    /// base64 payload.
    pub fn new(
        key_id: impl Into<String>,
        algorithm: impl Into<String>,
        plaintext_type: PlaintextType,
        ciphertext: impl Into<String>,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            algorithm: algorithm.into(),
            plaintext_type,
            ciphertext: ciphertext.into(),
        }
    }
}
