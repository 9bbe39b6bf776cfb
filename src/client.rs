// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client facade wiring the gateway and key store collaborators.

use std::sync::Arc;

use crate::graphql::{GraphQlGateway, HttpGateway};
use crate::keys::KeyStore;
use crate::unsealing::Unsealer;

/// Entry point to the virtual cards SDK.
///
/// Collaborators are injected explicitly; any [`GraphQlGateway`] and
/// [`KeyStore`] implementation will do. The client is cheap to clone and
/// holds no mutable state of its own.
#[derive(Clone)]
pub struct VirtualCardsClient {
    pub(crate) gateway: Arc<dyn GraphQlGateway>,
    pub(crate) key_store: Arc<dyn KeyStore>,
    pub(crate) unsealer: Unsealer,
}

impl VirtualCardsClient {
    /// Build a client over explicit collaborators.
    pub fn new(gateway: Arc<dyn GraphQlGateway>, key_store: Arc<dyn KeyStore>) -> Self {
        let unsealer = Unsealer::new(key_store.clone());
        Self {
            gateway,
            key_store,
            unsealer,
        }
    }

    /// Build a client with an [`HttpGateway`] configured from the
    /// environment.
    pub fn from_env(key_store: Arc<dyn KeyStore>) -> Result<Self, crate::graphql::GatewayError> {
        let gateway = Arc::new(HttpGateway::from_env()?);
        Ok(Self::new(gateway, key_store))
    }

    /// The unsealer bound to this client's key store.
    pub fn unsealer(&self) -> &Unsealer {
        &self.unsealer
    }
}

impl std::fmt::Debug for VirtualCardsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VirtualCardsClient")
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared test doubles and fixtures for the operation modules.

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use base64ct::{Base64, Encoding};
    use serde_json::{json, Value};

    use crate::graphql::{
        GatewayError, GraphQlGateway, GraphQlOperation, GraphQlResponseError, RawResponse,
    };
    use crate::keys::{KeyStore, KeyStoreError, KeyStoreResult, LocalKeyStore, PublicKey};
    use crate::unsealing::SealingAlgorithm;

    /// Gateway double replaying queued responses in order.
    pub(crate) struct MockGateway {
        responses: Mutex<VecDeque<Result<RawResponse, GatewayError>>>,
        pub calls: AtomicUsize,
    }

    impl MockGateway {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn push_data(&self, data: Value) {
            self.responses.lock().unwrap().push_back(Ok(RawResponse {
                data: Some(data),
                errors: Vec::new(),
            }));
        }

        pub fn push_graphql_error(&self, error_type: &str) {
            self.push_graphql_error_with_info(error_type, None);
        }

        pub fn push_graphql_error_with_info(&self, error_type: &str, error_info: Option<Value>) {
            self.responses.lock().unwrap().push_back(Ok(RawResponse {
                data: None,
                errors: vec![GraphQlResponseError {
                    error_type: error_type.to_string(),
                    message: format!("{error_type} raised by service"),
                    error_info,
                }],
            }));
        }

        pub fn push_error(&self, error: GatewayError) {
            self.responses.lock().unwrap().push_back(Err(error));
        }
    }

    #[async_trait]
    impl GraphQlGateway for MockGateway {
        async fn execute(&self, _operation: GraphQlOperation) -> Result<RawResponse, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("no queued response for gateway call"))
        }
    }

    /// Key store double that cannot decrypt anything and holds no key pair.
    pub(crate) struct FailingKeyStore {
        pub private_decrypt_calls: AtomicUsize,
    }

    impl FailingKeyStore {
        pub fn new() -> Self {
            Self {
                private_decrypt_calls: AtomicUsize::new(0),
            }
        }
    }

    impl KeyStore for FailingKeyStore {
        fn decrypt_with_private_key(
            &self,
            key_id: &str,
            _ciphertext: &[u8],
            _algorithm: SealingAlgorithm,
        ) -> KeyStoreResult<Vec<u8>> {
            self.private_decrypt_calls.fetch_add(1, Ordering::SeqCst);
            Err(KeyStoreError::KeyNotFound {
                key_id: key_id.to_string(),
            })
        }

        fn decrypt_with_symmetric_key(
            &self,
            _key: &[u8],
            _ciphertext: &[u8],
        ) -> KeyStoreResult<Vec<u8>> {
            Err(KeyStoreError::Decryption(
                "no symmetric key material".to_string(),
            ))
        }

        fn current_public_key(&self) -> KeyStoreResult<Option<PublicKey>> {
            Ok(None)
        }
    }

    /// Seal `plaintext` with `store` and render it base64 for a wire record.
    pub(crate) fn sealed_b64(store: &LocalKeyStore, key_id: &str, plaintext: &str) -> String {
        Base64::encode_string(&store.seal(key_id, plaintext.as_bytes()).unwrap())
    }

    /// A complete sealed card record as the service would return it.
    pub(crate) fn sealed_card_json(store: &LocalKeyStore, key_id: &str, id: &str) -> Value {
        json!({
            "id": id,
            "owner": "owner-1",
            "version": 1,
            "createdAtEpochMs": 1_700_000_000_000.0,
            "updatedAtEpochMs": 1_700_000_000_000.0,
            "keyId": key_id,
            "keyRingId": "ring-1",
            "algorithm": SealingAlgorithm::RsaOaepSha256AesGcm.wire_tag(),
            "fundingSourceId": "fs-1",
            "state": "ISSUED",
            "activeToEpochMs": 1_800_000_000_000.0,
            "last4": "last4",
            "currency": "USD",
            "cardHolder": sealed_b64(store, key_id, "card holder"),
            "alias": sealed_b64(store, key_id, "alias"),
            "pan": sealed_b64(store, key_id, "6666666666666666"),
            "csc": sealed_b64(store, key_id, "123"),
        })
    }

    /// A complete sealed transaction record as the service would return it.
    pub(crate) fn sealed_transaction_json(store: &LocalKeyStore, key_id: &str, id: &str) -> Value {
        json!({
            "id": id,
            "owner": "owner-1",
            "version": 1,
            "createdAtEpochMs": 1_700_000_000_000.0,
            "updatedAtEpochMs": 1_700_000_000_000.0,
            "cardId": "card-1",
            "sequenceId": "seq-1",
            "type": "COMPLETE",
            "keyId": key_id,
            "algorithm": SealingAlgorithm::RsaOaepSha256AesGcm.wire_tag(),
            "transactedAtEpochMs": sealed_b64(store, key_id, "1700000000000"),
            "description": sealed_b64(store, key_id, "coffee"),
            "billedAmount": {
                "currency": sealed_b64(store, key_id, "USD"),
                "amount": sealed_b64(store, key_id, "450"),
            },
            "transactedAmount": {
                "currency": sealed_b64(store, key_id, "USD"),
                "amount": sealed_b64(store, key_id, "450"),
            },
        })
    }
}
