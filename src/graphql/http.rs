// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! reqwest-backed GraphQL gateway.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::config::{ConfigError, GatewayConfig};

use super::gateway::{
    GatewayError, GraphQlGateway, GraphQlOperation, GraphQlResponseError, RawResponse,
};

const API_KEY_HEADER: &str = "x-api-key";

/// HTTP gateway for the virtual cards GraphQL API.
///
/// One suspension point per operation: the network round-trip. Cooperative
/// cancellation is supported through the gateway's [`CancellationToken`];
/// when it fires mid-flight the operation resolves to
/// [`GatewayError::Cancelled`].
#[derive(Debug, Clone)]
pub struct HttpGateway {
    endpoint: Url,
    api_key: Option<String>,
    http: Client,
    cancel: CancellationToken,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlResponseError>,
}

impl HttpGateway {
    /// Build a gateway from explicit configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            endpoint: config.endpoint,
            api_key: config.api_key,
            http,
            cancel: CancellationToken::new(),
        })
    }

    /// Build a gateway from the environment (see [`crate::config`]).
    pub fn from_env() -> Result<Self, GatewayError> {
        let config = GatewayConfig::from_env()
            .map_err(|e: ConfigError| GatewayError::Transport(e.to_string()))?;
        Self::new(config)
    }

    /// Token that cancels all in-flight operations on this gateway when
    /// triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

#[async_trait]
impl GraphQlGateway for HttpGateway {
    async fn execute(&self, operation: GraphQlOperation) -> Result<RawResponse, GatewayError> {
        debug!(operation = operation.name, "executing GraphQL operation");

        let body = json!({
            "operationName": operation.name,
            "query": operation.document,
            "variables": operation.variables,
        });

        let mut request = self.http.post(self.endpoint.clone()).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let response = tokio::select! {
            _ = self.cancel.cancelled() => return Err(GatewayError::Cancelled),
            result = request.send() => {
                result.map_err(|e| GatewayError::Transport(e.to_string()))?
            }
        };

        match response.status() {
            StatusCode::OK => {}
            StatusCode::FORBIDDEN => return Err(GatewayError::Forbidden),
            status => {
                return Err(GatewayError::Http {
                    status: status.as_u16(),
                })
            }
        }

        // The body download is a second suspension point; the token must win
        // there too, not only during the send.
        let wire: WireResponse = tokio::select! {
            _ = self.cancel.cancelled() => return Err(GatewayError::Cancelled),
            result = response.json::<WireResponse>() => {
                result.map_err(|e| GatewayError::InvalidResponse(e.to_string()))?
            }
        };

        Ok(RawResponse {
            data: wire.data,
            errors: wire.errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_token_short_circuits_before_transport() {
        // Endpoint that would never resolve; the pre-cancelled token must
        // win the select.
        let config = GatewayConfig::new("https://192.0.2.1/graphql").unwrap();
        let gateway = HttpGateway::new(config).unwrap();
        gateway.cancellation_token().cancel();

        let err = gateway
            .execute(GraphQlOperation::new("Noop", "query Noop { __typename }", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Cancelled));
    }

    #[tokio::test]
    async fn token_fired_during_body_transfer_cancels_the_operation() {
        use std::time::Duration;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Server that sends the response headers and the start of the body,
        // then stalls without completing it.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 4096\r\n\r\n{",
                )
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        let config = GatewayConfig::new(&format!("http://{addr}/graphql")).unwrap();
        let gateway = HttpGateway::new(config).unwrap();
        let token = gateway.cancellation_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            token.cancel();
        });

        let err = gateway
            .execute(GraphQlOperation::new("Noop", "query Noop { __typename }", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Cancelled));
        server.abort();
    }
}
