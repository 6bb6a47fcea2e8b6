// ─── Auth Exchange ───
// Mints the single-use launch code handed to the game process. A code is
// requested fresh for every launch attempt and never cached; expiry and
// single-use enforcement live on the remote service.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};

const EXCHANGE_ENDPOINT: &str = "https://api.horizonfn.org/account/api/oauth/exchange";

/// Single-use launch credential bound to the current session token.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeCode {
    pub code: String,
    #[serde(rename = "expiresInSeconds", default)]
    pub expires_in_seconds: Option<u64>,
}

/// Session token → exchange code. Injected into the state machine so the
/// launch path can be exercised without a live account service.
#[async_trait]
pub trait AuthExchange: Send + Sync {
    async fn exchange(&self, session_token: &str) -> LauncherResult<ExchangeCode>;
}

/// Production exchange client against the account service.
pub struct HttpAuthExchange {
    client: Client,
    endpoint: String,
}

impl HttpAuthExchange {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: EXCHANGE_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl AuthExchange for HttpAuthExchange {
    async fn exchange(&self, session_token: &str) -> LauncherResult<ExchangeCode> {
        if session_token.trim().is_empty() {
            return Err(LauncherError::Authentication(
                "session token is empty".into(),
            ));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(session_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::Authentication(format!(
                "exchange rejected: HTTP {status}"
            )));
        }

        let code: ExchangeCode = response.json().await?;
        info!("Obtained exchange code (expires in {:?}s)", code.expires_in_seconds);
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::http::build_http_client;

    #[tokio::test]
    async fn empty_token_is_rejected_before_any_network_call() {
        // unroutable endpoint: reaching it would fail the test with Http,
        // not Authentication
        let client = HttpAuthExchange::new(build_http_client().unwrap())
            .with_endpoint("http://127.0.0.1:0/exchange");

        for token in ["", "   "] {
            match client.exchange(token).await {
                Err(LauncherError::Authentication(_)) => {}
                other => panic!("expected Authentication error, got {other:?}"),
            }
        }
    }

    #[test]
    fn exchange_code_deserializes_the_account_service_shape() {
        let code: ExchangeCode =
            serde_json::from_str(r#"{"code":"ab12cd34","expiresInSeconds":300}"#).unwrap();
        assert_eq!(code.code, "ab12cd34");
        assert_eq!(code.expires_in_seconds, Some(300));

        let bare: ExchangeCode = serde_json::from_str(r#"{"code":"ab12cd34"}"#).unwrap();
        assert_eq!(bare.expires_in_seconds, None);
    }
}
