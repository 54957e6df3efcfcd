//! Client for the banking admin app
//!
//! The admin app owns banking sessions; ending one invalidates the secret
//! session id handed to the client-side widget.

use crate::{Error, Result, config::AdminSettings, handler::HttpFailure};
use reqwest::Client;
use serde_json::json;
use url::Url;

/// Ends banking sessions on the admin app
#[async_trait::async_trait]
pub trait SessionTerminator: Send + Sync {
    /// End the session identified by `session_id`
    async fn end_session(&self, session_id: &str, session_id_short: &str) -> Result<()>;
}

/// HTTP client for the admin app
#[derive(Debug, Clone)]
pub struct AdminClient {
    /// HTTP client
    client: Client,
    /// Fully resolved end-session URL
    end_session_url: Url,
    /// `key:secret` pair for token authentication
    token: Option<String>,
}

impl AdminClient {
    /// Create a client from the admin settings
    pub fn new(settings: &AdminSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(crate::utils::user_agent())
            .build()?;
        Self::with_client(client, settings)
    }

    /// Create a client around an existing HTTP client
    pub fn with_client(client: Client, settings: &AdminSettings) -> Result<Self> {
        let end_session_url = Url::parse(&format!(
            "{}{}",
            settings.base_url.trim_end_matches('/'),
            settings.end_session_path
        ))?;

        let token = match (&settings.api_key, &settings.api_secret) {
            (Some(key), Some(secret)) => Some(format!("{}:{}", key, secret)),
            _ => None,
        };

        Ok(Self {
            client,
            end_session_url,
            token,
        })
    }

    /// URL the end-session request is sent to
    pub fn end_session_url(&self) -> &Url {
        &self.end_session_url
    }
}

#[async_trait::async_trait]
impl SessionTerminator for AdminClient {
    async fn end_session(&self, session_id: &str, session_id_short: &str) -> Result<()> {
        let mut request = self.client.post(self.end_session_url.clone()).json(&json!({
            "session_id": session_id,
            "session_id_short": session_id_short,
        }));
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Failed to reach admin app: {}", e);
            Error::Http(e)
        })?;

        HttpFailure::error_for_status(response).await.map_err(|failure| {
            tracing::error!("Admin app refused to end session {}: {}", session_id_short, failure);
            Error::from(failure)
        })?;

        tracing::debug!("Admin app ended session {}", session_id_short);
        Ok(())
    }
}
