//! Client for the homework status API

use std::sync::Arc;

use serde_json::Value;

use crate::config::PracticumConfig;
use crate::io::HttpClient;

/// Fetches homework statuses on behalf of one student
pub struct PracticumClient {
    endpoint: String,
    authorization: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(config: &PracticumConfig, token: &str, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created PracticumClient for {}", config.endpoint);

        Self {
            endpoint: config.endpoint.clone(),
            authorization: format!("OAuth {}", token),
            http,
        }
    }

    /// Request every homework updated since `from_date` (unix seconds).
    ///
    /// The body is returned unvalidated; any transport, status or JSON
    /// failure is an error for this cycle only.
    pub async fn fetch(&self, from_date: i64) -> crate::Result<Value> {
        let from_date = from_date.to_string();
        tracing::debug!("Fetching homework statuses from_date={}", from_date);

        let response = self
            .http
            .get(
                &self.endpoint,
                &[("Authorization", self.authorization.as_str())],
                &[("from_date", from_date.as_str())],
            )
            .await?;

        if response.status != 200 {
            return Err(crate::BotError::HttpStatus {
                url: self.endpoint.clone(),
                status: response.status,
                body: response.body,
            });
        }

        let payload = serde_json::from_str(&response.body)?;
        Ok(payload)
    }
}
