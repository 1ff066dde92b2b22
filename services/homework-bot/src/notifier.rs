//! Notifier trait and fail-safe message delivery

use async_trait::async_trait;

/// Trait for sending chat messages
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "telegram")
    fn type_name(&self) -> &str;

    /// Send a plain-text message to the configured recipient
    async fn notify(&self, text: &str) -> crate::Result<()>;
}

/// Outcome of a single delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Failed(String),
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered)
    }
}

/// Send `text` and report the outcome instead of failing.
///
/// Delivery problems are logged here and never reach the caller as errors.
pub async fn send_message(notifier: &dyn Notifier, text: &str) -> Delivery {
    tracing::debug!("Sending message via '{}': {}", notifier.type_name(), text);

    match notifier.notify(text).await {
        Ok(()) => {
            tracing::debug!("Message sent via '{}'", notifier.type_name());
            Delivery::Delivered
        }
        Err(e) => {
            tracing::error!(
                "Failed to send message via '{}': {}",
                notifier.type_name(),
                e
            );
            Delivery::Failed(e.to_string())
        }
    }
}
