//! Homework bot - review status notifier
//!
//! Polls the homework status API, detects review status changes, and sends
//! them to a Telegram chat.

pub mod config;
pub mod engine;
pub mod error;
pub mod homework;
pub mod io;
pub mod notifier;
pub mod practicum;
pub mod response;
pub mod state;
pub mod telegram;

pub use config::{load_config, Config, Secrets};
pub use error::{BotError, Result};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::engine::Engine;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::practicum::PracticumClient;
use crate::state::LoopState;
use crate::telegram::TelegramNotifier;

/// Wire the API client and Telegram notifier into an engine
pub fn build_engine(
    config: &Config,
    secrets: &Secrets,
    http: Arc<dyn HttpClient>,
    cancel: CancellationToken,
) -> Engine {
    let client = PracticumClient::new(
        &config.practicum,
        &secrets.practicum_token,
        Arc::clone(&http),
    );
    let notifier = Arc::new(TelegramNotifier::new(
        &config.telegram,
        &secrets.telegram_token,
        &secrets.telegram_chat_id,
        http,
    ));

    Engine::new(client, notifier, config.retry_period, cancel)
}

/// Run the homework bot with the given configuration until Ctrl-C
pub async fn run(config: Config, secrets: Secrets) -> Result<()> {
    let http: Arc<dyn HttpClient> =
        Arc::new(ReqwestHttpClient::new(config.practicum.request_timeout)?);
    let cancel = CancellationToken::new();

    let engine = build_engine(&config, &secrets, http, cancel.clone());

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                cancel_for_signal.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
        }
    });

    tracing::info!("Homework bot started");

    // Run the engine (blocks until cancelled)
    engine
        .run(LoopState::new(config.practicum.initial_from_date))
        .await;

    tracing::info!("Homework bot stopped");
    Ok(())
}
