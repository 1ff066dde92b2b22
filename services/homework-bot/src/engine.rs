//! Engine: polls the homework API, detects status changes, and notifies

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::homework::{parse_date_updated, parse_status};
use crate::notifier::{send_message, Delivery, Notifier};
use crate::practicum::PracticumClient;
use crate::response::validate;
use crate::state::LoopState;

/// Prefix of every failure notice sent to the chat
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// What a single polling cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A status change was sent
    Notified { timestamp: i64, delivery: Delivery },
    /// The latest record was already reported
    Unchanged,
    /// The API returned no homeworks
    NoHomeworks,
    /// A new failure notice was sent
    FailureReported { message: String, delivery: Delivery },
    /// The failure repeats the last notice and was not resent
    FailureSuppressed { message: String },
}

enum Detection {
    NoHomeworks,
    Unchanged,
    Changed { timestamp: i64, message: String },
}

/// Format the chat notice for a failed cycle
pub fn failure_message(error: &crate::BotError) -> String {
    format!("{}: {}", FAILURE_PREFIX, error)
}

/// The engine runs the polling cycle against one API client and one chat
pub struct Engine {
    client: PracticumClient,
    notifier: Arc<dyn Notifier>,
    retry_period: Duration,
    cancel: CancellationToken,
}

impl Engine {
    pub fn new(
        client: PracticumClient,
        notifier: Arc<dyn Notifier>,
        retry_period: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            notifier,
            retry_period,
            cancel,
        }
    }

    /// Run cycles until the cancellation token is triggered, returning the final state
    pub async fn run(&self, mut state: LoopState) -> LoopState {
        tracing::info!(
            "Polling every {} starting from_date={}",
            humantime::format_duration(self.retry_period),
            state.last_notified_timestamp
        );

        loop {
            let outcome = self.run_cycle(&mut state).await;
            tracing::debug!("Cycle finished: {:?}", outcome);

            tokio::select! {
                _ = tokio::time::sleep(self.retry_period) => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Polling loop cancelled");
                    break;
                }
            }
        }

        state
    }

    /// Run one fetch, validate, detect and notify pass
    pub async fn run_cycle(&self, state: &mut LoopState) -> CycleOutcome {
        match self.detect(state).await {
            Ok(Detection::Changed { timestamp, message }) => {
                let delivery = send_message(self.notifier.as_ref(), &message).await;
                match &delivery {
                    Delivery::Delivered => tracing::info!("Status change sent: {}", message),
                    Delivery::Failed(reason) => tracing::warn!(
                        "Status change could not be delivered, not retrying: {}",
                        reason
                    ),
                }
                state.mark_notified(timestamp);
                CycleOutcome::Notified {
                    timestamp,
                    delivery,
                }
            }
            Ok(Detection::Unchanged) => {
                tracing::debug!("No new status since {}", state.last_notified_timestamp);
                state.clear_failure();
                CycleOutcome::Unchanged
            }
            Ok(Detection::NoHomeworks) => {
                tracing::debug!("No homeworks in response");
                state.clear_failure();
                CycleOutcome::NoHomeworks
            }
            Err(e) => self.report_failure(state, &e).await,
        }
    }

    async fn detect(&self, state: &LoopState) -> crate::Result<Detection> {
        let payload = self.client.fetch(state.last_notified_timestamp).await?;
        let response = validate(&payload)?;

        let Some(homework) = response.latest() else {
            return Ok(Detection::NoHomeworks);
        };

        let timestamp = parse_date_updated(homework)?;
        if !state.is_newer(timestamp) {
            return Ok(Detection::Unchanged);
        }

        let message = parse_status(homework)?;
        Ok(Detection::Changed { timestamp, message })
    }

    async fn report_failure(&self, state: &mut LoopState, error: &crate::BotError) -> CycleOutcome {
        let message = failure_message(error);
        tracing::warn!("{}", message);

        if !state.record_failure(&message) {
            tracing::debug!("Failure already reported, suppressing notice");
            return CycleOutcome::FailureSuppressed { message };
        }

        let delivery = send_message(self.notifier.as_ref(), &message).await;
        CycleOutcome::FailureReported { message, delivery }
    }
}
