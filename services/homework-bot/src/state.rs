//! Dedup markers carried from one polling cycle to the next

/// State owned by the polling loop for the lifetime of the process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopState {
    /// `date_updated` of the last status change sent to the chat (unix seconds)
    pub last_notified_timestamp: i64,
    /// Failure notice most recently sent, cleared by any successful cycle
    pub last_failure_message: Option<String>,
}

impl LoopState {
    /// Fresh state; `from_date` is the lower bound used on the first cycle
    pub fn new(from_date: i64) -> Self {
        Self {
            last_notified_timestamp: from_date,
            last_failure_message: None,
        }
    }

    /// Whether a record updated at `timestamp` has not been reported yet
    pub fn is_newer(&self, timestamp: i64) -> bool {
        timestamp > self.last_notified_timestamp
    }

    /// Record a delivered status change; the marker never moves backwards
    pub fn mark_notified(&mut self, timestamp: i64) {
        self.last_notified_timestamp = self.last_notified_timestamp.max(timestamp);
        self.last_failure_message = None;
    }

    /// Forget the last failure so the next one is reported again
    pub fn clear_failure(&mut self) {
        self.last_failure_message = None;
    }

    /// Remember `message` as sent. Returns false when it repeats the last failure.
    pub fn record_failure(&mut self, message: &str) -> bool {
        if self.last_failure_message.as_deref() == Some(message) {
            return false;
        }
        self.last_failure_message = Some(message.to_string());
        true
    }
}
