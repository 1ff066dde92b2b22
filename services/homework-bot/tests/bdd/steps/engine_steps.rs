//! BDD step definitions for polling cycles, change detection and failures

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use cucumber::{given, then, when};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use homework_bot::config::{PracticumConfig, TelegramConfig};
use homework_bot::engine::CycleOutcome;
use homework_bot::io::HttpClient;
use homework_bot::state::LoopState;
use homework_bot::{build_engine, Config, Secrets};

use crate::world::HomeworkBotWorld;

fn timestamp(rfc3339: &str) -> i64 {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("invalid timestamp in scenario")
        .timestamp()
}

fn homeworks_body(homeworks: serde_json::Value) -> String {
    json!({"homeworks": homeworks}).to_string()
}

fn report(world: &mut HomeworkBotWorld, name: &str, status: &str, updated: &str) {
    let body = homeworks_body(json!([
        {"homework_name": name, "status": status, "date_updated": updated}
    ]));
    world.http.set_practicum_reply(Some((200, body)));
}

fn test_config() -> Config {
    Config {
        retry_period: Duration::from_millis(10),
        practicum: PracticumConfig {
            endpoint: "https://practicum.invalid/api/user_api/homework_statuses/".to_string(),
            initial_from_date: 0,
            request_timeout: Duration::from_secs(1),
        },
        telegram: TelegramConfig {
            api_url: "https://telegram.invalid".to_string(),
        },
    }
}

fn test_secrets() -> Secrets {
    Secrets {
        practicum_token: "practicum-token".to_string(),
        telegram_token: "123:abc".to_string(),
        telegram_chat_id: "42".to_string(),
    }
}

async fn run_cycles(world: &mut HomeworkBotWorld, count: usize) {
    let http: Arc<dyn HttpClient> = world.http.clone();
    let engine = build_engine(&test_config(), &test_secrets(), http, CancellationToken::new());
    let state = world.loop_state.get_or_insert_with(|| LoopState::new(0));

    for _ in 0..count {
        let outcome = engine.run_cycle(state).await;
        world.outcomes.push(outcome);
    }
}

fn last_message(world: &HomeworkBotWorld) -> String {
    world
        .http
        .posted("text")
        .pop()
        .expect("no message was sent")
}

// --- Setup ---

#[given(expr = "a bot whose last notification was at {string}")]
fn bot_with_last_notification(world: &mut HomeworkBotWorld, at: String) {
    world.loop_state = Some(LoopState::new(timestamp(&at)));
}

#[given(expr = "the API reports {string} with status {string} updated at {string}")]
fn api_reports(world: &mut HomeworkBotWorld, name: String, status: String, updated: String) {
    report(world, &name, &status, &updated);
}

#[when(expr = "the API starts reporting {string} with status {string} updated at {string}")]
fn api_starts_reporting(
    world: &mut HomeworkBotWorld,
    name: String,
    status: String,
    updated: String,
) {
    report(world, &name, &status, &updated);
}

#[given("the API reports no homeworks")]
fn api_reports_nothing(world: &mut HomeworkBotWorld) {
    world
        .http
        .set_practicum_reply(Some((200, homeworks_body(json!([])))));
}

#[when("the API starts reporting no homeworks")]
fn api_starts_reporting_nothing(world: &mut HomeworkBotWorld) {
    api_reports_nothing(world);
}

#[given("the API is unreachable")]
fn api_unreachable(world: &mut HomeworkBotWorld) {
    world.http.set_practicum_reply(None);
}

#[when("the API becomes unreachable")]
fn api_becomes_unreachable(world: &mut HomeworkBotWorld) {
    api_unreachable(world);
}

#[when(expr = "the API starts returning HTTP status {int}")]
fn api_returns_status(world: &mut HomeworkBotWorld, status: u16) {
    world
        .http
        .set_practicum_reply(Some((status, "Internal Server Error".to_string())));
}

#[given(expr = "the API returns the body {string}")]
fn api_returns_body(world: &mut HomeworkBotWorld, body: String) {
    world.http.set_practicum_reply(Some((200, body)));
}

#[given("the Telegram API rejects messages")]
fn telegram_rejects(world: &mut HomeworkBotWorld) {
    world.http.set_telegram_reply(Some((
        403,
        r#"{"ok":false,"error_code":403,"description":"Forbidden: bot was blocked by the user"}"#
            .to_string(),
    )));
}

#[given("the Telegram API is unreachable")]
fn telegram_unreachable(world: &mut HomeworkBotWorld) {
    world.http.set_telegram_reply(None);
}

// --- Cycles ---

#[when("a polling cycle runs")]
async fn one_cycle(world: &mut HomeworkBotWorld) {
    run_cycles(world, 1).await;
}

#[when(expr = "{int} polling cycles run")]
async fn several_cycles(world: &mut HomeworkBotWorld, count: usize) {
    run_cycles(world, count).await;
}

// --- Assertions ---

#[then(expr = "exactly {int} message(s) should be sent")]
fn messages_sent(world: &mut HomeworkBotWorld, count: usize) {
    assert_eq!(world.http.posted("text").len(), count);
}

#[then("no message should be sent")]
fn nothing_sent(world: &mut HomeworkBotWorld) {
    assert!(world.http.posted("text").is_empty());
}

#[then(expr = "the last message should be {string}")]
fn last_message_is(world: &mut HomeworkBotWorld, expected: String) {
    assert_eq!(last_message(world), expected);
}

#[then(expr = "the last message should start with {string}")]
fn last_message_starts_with(world: &mut HomeworkBotWorld, prefix: String) {
    let message = last_message(world);
    assert!(message.starts_with(&prefix), "{message}");
}

#[then(expr = "the last message should contain {string}")]
fn last_message_contains(world: &mut HomeworkBotWorld, fragment: String) {
    let message = last_message(world);
    assert!(message.contains(&fragment), "{message}");
}

#[then(expr = "the last message should be posted to chat {string}")]
fn last_message_chat(world: &mut HomeworkBotWorld, chat_id: String) {
    let chat = world.http.posted("chat_id").pop().expect("no message was sent");
    assert_eq!(chat, chat_id);
}

#[then(expr = "the last cycle outcome should be {string}")]
fn last_outcome(world: &mut HomeworkBotWorld, expected: String) {
    let outcome = world.outcomes.last().expect("no cycle has run");
    let matched = match expected.as_str() {
        "unchanged" => matches!(outcome, CycleOutcome::Unchanged),
        "no homeworks" => matches!(outcome, CycleOutcome::NoHomeworks),
        "failure suppressed" => matches!(outcome, CycleOutcome::FailureSuppressed { .. }),
        other => panic!("Unknown cycle outcome: {}", other),
    };
    assert!(matched, "expected {expected}, got {outcome:?}");
}

#[then(expr = "the last notified time should be {string}")]
fn last_notified_time(world: &mut HomeworkBotWorld, expected: String) {
    let state = world.loop_state.as_ref().expect("no bot state");
    assert_eq!(state.last_notified_timestamp, timestamp(&expected));
}

#[then("the first delivery should have failed")]
fn first_delivery_failed(world: &mut HomeworkBotWorld) {
    let delivery = world.outcomes.iter().find_map(|outcome| match outcome {
        CycleOutcome::Notified { delivery, .. } => Some(delivery),
        CycleOutcome::FailureReported { delivery, .. } => Some(delivery),
        _ => None,
    });
    let delivery = delivery.expect("nothing was delivered");
    assert!(!delivery.is_delivered(), "{delivery:?}");
}
