//! End-to-end orchestration tests over the mock transport.
//!
//! All timing assertions run under tokio's paused clock, so backoff
//! delays are observed exactly without real waiting.

use coinsight::service::{ANALYSIS_UNAVAILABLE, CHAT_FALLBACK_TEXT, COMMAND_UNAVAILABLE};
use coinsight::models::service_unavailable_stub;
use coinsight::{
    ChatService, CoinsightError, Config, DispatchOutcome, MockTransport, RetryController,
    ScoreService,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn completion_payload(content: &str) -> Value {
    json!({
        "id": "resp-1",
        "model": "sonar",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30 },
    })
}

fn transient_error() -> CoinsightError {
    CoinsightError::Api {
        status: 500,
        message: "internal server error".to_string(),
    }
}

fn chat_service(mock: &MockTransport) -> ChatService<MockTransport> {
    let config = Config::default();
    let controller = Arc::new(RetryController::new(
        Arc::new(mock.clone()),
        config.dispatch.retry_policy(),
    ));
    ChatService::new(controller, &config)
}

fn score_service(mock: &MockTransport) -> ScoreService<MockTransport> {
    let config = Config::default();
    let controller = Arc::new(RetryController::new(
        Arc::new(mock.clone()),
        config.dispatch.retry_policy(),
    ));
    ScoreService::new(controller, &config)
}

#[tokio::test(start_paused = true)]
async fn retry_exhaustion_makes_three_attempts_with_linear_backoff() {
    let mock = MockTransport::new();
    for _ in 0..3 {
        mock.push_response("flash", Err(transient_error()));
    }
    let service = chat_service(&mock);

    let start = Instant::now();
    let payload = service.command("FLASH").await.unwrap();

    // 0ms before attempt 1, 500ms before attempt 2, 1000ms before attempt 3
    assert_eq!(start.elapsed(), Duration::from_millis(1500));
    assert_eq!(mock.calls_for("flash"), 3);
    assert_eq!(payload, service_unavailable_stub(COMMAND_UNAVAILABLE));
}

#[tokio::test(start_paused = true)]
async fn rate_limited_aborts_after_one_attempt() {
    let mock = MockTransport::new();
    mock.push_response("flash", Err(CoinsightError::RateLimited));
    // A queued success must never be reached
    mock.push_response("flash", Ok(completion_payload("{\"flash_status\":\"Found\"}")));
    let service = chat_service(&mock);

    let start = Instant::now();
    let err = service.command("flash").await.unwrap_err();

    assert!(matches!(err, CoinsightError::RateLimited));
    assert_eq!(mock.calls_for("flash"), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn auth_failure_is_terminal_in_every_subsystem() {
    let mock = MockTransport::new();
    mock.push_response("chat", Err(CoinsightError::AuthFailed));
    let service = chat_service(&mock);

    let err = service.chat("what is staking?").await.unwrap_err();
    assert!(matches!(err, CoinsightError::AuthFailed));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn short_chat_content_is_retried_as_transient() {
    let mock = MockTransport::new();
    mock.push_response("chat", Ok(completion_payload("too short")));
    mock.push_response(
        "chat",
        Ok(completion_payload(
            "Staking locks tokens to secure a proof-of-stake network in exchange for rewards.",
        )),
    );
    let service = chat_service(&mock);

    let start = Instant::now();
    let response = service.chat("what is staking?").await.unwrap();

    assert!(response.starts_with("Staking locks tokens"));
    assert_eq!(mock.calls_for("chat"), 2);
    assert_eq!(start.elapsed(), Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn chat_exhaustion_returns_fixed_fallback_text() {
    let mock = MockTransport::new();
    for _ in 0..3 {
        mock.push_response("chat", Err(CoinsightError::Timeout(Duration::from_secs(90))));
    }
    let service = chat_service(&mock);

    let response = service.chat("what is staking?").await.unwrap();
    assert_eq!(response, CHAT_FALLBACK_TEXT);
    assert_eq!(mock.calls_for("chat"), 3);
}

#[tokio::test]
async fn command_success_returns_raw_payload_verbatim() {
    let mock = MockTransport::new();
    let mut payload = completion_payload(r#"{"moon_status":"Found","coins":[]}"#);
    payload["citations"] = json!(["https://example.com/source"]);
    mock.push_response("moon", Ok(payload.clone()));
    let service = chat_service(&mock);

    let returned = service.command("MOON").await.unwrap();
    assert_eq!(returned, payload);

    let call = &mock.calls()[0];
    assert_eq!(call.model, "sonar");
    assert!(call.has_schema);
}

#[tokio::test]
async fn unknown_command_makes_zero_transport_invocations() {
    let mock = MockTransport::new();
    let service = chat_service(&mock);

    let err = service.command("unknown_key").await.unwrap_err();
    assert!(matches!(err, CoinsightError::UnknownCategory(_)));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn command_lookup_is_case_insensitive() {
    let mock = MockTransport::new();
    mock.push_response("moon", Ok(completion_payload("{}")));
    mock.push_response("moon", Ok(completion_payload("{}")));
    let service = chat_service(&mock);

    service.command("moon").await.unwrap();
    service.command("MOON").await.unwrap();
    assert_eq!(mock.calls_for("moon"), 2);
}

#[tokio::test(start_paused = true)]
async fn batch_settles_all_units_bounded_by_slowest() {
    let mock = MockTransport::new();
    mock.push_response("team", Ok(completion_payload(r#"{"team_status":"Found"}"#)));
    for _ in 0..3 {
        mock.push_response("audit", Err(transient_error()));
    }
    mock.push_response(
        "whitepaper",
        Ok(completion_payload(r#"{"whitepaper_status":"Found"}"#)),
    );
    let service = score_service(&mock);

    let start = Instant::now();
    let batch = service
        .score(
            "Ethereum",
            "Ethereum",
            &["team".to_string(), "audit".to_string(), "whitepaper".to_string()],
        )
        .await
        .unwrap();

    // Bounded by audit's full retry sequence, not the sum of all units
    assert_eq!(start.elapsed(), Duration::from_millis(1500));

    assert_eq!(batch.len(), 3);
    assert!(batch.get("team").unwrap().is_success());
    assert!(batch.get("whitepaper").unwrap().is_success());

    match batch.get("audit").unwrap() {
        DispatchOutcome::Fallback { payload, .. } => {
            assert_eq!(*payload, service_unavailable_stub(ANALYSIS_UNAVAILABLE));
        }
        other => panic!("expected fallback for audit, got {other:?}"),
    }

    assert_eq!(mock.calls_for("team"), 1);
    assert_eq!(mock.calls_for("audit"), 3);
    assert_eq!(mock.calls_for("whitepaper"), 1);
}

#[tokio::test(start_paused = true)]
async fn batch_isolates_terminal_failures_from_siblings() {
    let mock = MockTransport::new();
    mock.push_response("audit", Err(CoinsightError::RateLimited));
    mock.push_response("team", Ok(completion_payload(r#"{"team_status":"Found"}"#)));
    let service = score_service(&mock);

    let batch = service
        .score("Ethereum", "Ethereum", &["audit".to_string(), "team".to_string()])
        .await
        .unwrap();

    assert_eq!(batch.len(), 2);
    assert!(matches!(
        batch.get("audit").unwrap(),
        DispatchOutcome::TerminalError { .. }
    ));
    // The sibling still ran to completion
    assert!(batch.get("team").unwrap().is_success());
    assert_eq!(mock.calls_for("audit"), 1);
    assert_eq!(mock.calls_for("team"), 1);
}

#[tokio::test]
async fn batch_records_unknown_categories_without_failing() {
    let mock = MockTransport::new();
    mock.push_response("audit", Ok(completion_payload(r#"{"audit_status":"Found"}"#)));
    let service = score_service(&mock);

    let batch = service
        .score("Ethereum", "Ethereum", &["audit".to_string(), "bogus".to_string()])
        .await
        .unwrap();

    assert_eq!(batch.len(), 2);
    assert!(batch.get("audit").unwrap().is_success());
    match batch.get("bogus").unwrap() {
        DispatchOutcome::TerminalError { message, .. } => {
            assert!(message.contains("bogus"));
        }
        other => panic!("expected terminal error for bogus, got {other:?}"),
    }
    // The unknown category never reached the transport
    assert_eq!(mock.calls_for("bogus"), 0);

    let rendered = batch.to_json();
    assert_eq!(rendered["results"]["audit"]["status"], "success");
    assert_eq!(rendered["results"]["bogus"]["status"], "error");
}

#[tokio::test]
async fn batch_with_no_categories_selects_the_full_catalog() {
    let mock = MockTransport::new();
    for key in coinsight::catalog::categories().keys() {
        mock.push_response(key, Ok(completion_payload(r#"{"status":"ok"}"#)));
    }
    let service = score_service(&mock);

    let batch = service.score("Ethereum", "Ethereum", &[]).await.unwrap();
    assert_eq!(batch.len(), 13);
    assert!(batch.iter().all(|(_, outcome)| outcome.is_success()));
}

#[tokio::test(start_paused = true)]
async fn fallback_stub_is_identical_across_categories() {
    let mock = MockTransport::new();
    for category in ["audit", "sentiment"] {
        for _ in 0..3 {
            mock.push_response(category, Err(transient_error()));
        }
    }
    let service = score_service(&mock);

    let batch = service
        .score("Ethereum", "Ethereum", &["audit".to_string(), "sentiment".to_string()])
        .await
        .unwrap();

    let payload_of = |key: &str| match batch.get(key).unwrap() {
        DispatchOutcome::Fallback { payload, .. } => payload.clone(),
        other => panic!("expected fallback for {key}, got {other:?}"),
    };
    assert_eq!(payload_of("audit"), payload_of("sentiment"));
}

#[tokio::test]
async fn score_sanitizes_template_inputs() {
    let mock = MockTransport::new();
    mock.push_response("audit", Ok(completion_payload(r#"{"audit_status":"Found"}"#)));
    let service = score_service(&mock);

    service
        .score("Ether\teum", "Main\nnet", &["audit".to_string()])
        .await
        .unwrap();

    let call = &mock.calls()[0];
    assert!(call.user_prompt.contains(r#""Ether eum""#));
    assert!(call.user_prompt.contains(r#""Main net""#));
}
