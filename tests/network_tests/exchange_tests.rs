//! Exchange Tests
//!
//! These tests verify, against a mock projector on localhost:
//! - Greeting handling with and without a challenge
//! - Retry on rejection, malformed answers, silence and close failures
//! - Retry exhaustion after exactly six attempts
//! - Transport error policy

#[path = "../common/mod.rs"]
mod common;

use std::time::{Duration, Instant};

use pjlink::auth;
use pjlink::network::Exchange;
use pjlink::protocol::{CommandCode, CommandSpec, DeviceError, Outcome};
use pjlink::{AttemptError, Config, PjlinkError, TransportErrorPolicy};

use common::{closed_port, test_config, MockProjector, Reply};

async fn run(config: &Config, spec: CommandSpec) -> pjlink::Result<Outcome> {
    Exchange::new(config, spec).run().await
}

fn expect_exhausted(result: pjlink::Result<Outcome>) -> (u32, AttemptError) {
    match result {
        Err(PjlinkError::RetryExhausted { attempts, last }) => (attempts, last),
        other => panic!("expected retry exhaustion, got {:?}", other),
    }
}

// =============================================================================
// Success Paths
// =============================================================================

#[tokio::test]
async fn test_set_command_acknowledged_first_try() {
    let mock = MockProjector::always(Reply::Line("%1POWR=OK".into())).await;

    let outcome = run(&mock.config(), CommandSpec::set(CommandCode::POWR, 1))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Ack);
    assert_eq!(mock.connections(), 1);
    assert_eq!(mock.requests(), vec!["%1POWR 1".to_string()]);
}

#[tokio::test]
async fn test_query_returns_payload() {
    let mock = MockProjector::always(Reply::Line("%1LAMP=1234 1".into())).await;

    let outcome = run(&mock.config(), CommandSpec::query(CommandCode::LAMP))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Payload("1234 1".to_string()));
    assert_eq!(mock.requests(), vec!["%1LAMP ?".to_string()]);
}

#[tokio::test]
async fn test_class2_command_framed_with_second_tag() {
    let mock = MockProjector::always(Reply::Line("%2FREZ=OK".into())).await;

    run(&mock.config(), CommandSpec::set(CommandCode::FREZ, 1))
        .await
        .unwrap();

    assert_eq!(mock.requests(), vec!["%2FREZ 1".to_string()]);
}

#[tokio::test]
async fn test_authenticated_exchange() {
    let expected_digest = auth::digest("12345678", "panasonic");
    let mock = MockProjector::spawn("PJLINK 1 12345678", move |_, request| {
        if request.starts_with(&expected_digest) {
            Reply::Line("%1POWR=OK".into())
        } else {
            Reply::Line("PJLINK ERRA".into())
        }
    })
    .await;

    let config = Config::builder()
        .port(mock.port)
        .password("panasonic")
        .response_timeout_ms(150)
        .close_grace_ms(50)
        .build();

    let outcome = run(&config, CommandSpec::set(CommandCode::POWR, 1))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Ack);
    let request = &mock.requests()[0];
    assert_eq!(
        request,
        &format!("{}%1POWR 1", auth::digest("12345678", "panasonic"))
    );
}

#[tokio::test]
async fn test_wrong_password_retries_then_fails() {
    let mock = MockProjector::spawn("PJLINK 1 abcdefgh", |_, _| {
        Reply::Line("PJLINK ERRA".into())
    })
    .await;

    let config = Config::builder()
        .port(mock.port)
        .password("wrong")
        .response_timeout_ms(150)
        .close_grace_ms(50)
        .build();

    let (attempts, last) = expect_exhausted(run(&config, CommandSpec::query(CommandCode::POWR)).await);
    assert_eq!(attempts, 6);
    assert!(matches!(last, AttemptError::Malformed));
    assert_eq!(mock.connections(), 6);
}

#[tokio::test]
async fn test_response_without_greeting_is_parsed_directly() {
    let mock = MockProjector::spawn("", |_, _| Reply::Line("%1POWR=OK".into())).await;

    let outcome = run(&mock.config(), CommandSpec::set(CommandCode::POWR, 0))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Ack);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_recovers_after_transient_rejections() {
    let mock = MockProjector::spawn("PJLINK 0", |index, _| {
        if index < 2 {
            Reply::Line("%1POWR=ERR3".into())
        } else {
            Reply::Line("%1POWR=OK".into())
        }
    })
    .await;

    let outcome = run(&mock.config(), CommandSpec::set(CommandCode::POWR, 1))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Ack);
    assert_eq!(mock.connections(), 3);
}

// =============================================================================
// Exhaustion Paths
// =============================================================================

#[tokio::test]
async fn test_repeated_rejection_fails_after_six_attempts() {
    let mock = MockProjector::always(Reply::Line("%1POWR=ERR2".into())).await;

    let result = run(&mock.config(), CommandSpec::set(CommandCode::POWR, 1)).await;
    let (attempts, last) = expect_exhausted(result);

    assert_eq!(attempts, 6);
    assert_eq!(mock.connections(), 6);
    assert!(last.to_string().contains("ERR2"));
    assert_eq!(last.to_string(), "Projector returned error: ERR2");
    assert_eq!(last.device_error(), Some(DeviceError::OutOfParameter));
}

#[tokio::test]
async fn test_malformed_answer_fails_after_six_attempts() {
    let mock = MockProjector::always(Reply::Line("%1INPT=OK".into())).await;

    let result = run(&mock.config(), CommandSpec::set(CommandCode::POWR, 1)).await;
    let (attempts, last) = expect_exhausted(result);

    assert_eq!(attempts, 6);
    assert_eq!(last.to_string(), "Unexpected answer from projector");
}

#[tokio::test]
async fn test_silent_projector_times_out_each_attempt() {
    let mock = MockProjector::spawn("", |_, _| Reply::Silent).await;
    let config = mock.config();

    let started = Instant::now();
    let result = run(&config, CommandSpec::query(CommandCode::POWR)).await;
    let elapsed = started.elapsed();

    let (attempts, last) = expect_exhausted(result);
    assert_eq!(attempts, 6);
    assert_eq!(last.to_string(), "Failed command to projector");
    assert_eq!(mock.connections(), 6);
    assert!(elapsed >= config.response_timeout() * 6);
}

#[tokio::test]
async fn test_unconfirmed_close_counts_as_failure() {
    let mock = MockProjector::always(Reply::LineAndHold("%1POWR=OK".into())).await;

    let result = run(&mock.config(), CommandSpec::set(CommandCode::POWR, 1)).await;
    let (attempts, last) = expect_exhausted(result);

    assert_eq!(attempts, 6);
    assert!(matches!(last, AttemptError::CloseFailed));
    assert_eq!(mock.connections(), 6);
}

#[tokio::test]
async fn test_zero_retries_makes_one_attempt() {
    let mock = MockProjector::always(Reply::Line("%1POWR=ERR4".into())).await;
    let config = Config {
        max_retries: 0,
        ..mock.config()
    };

    let (attempts, _) = expect_exhausted(run(&config, CommandSpec::set(CommandCode::POWR, 1)).await);
    assert_eq!(attempts, 1);
    assert_eq!(mock.connections(), 1);
}

// =============================================================================
// Transport Error Policy
// =============================================================================

#[tokio::test]
async fn test_refused_connection_is_governed_by_timer() {
    let port = closed_port().await;
    let config = Config {
        max_retries: 1,
        ..test_config(port)
    };

    let started = Instant::now();
    let (attempts, last) =
        expect_exhausted(run(&config, CommandSpec::query(CommandCode::POWR)).await);

    assert_eq!(attempts, 2);
    assert!(matches!(last, AttemptError::Timeout));
    assert!(started.elapsed() >= config.response_timeout() * 2);
}

#[tokio::test]
async fn test_fail_attempt_policy_surfaces_transport_error() {
    let port = closed_port().await;
    let config = Config {
        max_retries: 1,
        transport_errors: TransportErrorPolicy::FailAttempt,
        response_timeout_ms: 5_000,
        ..test_config(port)
    };

    let started = Instant::now();
    let (attempts, last) =
        expect_exhausted(run(&config, CommandSpec::query(CommandCode::POWR)).await);

    assert_eq!(attempts, 2);
    assert!(matches!(last, AttemptError::Transport(_)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_early_close_waits_for_timer_by_default() {
    let mock = MockProjector::always(Reply::Close).await;
    let config = Config {
        max_retries: 0,
        ..mock.config()
    };

    let (_, last) = expect_exhausted(run(&config, CommandSpec::set(CommandCode::POWR, 1)).await);
    assert!(matches!(last, AttemptError::Timeout));
}

#[tokio::test]
async fn test_reset_peer_still_reports_timeout() {
    let mock = MockProjector::always(Reply::Reset).await;
    let config = Config {
        max_retries: 0,
        ..mock.config()
    };

    let (attempts, last) =
        expect_exhausted(run(&config, CommandSpec::set(CommandCode::POWR, 1)).await);
    assert_eq!(attempts, 1);
    assert!(matches!(last, AttemptError::Timeout), "got {:?}", last);
    assert_eq!(last.to_string(), "Failed command to projector");
}

#[tokio::test]
async fn test_reset_peer_retries_on_timeout() {
    let mock = MockProjector::spawn("PJLINK 0", |index, _| {
        if index == 0 {
            Reply::Reset
        } else {
            Reply::Line("%1POWR=OK".into())
        }
    })
    .await;

    let outcome = run(&mock.config(), CommandSpec::set(CommandCode::POWR, 1))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Ack);
    assert_eq!(mock.connections(), 2);
}

#[tokio::test]
async fn test_early_close_fails_attempt_under_fail_policy() {
    let mock = MockProjector::always(Reply::Close).await;
    let config = Config {
        max_retries: 0,
        transport_errors: TransportErrorPolicy::FailAttempt,
        ..mock.config()
    };

    let (_, last) = expect_exhausted(run(&config, CommandSpec::set(CommandCode::POWR, 1)).await);
    match last {
        AttemptError::Transport(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_answer_is_malformed() {
    let mock = MockProjector::always(Reply::Line(String::new())).await;
    let config = Config {
        max_retries: 0,
        ..mock.config()
    };

    let (_, last) = expect_exhausted(run(&config, CommandSpec::set(CommandCode::POWR, 1)).await);
    assert!(matches!(last, AttemptError::Malformed));
}
