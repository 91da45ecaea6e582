//! Projector Tests
//!
//! These tests verify:
//! - Identity probe on open, and its one-shot failure behaviour
//! - Command/argument mapping for power, input, mute, freeze, volume
//! - Payload decoding for lamps, inputs and error status

#[path = "../common/mod.rs"]
mod common;

use pjlink::projector::{
    ErrorStatus, Health, Input, InputKind, LampStatus, MuteState, MuteTarget, PowerState,
    VolumeStep,
};
use pjlink::{Config, PjlinkError, Projector, Session};

use common::{MockProjector, Reply};

// =============================================================================
// Helper Functions
// =============================================================================

/// A well-behaved projector with fixed state
fn device(_: usize, request: &str) -> Reply {
    let head = &request[..6];
    let answer = match request {
        "%1NAME ?" => "Room 101",
        "%1INF1 ?" => "ACME",
        "%1INF2 ?" => "Beamer 3000",
        "%1INFO ?" => "rev B",
        "%1CLSS ?" => "2",
        "%1POWR ?" => "3",
        "%1INPT ?" => "32",
        "%1INST ?" => "11 12 31 32 52",
        "%1AVMT ?" => "21",
        "%2FREZ ?" => "1",
        "%1LAMP ?" => "1234 1 56 0",
        "%1ERST ?" => "001000",
        "%1INPT 59" => "ERR2",
        _ => "OK",
    };
    Reply::Line(format!("{}={}", head, answer))
}

fn input(kind: InputKind, number: u8) -> Input {
    Input::new(kind, number).unwrap()
}

async fn open(mock: &MockProjector) -> Projector {
    Projector::open(Session::new(mock.config())).await
}

// =============================================================================
// Identity Probe Tests
// =============================================================================

#[tokio::test]
async fn test_open_probes_identity_in_order() {
    let mock = MockProjector::spawn("PJLINK 0", device).await;
    let projector = open(&mock).await;

    let identity = projector.identity().expect("identity probed");
    assert_eq!(identity.name, "Room 101");
    assert_eq!(identity.manufacturer, "ACME");
    assert_eq!(identity.product, "Beamer 3000");
    assert_eq!(identity.info, "rev B");
    assert_eq!(identity.class, "2");

    assert_eq!(
        mock.requests(),
        vec!["%1NAME ?", "%1INF1 ?", "%1INF2 ?", "%1INFO ?", "%1CLSS ?"]
    );
}

#[tokio::test]
async fn test_failed_probe_leaves_identity_unset() {
    let mock = MockProjector::spawn("PJLINK 0", |index, request| {
        if request.starts_with("%1INF2") {
            Reply::Line("%1INF2=ERR1".into())
        } else {
            device(index, request)
        }
    })
    .await;

    let config = Config {
        max_retries: 0,
        ..mock.config()
    };
    let projector = Projector::open(Session::new(config)).await;

    assert!(projector.identity().is_none());
    // Probe stops at the first failure
    assert_eq!(mock.requests(), vec!["%1NAME ?", "%1INF1 ?", "%1INF2 ?"]);

    // The handle still works for commands
    projector.power_on().await.unwrap();
}

// =============================================================================
// Command Mapping Tests
// =============================================================================

#[tokio::test]
async fn test_power_commands() {
    let mock = MockProjector::spawn("PJLINK 0", device).await;
    let projector = open(&mock).await;

    projector.power_on().await.unwrap();
    projector.power_off().await.unwrap();
    assert_eq!(projector.power_state().await.unwrap(), PowerState::WarmUp);

    let requests = mock.requests();
    assert_eq!(&requests[5..], ["%1POWR 1", "%1POWR 0", "%1POWR ?"]);
}

#[tokio::test]
async fn test_input_commands() {
    let mock = MockProjector::spawn("PJLINK 0", device).await;
    let projector = open(&mock).await;

    projector
        .set_input(input(InputKind::Digital, 1))
        .await
        .unwrap();
    assert_eq!(
        projector.input().await.unwrap(),
        input(InputKind::Digital, 2)
    );
    assert_eq!(
        projector.inputs().await.unwrap(),
        vec![
            input(InputKind::Rgb, 1),
            input(InputKind::Rgb, 2),
            input(InputKind::Digital, 1),
            input(InputKind::Digital, 2),
            input(InputKind::Network, 2),
        ]
    );
    assert_eq!(mock.requests()[5], "%1INPT 31");
}

#[tokio::test]
async fn test_missing_input_is_distinguished() {
    let mock = MockProjector::spawn("PJLINK 0", device).await;
    let config = Config {
        max_retries: 1,
        ..mock.config()
    };
    let projector = Projector::open(Session::new(config)).await;

    let missing = input(InputKind::Network, 9);
    match projector.set_input(missing).await {
        Err(PjlinkError::InputUnavailable(input)) => assert_eq!(input, missing),
        other => panic!("expected InputUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_mute_freeze_and_volume() {
    let mock = MockProjector::spawn("PJLINK 0", device).await;
    let projector = open(&mock).await;

    projector.set_mute(MuteTarget::AudioVideo, true).await.unwrap();
    projector.set_mute(MuteTarget::Video, false).await.unwrap();
    assert_eq!(
        projector.mute_state().await.unwrap(),
        MuteState { video: false, audio: true }
    );

    projector.set_freeze(true).await.unwrap();
    assert!(projector.freeze_state().await.unwrap());

    projector.speaker_volume(VolumeStep::Up).await.unwrap();
    projector.microphone_volume(VolumeStep::Down).await.unwrap();

    let requests = mock.requests();
    assert_eq!(
        &requests[5..],
        [
            "%1AVMT 31",
            "%1AVMT 10",
            "%1AVMT ?",
            "%2FREZ 1",
            "%2FREZ ?",
            "%2SVOL 1",
            "%2MVOL 0",
        ]
    );
}

#[tokio::test]
async fn test_status_queries() {
    let mock = MockProjector::spawn("PJLINK 0", device).await;
    let projector = open(&mock).await;

    assert_eq!(
        projector.lamps().await.unwrap(),
        vec![
            LampStatus { hours: 1234, lit: true },
            LampStatus { hours: 56, lit: false },
        ]
    );

    let status = projector.error_status().await.unwrap();
    assert_eq!(status.temperature, Health::Warning);
    assert!(!status.is_healthy());
}

// =============================================================================
// Payload Parsing Tests
// =============================================================================

#[test]
fn test_lamp_parsing_rejects_malformed_hours() {
    assert!(LampStatus::parse_list("1234 1").is_ok());
    assert!(LampStatus::parse_list("99999 0").is_ok());

    for bad in ["", "1234", "+12 1", "12a4 1", "123456 1", "1234 2", "1234 1 5"] {
        assert!(
            matches!(
                LampStatus::parse_list(bad),
                Err(PjlinkError::UnexpectedPayload(_))
            ),
            "{:?} should be rejected",
            bad
        );
    }
}

#[test]
fn test_input_codes() {
    assert_eq!(input(InputKind::Rgb, 1).code(), 11);
    assert_eq!(input(InputKind::Internal, 3).code(), 63);
    assert_eq!(Input::from_code(52), Some(input(InputKind::Network, 2)));
    assert_eq!(Input::from_code(10), None);
    assert_eq!(Input::from_code(71), None);
    assert_eq!(input(InputKind::Digital, 1).to_string(), "DIGITAL 1");
}

#[test]
fn test_input_number_out_of_range_is_rejected() {
    for number in [0, 10, 15, 255] {
        assert!(
            matches!(
                Input::new(InputKind::Rgb, number),
                Err(PjlinkError::InvalidCommand(_))
            ),
            "{} should be rejected",
            number
        );
    }
    assert_eq!(input(InputKind::Rgb, 9).code(), 19);
}

#[test]
fn test_mute_codes() {
    assert_eq!(MuteTarget::Video.code(true), 11);
    assert_eq!(MuteTarget::Audio.code(false), 20);
    assert_eq!(MuteTarget::AudioVideo.code(true), 31);
    assert_eq!(
        MuteState::parse("30").unwrap(),
        MuteState { video: false, audio: false }
    );
    assert!(MuteState::parse("40").is_err());
}

#[test]
fn test_power_and_error_status_parsing() {
    assert_eq!(PowerState::parse("0").unwrap(), PowerState::Off);
    assert_eq!(PowerState::parse("2").unwrap(), PowerState::Cooling);
    assert!(PowerState::parse("ERR3").is_err());

    let status = ErrorStatus::parse("000000").unwrap();
    assert!(status.is_healthy());
    assert_eq!(ErrorStatus::parse("200000").unwrap().fan, Health::Error);
    assert!(ErrorStatus::parse("00000").is_err());
    assert!(ErrorStatus::parse("00000x").is_err());
}
