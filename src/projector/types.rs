//! Projector value types
//!
//! Typed views of the argument and payload encodings used by the common
//! commands.

use std::fmt;

use crate::error::{PjlinkError, Result};

/// POWR status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Off,
    On,
    Cooling,
    WarmUp,
}

impl PowerState {
    pub fn parse(payload: &str) -> Result<Self> {
        match payload.trim() {
            "0" => Ok(PowerState::Off),
            "1" => Ok(PowerState::On),
            "2" => Ok(PowerState::Cooling),
            "3" => Ok(PowerState::WarmUp),
            other => Err(PjlinkError::UnexpectedPayload(other.to_string())),
        }
    }
}

/// Input terminal family, the tens digit of an input code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Rgb = 1,
    Video = 2,
    Digital = 3,
    Storage = 4,
    Network = 5,
    Internal = 6,
}

impl InputKind {
    fn from_digit(digit: u32) -> Option<Self> {
        match digit {
            1 => Some(InputKind::Rgb),
            2 => Some(InputKind::Video),
            3 => Some(InputKind::Digital),
            4 => Some(InputKind::Storage),
            5 => Some(InputKind::Network),
            6 => Some(InputKind::Internal),
            _ => None,
        }
    }
}

/// Highest input number within one kind; the INPT argument has one digit for it
pub const MAX_INPUT_NUMBER: u8 = 9;

/// An input terminal: kind plus 1-based number within that kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Input {
    kind: InputKind,
    number: u8,
}

impl Input {
    /// Fails with `InvalidCommand` unless `number` is in `1..=9`
    pub fn new(kind: InputKind, number: u8) -> Result<Self> {
        if !(1..=MAX_INPUT_NUMBER).contains(&number) {
            return Err(PjlinkError::InvalidCommand(format!(
                "input number {} out of range 1-{}",
                number, MAX_INPUT_NUMBER
            )));
        }
        Ok(Self { kind, number })
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    /// Two-digit INPT argument, e.g. `31` for the first digital input
    pub fn code(&self) -> u32 {
        self.kind as u32 * 10 + u32::from(self.number)
    }

    pub fn from_code(code: u32) -> Option<Self> {
        let kind = InputKind::from_digit(code / 10)?;
        let number = (code % 10) as u8;
        if number == 0 {
            return None;
        }
        Some(Self { kind, number })
    }

    pub fn parse(payload: &str) -> Result<Self> {
        payload
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::from_code)
            .ok_or_else(|| PjlinkError::UnexpectedPayload(payload.to_string()))
    }

    /// Parse the space-separated INST list
    pub fn parse_list(payload: &str) -> Result<Vec<Self>> {
        payload.split_whitespace().map(Self::parse).collect()
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            InputKind::Rgb => "RGB",
            InputKind::Video => "VIDEO",
            InputKind::Digital => "DIGITAL",
            InputKind::Storage => "STORAGE",
            InputKind::Network => "NETWORK",
            InputKind::Internal => "INTERNAL",
        };
        write!(f, "{} {}", kind, self.number)
    }
}

/// What AVMT mutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteTarget {
    Video,
    Audio,
    AudioVideo,
}

impl MuteTarget {
    /// AVMT argument: tens digit selects the target, units digit on/off
    pub fn code(self, muted: bool) -> u32 {
        let base = match self {
            MuteTarget::Video => 10,
            MuteTarget::Audio => 20,
            MuteTarget::AudioVideo => 30,
        };
        base + u32::from(muted)
    }
}

/// Current AVMT state
///
/// The device reports one combined state, not a per-target history: any of
/// `10`, `20` or `30` means nothing is muted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuteState {
    pub video: bool,
    pub audio: bool,
}

impl MuteState {
    pub fn parse(payload: &str) -> Result<Self> {
        let state = match payload.trim() {
            "11" => MuteState { video: true, audio: false },
            "21" => MuteState { video: false, audio: true },
            "31" => MuteState { video: true, audio: true },
            "10" | "20" | "30" => MuteState { video: false, audio: false },
            other => return Err(PjlinkError::UnexpectedPayload(other.to_string())),
        };
        Ok(state)
    }
}

/// SVOL / MVOL direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeStep {
    Down = 0,
    Up = 1,
}

/// One lamp from a LAMP response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LampStatus {
    pub hours: u32,
    pub lit: bool,
}

/// Longest lamp-hours field the protocol allows
const MAX_LAMP_HOUR_DIGITS: usize = 5;

impl LampStatus {
    /// Parse `"<hours> <0|1>"` pairs, one per lamp
    ///
    /// Hours must be plain decimal digits; anything a lenient integer parse
    /// would accept (signs, truncated fields) is rejected.
    pub fn parse_list(payload: &str) -> Result<Vec<Self>> {
        let malformed = || PjlinkError::UnexpectedPayload(payload.to_string());
        let fields: Vec<&str> = payload.split_whitespace().collect();

        if fields.is_empty() || fields.len() % 2 != 0 {
            return Err(malformed());
        }

        fields
            .chunks(2)
            .map(|pair| {
                let (hours, lit) = (pair[0], pair[1]);
                if hours.is_empty()
                    || hours.len() > MAX_LAMP_HOUR_DIGITS
                    || !hours.bytes().all(|b| b.is_ascii_digit())
                {
                    return Err(malformed());
                }
                let hours = hours.parse::<u32>().map_err(|_| malformed())?;
                let lit = match lit {
                    "0" => false,
                    "1" => true,
                    _ => return Err(malformed()),
                };
                Ok(LampStatus { hours, lit })
            })
            .collect()
    }
}

/// Severity reported per ERST field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Ok,
    Warning,
    Error,
}

impl Health {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'0' => Some(Health::Ok),
            b'1' => Some(Health::Warning),
            b'2' => Some(Health::Error),
            _ => None,
        }
    }
}

/// ERST: six health digits in fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorStatus {
    pub fan: Health,
    pub lamp: Health,
    pub temperature: Health,
    pub cover: Health,
    pub filter: Health,
    pub other: Health,
}

impl ErrorStatus {
    pub fn parse(payload: &str) -> Result<Self> {
        let malformed = || PjlinkError::UnexpectedPayload(payload.to_string());
        let digits = payload.trim().as_bytes();
        if digits.len() != 6 {
            return Err(malformed());
        }

        let field = |i: usize| Health::from_byte(digits[i]).ok_or_else(malformed);
        Ok(ErrorStatus {
            fan: field(0)?,
            lamp: field(1)?,
            temperature: field(2)?,
            cover: field(3)?,
            filter: field(4)?,
            other: field(5)?,
        })
    }

    pub fn is_healthy(&self) -> bool {
        [self.fan, self.lamp, self.temperature, self.cover, self.filter, self.other]
            .iter()
            .all(|h| *h == Health::Ok)
    }
}

/// Identity gathered once when a projector handle is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// NAME
    pub name: String,
    /// INF1
    pub manufacturer: String,
    /// INF2
    pub product: String,
    /// INFO
    pub info: String,
    /// CLSS
    pub class: String,
}
