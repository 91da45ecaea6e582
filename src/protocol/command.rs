//! Command definitions
//!
//! A request is a 4-character command code plus an argument. The code decides
//! which protocol class tag (`%1` or `%2`) frames the request.

use std::fmt;

use crate::error::{PjlinkError, Result};

/// Argument text sent for a query
pub const QUERY_MARKER: &str = "?";

/// Protocol class tag prefixed to every request and response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionTag {
    /// `%1`
    Class1,
    /// `%2`
    Class2,
}

impl VersionTag {
    /// Wire bytes of the tag
    pub const fn as_bytes(self) -> &'static [u8; 2] {
        match self {
            VersionTag::Class1 => b"%1",
            VersionTag::Class2 => b"%2",
        }
    }
}

/// A 4-character uppercase command code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandCode([u8; 4]);

impl CommandCode {
    // Class 1
    pub const POWR: Self = Self(*b"POWR");
    pub const INPT: Self = Self(*b"INPT");
    pub const AVMT: Self = Self(*b"AVMT");
    pub const ERST: Self = Self(*b"ERST");
    pub const LAMP: Self = Self(*b"LAMP");
    pub const INST: Self = Self(*b"INST");
    pub const NAME: Self = Self(*b"NAME");
    pub const INF1: Self = Self(*b"INF1");
    pub const INF2: Self = Self(*b"INF2");
    pub const INFO: Self = Self(*b"INFO");
    pub const CLSS: Self = Self(*b"CLSS");

    // Class 2
    pub const SNUM: Self = Self(*b"SNUM");
    pub const SVER: Self = Self(*b"SVER");
    pub const INNM: Self = Self(*b"INNM");
    pub const IRES: Self = Self(*b"IRES");
    pub const RRES: Self = Self(*b"RRES");
    pub const FILT: Self = Self(*b"FILT");
    pub const RLMP: Self = Self(*b"RLMP");
    pub const RFIL: Self = Self(*b"RFIL");
    pub const SVOL: Self = Self(*b"SVOL");
    pub const MVOL: Self = Self(*b"MVOL");
    pub const FREZ: Self = Self(*b"FREZ");

    /// Parse a code such as `"POWR"`. Must be 4 ASCII uppercase letters or digits.
    pub fn parse(code: &str) -> Result<Self> {
        let bytes: [u8; 4] = code
            .as_bytes()
            .try_into()
            .map_err(|_| PjlinkError::InvalidCommand(format!("{:?} is not 4 characters", code)))?;

        if !bytes
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(PjlinkError::InvalidCommand(format!(
                "{:?} must be uppercase ASCII letters or digits",
                code
            )));
        }

        Ok(Self(bytes))
    }

    /// Wire bytes of the code
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Code as text
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Tag used for every request carrying this code
    pub fn version_tag(self) -> VersionTag {
        if CLASS2_COMMANDS.contains(&self) {
            VersionTag::Class2
        } else {
            VersionTag::Class1
        }
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commands framed with the `%2` tag
pub const CLASS2_COMMANDS: [CommandCode; 11] = [
    CommandCode::SNUM,
    CommandCode::SVER,
    CommandCode::INNM,
    CommandCode::IRES,
    CommandCode::RRES,
    CommandCode::FILT,
    CommandCode::RLMP,
    CommandCode::RFIL,
    CommandCode::SVOL,
    CommandCode::MVOL,
    CommandCode::FREZ,
];

/// Request argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    /// Set a value, rendered in decimal
    Set(u32),

    /// Ask for the current value (`?`)
    Query,
}

impl Argument {
    pub fn is_query(&self) -> bool {
        matches!(self, Argument::Query)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Set(value) => write!(f, "{}", value),
            Argument::Query => f.write_str(QUERY_MARKER),
        }
    }
}

/// A complete logical command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub code: CommandCode,
    pub argument: Argument,
}

impl CommandSpec {
    pub fn new(code: CommandCode, argument: Argument) -> Self {
        Self { code, argument }
    }

    /// Set-style command
    pub fn set(code: CommandCode, value: u32) -> Self {
        Self::new(code, Argument::Set(value))
    }

    /// Query-style command
    pub fn query(code: CommandCode) -> Self {
        Self::new(code, Argument::Query)
    }

    pub fn version_tag(&self) -> VersionTag {
        self.code.version_tag()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.argument)
    }
}
