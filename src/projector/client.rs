//! Projector handle
//!
//! Maps common actions onto command codes and arguments, then decodes the
//! results. Every call is one logical command through [`Session`].

use crate::error::{PjlinkError, Result};
use crate::protocol::{CommandCode, DeviceError};
use crate::session::Session;

use super::types::{
    ErrorStatus, Identity, Input, LampStatus, MuteState, MuteTarget, PowerState, VolumeStep,
};

/// A projector with its identity probed at open
#[derive(Debug, Clone)]
pub struct Projector {
    session: Session,

    /// `None` if any probe query failed
    identity: Option<Identity>,
}

impl Projector {
    /// Open a handle and run the identity probe once
    ///
    /// Never fails; a failed probe is logged and not retried as a chain.
    pub async fn open(session: Session) -> Self {
        let identity = match probe_identity(&session).await {
            Ok(identity) => {
                tracing::info!(
                    "Projector {} identified as {} {} ({})",
                    session.config().host,
                    identity.manufacturer,
                    identity.product,
                    identity.name
                );
                Some(identity)
            }
            Err(e) => {
                tracing::warn!(
                    "Identity probe of {} failed: {}",
                    session.config().host,
                    e
                );
                None
            }
        };

        Self { session, identity }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    // =========================================================================
    // Power
    // =========================================================================

    pub async fn power_on(&self) -> Result<()> {
        self.session.set(CommandCode::POWR, 1).await
    }

    pub async fn power_off(&self) -> Result<()> {
        self.session.set(CommandCode::POWR, 0).await
    }

    pub async fn power_state(&self) -> Result<PowerState> {
        PowerState::parse(&self.session.query(CommandCode::POWR).await?)
    }

    // =========================================================================
    // Inputs
    // =========================================================================

    /// Switch input; a device answering ERR2 means the input does not exist
    pub async fn set_input(&self, input: Input) -> Result<()> {
        match self.session.set(CommandCode::INPT, input.code()).await {
            Err(e) if e.device_error() == Some(DeviceError::OutOfParameter) => {
                Err(PjlinkError::InputUnavailable(input))
            }
            other => other,
        }
    }

    pub async fn input(&self) -> Result<Input> {
        Input::parse(&self.session.query(CommandCode::INPT).await?)
    }

    pub async fn inputs(&self) -> Result<Vec<Input>> {
        Input::parse_list(&self.session.query(CommandCode::INST).await?)
    }

    // =========================================================================
    // Mute / Freeze / Volume
    // =========================================================================

    pub async fn set_mute(&self, target: MuteTarget, muted: bool) -> Result<()> {
        self.session.set(CommandCode::AVMT, target.code(muted)).await
    }

    pub async fn mute_state(&self) -> Result<MuteState> {
        MuteState::parse(&self.session.query(CommandCode::AVMT).await?)
    }

    pub async fn set_freeze(&self, frozen: bool) -> Result<()> {
        self.session.set(CommandCode::FREZ, u32::from(frozen)).await
    }

    pub async fn freeze_state(&self) -> Result<bool> {
        let payload = self.session.query(CommandCode::FREZ).await?;
        match payload.trim() {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(PjlinkError::UnexpectedPayload(payload)),
        }
    }

    pub async fn speaker_volume(&self, step: VolumeStep) -> Result<()> {
        self.session.set(CommandCode::SVOL, step as u32).await
    }

    pub async fn microphone_volume(&self, step: VolumeStep) -> Result<()> {
        self.session.set(CommandCode::MVOL, step as u32).await
    }

    // =========================================================================
    // Status
    // =========================================================================

    pub async fn lamps(&self) -> Result<Vec<LampStatus>> {
        LampStatus::parse_list(&self.session.query(CommandCode::LAMP).await?)
    }

    pub async fn error_status(&self) -> Result<ErrorStatus> {
        ErrorStatus::parse(&self.session.query(CommandCode::ERST).await?)
    }
}

/// NAME, INF1, INF2, INFO, CLSS in order; stops at the first failure
async fn probe_identity(session: &Session) -> Result<Identity> {
    let name = session.query(CommandCode::NAME).await?;
    let manufacturer = session.query(CommandCode::INF1).await?;
    let product = session.query(CommandCode::INF2).await?;
    let info = session.query(CommandCode::INFO).await?;
    let class = session.query(CommandCode::CLSS).await?;

    Ok(Identity {
        name,
        manufacturer,
        product,
        info,
        class,
    })
}
