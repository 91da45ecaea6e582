//! Projector Module
//!
//! Convenience operations over [`Session`](crate::Session): power, input
//! selection, mute, freeze, volume, lamp hours and error status, plus the
//! identity probe run when a [`Projector`] is opened.

mod client;
mod types;

pub use client::Projector;
pub use types::{
    ErrorStatus, Health, Identity, Input, InputKind, LampStatus, MuteState, MuteTarget,
    PowerState, VolumeStep, MAX_INPUT_NUMBER,
};
