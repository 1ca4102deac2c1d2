//! Board-agnostic core logic for the thermal camera runtime
//!
//! This crate contains all camera logic that does not depend on a
//! particular board, sensor driver or video generator:
//!
//! - Raw sensor frame model and the ping-pong frame exchange
//! - Acquisition state machine (resync, reset and cooldown ladder)
//! - Persisted parameter set and the button-driven parameter editor
//! - Button debouncing, status indicator and fault supervisor
//! - Collaborator traits for the sensor link and video output
//! - Timing configuration

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod acquisition;
pub mod config;
pub mod control;
pub mod editor;
pub mod fault;
pub mod frame;
pub mod params;
pub mod traits;

pub use config::CameraConfig;
pub use fault::FaultCode;
