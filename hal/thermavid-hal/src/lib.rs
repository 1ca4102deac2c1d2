//! Thermavid Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the camera runtime consumes.
//! Board crates implement them on top of their chip HAL so the
//! acquisition, render and control loops stay board-agnostic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  thermavid-runtime / thermavid-core     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  thermavid-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │ thermavid-hal-  │
//!            │     rp2040      │
//!            └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O (LED, button, reset, format select)
//! - [`flash::FlashStorage`] - Persistent key-value storage for camera parameters

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use flash::{FlashError, FlashStorage, StorageKey};
pub use gpio::{InputPin, OutputPin};
