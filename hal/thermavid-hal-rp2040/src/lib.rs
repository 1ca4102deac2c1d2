//! RP2350 board adapter
//!
//! Implements the `thermavid-hal` traits on embassy-rp peripherals:
//!
//! - GPIO wrappers for the button, video-standard strap and status LED
//! - Flash-backed parameter storage (implements `thermavid_hal::FlashStorage`)
//!
//! The sensor link and video generator are board-specific drivers that
//! implement `thermavid_core::traits` directly.

#![no_std]

pub mod flash;
pub mod gpio;

pub use flash::RpFlashStorage;
pub use gpio::{sense_video_standard, RpInput, RpOutput};
