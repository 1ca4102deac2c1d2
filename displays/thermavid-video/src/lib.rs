//! Frame reconstruction and overlay compositing
//!
//! Turns a 160x120 raw sensor frame into a 320x240 8-bit display frame:
//!
//! - [`upscale`] - normalization plus pixel duplication or weighted interpolation
//! - [`overlay`] - spotmeter box and temperature, min/max markers, menu label
//! - [`temperature`] - fixed-point Kelvin to Celsius/Fahrenheit
//! - [`gui`] - per-frame display flags derived from parameters and telemetry
//! - [`compositor`] - runs the whole pipeline into a [`DisplayFrame`]
//! - [`pattern`] - startup test card shown before the first sensor frame
//!
//! Drawing goes through `embedded-graphics`, so the overlays work on any
//! `DrawTarget<Color = Gray8>`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod canvas;
pub mod compositor;
pub mod gui;
pub mod overlay;
pub mod pattern;
pub mod temperature;
pub mod upscale;

pub use canvas::{DisplayFrame, DISPLAY_HEIGHT, DISPLAY_PIXELS, DISPLAY_WIDTH, SCALE};
pub use compositor::Compositor;
pub use gui::GuiState;
