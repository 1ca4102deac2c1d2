//! Thermavid runtime
//!
//! The owning context of the camera pipeline. It wires three cooperating
//! loops through explicit channels and runs them side by side:
//!
//! ```text
//!  ┌─────────────┐  FrameExchange   ┌─────────────┐  frame_buffer  ┌───────┐
//!  │ Acquisition │ ───────────────▶ │   Render    │ ─────────────▶ │ Video │
//!  │    loop     │ ◀── emissivity ─ │    loop     │                └───────┘
//!  └─────┬───────┘                  └──────▲──────┘
//!        │ notifications                   │ menu commands
//!        ▼                                 │
//!  ┌─────────────────────────────────────────────┐
//!  │ Control loop (button, supervisor, LED)       │
//!  └─────────────────────────────────────────────┘
//! ```
//!
//! A board brings the pipeline up with [`startup::bring_up`], builds the
//! three tasks from its collaborators and hands them to [`run`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod channels;
pub mod startup;
pub mod tasks;

pub use channels::Channels;
pub use startup::{halt, RenderBuffers, Resources, StartupError};
pub use tasks::{AcquisitionTask, ControlTask, RenderTask};

use embassy_futures::join::join3;
use embedded_hal_async::delay::DelayNs;

use thermavid_core::control::StatusLed;
use thermavid_core::traits::{SensorLink, VideoOutput};
use thermavid_hal::{FlashStorage, InputPin};

/// Run the three loops concurrently; never returns
pub async fn run<S, V, F, B, L, DA, DR, DC>(
    acquisition: AcquisitionTask<S, DA>,
    render: RenderTask<V, F, DR>,
    control: ControlTask<B, L, DC>,
) -> !
where
    S: SensorLink,
    V: VideoOutput,
    F: FlashStorage,
    B: InputPin,
    L: StatusLed,
    DA: DelayNs,
    DR: DelayNs,
    DC: DelayNs,
{
    let (never, _, _) = join3(control.run(), render.run(), acquisition.run()).await;
    never
}
