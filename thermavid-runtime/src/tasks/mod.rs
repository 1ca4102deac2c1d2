//! The three pipeline loops
//!
//! Each task owns its collaborators and state, talks to the others only
//! through [`Channels`](crate::Channels), and exposes a single-iteration
//! method (`step`, `poll`, `tick`) next to its endless `run` loop.

pub mod acquisition;
pub mod control;
pub mod render;

pub use acquisition::AcquisitionTask;
pub use control::ControlTask;
pub use render::RenderTask;
