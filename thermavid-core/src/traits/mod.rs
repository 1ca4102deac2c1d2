//! Collaborator traits
//!
//! The runtime consumes the sensor link and the video generator through
//! these traits. Board crates implement them on top of their drivers;
//! tests implement them with scripted fakes.

mod sensor;
mod video;

pub use sensor::{emissivity_to_sensor_scale, SensorError, SensorErrorKind, SensorInfo, SensorLink};
pub use video::{PixelFormat, VideoOutput, VideoStandard};
