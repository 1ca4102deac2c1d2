//! Control and fault supervision
//!
//! Button debouncing, the system state supervisor and the status LED.
//! Other loops talk to the control loop only through [`Notification`]s;
//! the control loop talks to the render loop only through
//! [`MenuCommand`]s.

mod button;
mod indicator;
mod led;
mod supervisor;

pub use button::{ButtonDebouncer, ButtonPress};
pub use indicator::{BlinkPhase, StatusIndicator};
pub use led::{DualColorLed, LedColor, StatusLed};
pub use supervisor::{Supervisor, SystemState};

use crate::fault::FaultCode;

/// Asynchronous status notification sent to the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notification {
    /// Bring-up finished; the pipeline is running
    StartupComplete,
    /// A loop detected a fault
    FaultRaised(FaultCode),
    /// The fault condition went away
    FaultCleared,
}

/// Menu command sent from the control loop to the render loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuCommand {
    /// Short press: change the value of the current parameter
    ChangeValue,
    /// Long press: commit and move to the next parameter
    NextParameter,
}

impl From<ButtonPress> for MenuCommand {
    fn from(press: ButtonPress) -> Self {
        match press {
            ButtonPress::Short => MenuCommand::ChangeValue,
            ButtonPress::Long => MenuCommand::NextParameter,
        }
    }
}
