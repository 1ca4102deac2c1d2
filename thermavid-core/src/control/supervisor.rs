//! System state supervisor
//!
//! Tracks startup, running and fault states and chooses what the status
//! LED shows. A fault preempts whatever state was active and remembers
//! it, so clearing the fault restores the previous state.

use crate::config::ControlConfig;
use crate::fault::FaultCode;

use super::indicator::StatusIndicator;
use super::led::LedColor;
use super::Notification;

/// System states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemState {
    /// Bringing up peripherals and buffers
    Startup,
    /// Pipeline running
    Running,
    /// A fault is being reported
    Fault,
}

impl SystemState {
    /// Solid LED color for non-fault states
    pub fn color(self) -> LedColor {
        match self {
            SystemState::Startup => LedColor::Yellow,
            SystemState::Running => LedColor::Green,
            SystemState::Fault => StatusIndicator::FAULT_COLOR,
        }
    }
}

/// Fault supervisor
#[derive(Debug, Clone)]
pub struct Supervisor {
    state: SystemState,
    /// State to return to when the fault clears
    restore: SystemState,
    fault: FaultCode,
    indicator: StatusIndicator,
}

impl Supervisor {
    /// Start in `Startup` with the initializing color
    pub fn new(config: &ControlConfig) -> Self {
        let mut indicator = StatusIndicator::new(config);
        indicator.solid(SystemState::Startup.color());
        Self {
            state: SystemState::Startup,
            restore: SystemState::Startup,
            fault: FaultCode::None,
            indicator,
        }
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    /// Active fault code (`FaultCode::None` when not faulted)
    pub fn fault(&self) -> FaultCode {
        self.fault
    }

    /// LED color right now
    pub fn color(&self) -> LedColor {
        self.indicator.color()
    }

    /// Button events reach the menu only while running
    pub fn forwards_buttons(&self) -> bool {
        self.state == SystemState::Running
    }

    /// Apply a notification; returns the new LED color when it changed
    pub fn handle(&mut self, notification: Notification) -> Option<LedColor> {
        let before = self.indicator.color();

        match notification {
            Notification::StartupComplete => {
                if self.state == SystemState::Fault {
                    // Resume running once the pending fault clears
                    self.restore = SystemState::Running;
                } else {
                    self.enter(SystemState::Running);
                }
            }
            Notification::FaultRaised(code) if code.is_fault() => {
                if self.state != SystemState::Fault {
                    self.restore = self.state;
                }
                warn!("Fault raised: {:?} (blinks {})", code, code.blink_count());
                self.fault = code;
                self.state = SystemState::Fault;
                self.indicator.blink(code);
            }
            Notification::FaultRaised(_) => {}
            Notification::FaultCleared => {
                if self.state == SystemState::Fault {
                    info!("Fault {:?} cleared", self.fault);
                    self.fault = FaultCode::None;
                    let restore = self.restore;
                    self.enter(restore);
                }
            }
        }

        let after = self.indicator.color();
        (after != before).then_some(after)
    }

    /// Advance the indicator; returns the new LED color when it changed
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<LedColor> {
        self.indicator.tick(elapsed_ms)
    }

    fn enter(&mut self, state: SystemState) {
        if self.state != state {
            info!("System {:?} -> {:?}", self.state, state);
        }
        self.state = state;
        self.indicator.solid(state.color());
    }
}
