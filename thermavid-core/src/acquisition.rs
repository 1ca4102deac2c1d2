//! Acquisition state machine
//!
//! Pure bookkeeping for the sensor acquisition loop. The loop performs the
//! I/O (waiting for frames, resetting the sensor, sleeping) and reports
//! each outcome here; the machine answers with the next state, how long to
//! pause and whether a fault must be raised or cleared.
//!
//! ```text
//!  Init ──ok──▶ Run ◀──ok── ReInit ◀── Error (cooldown elapsed)
//!   │            │            ▲ │          ▲
//!   │            └─sync fault─┘ └──fail────┤
//!   └────────────────fail──────────────────┘
//!                Run ──sync fault after a reset──▶ Error
//! ```
//!
//! A sync fault is escalated only after `sync_fault_limit` resync pauses
//! without a good frame. The first escalation since the last good frame
//! tries a hardware reset; a second one goes straight to the cooldown.

use crate::config::AcquisitionConfig;
use crate::fault::FaultCode;
use crate::traits::SensorErrorKind;

/// Acquisition states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcqState {
    /// First sensor initialization after power-on
    Init,
    /// Streaming frames
    Run,
    /// Hardware reset followed by re-initialization
    ReInit,
    /// Waiting out the retry cooldown
    Error,
}

/// Fault change requested by a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultUpdate {
    Raise(FaultCode),
    Clear,
}

/// Result of one reported outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    /// Fault to raise or clear, if any
    pub fault: Option<FaultUpdate>,
    /// Time to idle before the next action
    pub pause_ms: u32,
}

impl Step {
    const fn pause(pause_ms: u32) -> Self {
        Self {
            fault: None,
            pause_ms,
        }
    }

    const fn fault(update: FaultUpdate, pause_ms: u32) -> Self {
        Self {
            fault: Some(update),
            pause_ms,
        }
    }
}

/// Acquisition state machine
#[derive(Debug, Clone)]
pub struct AcquisitionMachine {
    config: AcquisitionConfig,
    state: AcqState,
    /// Frame-ready waits since the last good frame or resync
    missed_frames: u16,
    /// Resync pauses since the last good frame
    resyncs: u8,
    /// A sync-fault reset has already been tried since the last good frame
    reset_since_success: bool,
    /// Error-state ticks left
    cooldown: u16,
    /// Fault this machine raised and has not cleared
    raised: Option<FaultCode>,
}

impl AcquisitionMachine {
    pub fn new(config: AcquisitionConfig) -> Self {
        Self {
            config,
            state: AcqState::Init,
            missed_frames: 0,
            resyncs: 0,
            reset_since_success: false,
            cooldown: 0,
            raised: None,
        }
    }

    pub fn state(&self) -> AcqState {
        self.state
    }

    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// Fault currently raised by acquisition
    pub fn fault(&self) -> Option<FaultCode> {
        self.raised
    }

    /// Remaining cooldown ticks in the error state
    pub fn cooldown_remaining(&self) -> u16 {
        self.cooldown
    }

    /// Report the outcome of sensor initialization (from `Init` or `ReInit`)
    pub fn init_finished(&mut self, result: Result<(), SensorErrorKind>) -> Step {
        match result {
            Ok(()) => {
                if self.state == AcqState::ReInit {
                    self.reset_since_success = true;
                }
                self.missed_frames = 0;
                self.resyncs = 0;
                self.enter(AcqState::Run);
                Step::pause(0)
            }
            Err(kind) => {
                warn!("Sensor initialization failed: {:?}", kind);
                self.enter_error();
                self.raise(kind.fault_code())
            }
        }
    }

    /// Report a complete frame delivered in `Run`
    pub fn frame_delivered(&mut self) -> Step {
        self.missed_frames = 0;
        self.resyncs = 0;
        self.reset_since_success = false;

        match self.raised.take() {
            Some(code) => {
                info!("Sensor stream recovered, clearing {:?}", code);
                Step::fault(FaultUpdate::Clear, self.config.frame_idle_ms)
            }
            None => Step::pause(self.config.frame_idle_ms),
        }
    }

    /// Report a frame-ready wait that did not complete a frame
    pub fn frame_missed(&mut self) -> Step {
        self.missed_frames = self.missed_frames.saturating_add(1);
        if self.missed_frames < self.config.missed_frame_limit {
            return Step::pause(0);
        }

        self.missed_frames = 0;
        self.resyncs = self.resyncs.saturating_add(1);
        debug!("Resync {} of {}", self.resyncs, self.config.sync_fault_limit);

        if self.resyncs < self.config.sync_fault_limit {
            return Step::pause(self.config.resync_pause_ms);
        }

        self.resyncs = 0;
        if self.reset_since_success {
            warn!("Sensor sync lost again after reset");
            self.enter_error();
        } else {
            warn!("Sensor sync lost, resetting sensor");
            self.reset_since_success = true;
            self.enter(AcqState::ReInit);
        }

        let mut step = self.raise(FaultCode::SensorSync);
        step.pause_ms = self.config.resync_pause_ms;
        step
    }

    /// Report one elapsed error-state tick
    pub fn cooldown_tick(&mut self) -> Step {
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.cooldown == 0 {
            self.enter(AcqState::ReInit);
            return Step::pause(0);
        }
        Step::pause(self.config.error_tick_ms)
    }

    fn raise(&mut self, code: FaultCode) -> Step {
        self.raised = Some(code);
        Step::fault(FaultUpdate::Raise(code), 0)
    }

    fn enter_error(&mut self) {
        self.cooldown = self.config.error_cooldown_ticks;
        self.enter(AcqState::Error);
    }

    fn enter(&mut self, state: AcqState) {
        if self.state != state {
            info!("Acquisition {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}
