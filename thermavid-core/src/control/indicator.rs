//! Blink-code status indicator
//!
//! Either shows a solid color or blinks a fault code as a countable
//! sequence: `code` red flashes, a long pause, then again.
//!
//! ```text
//!  On ─▶ Off ─▶ On ─▶ Off ─▶ ... (code times) ─▶ Idle ─▶ On ...
//! ```

use crate::config::ControlConfig;
use crate::fault::FaultCode;

use super::led::LedColor;

/// Indicator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkPhase {
    /// Steady color, no timing
    Solid,
    /// Flash lit
    On,
    /// Gap between flashes
    Off,
    /// Pause after a full group
    Idle,
}

/// Status indicator state machine
#[derive(Debug, Clone)]
pub struct StatusIndicator {
    phase: BlinkPhase,
    color: LedColor,
    /// Flashes per group
    count: u8,
    /// Flashes left in the current group
    remaining: u8,
    /// Time left in the current phase
    timer_ms: u32,
    on_ms: u32,
    off_ms: u32,
    idle_ms: u32,
}

impl StatusIndicator {
    /// Blink color used for fault codes
    pub const FAULT_COLOR: LedColor = LedColor::Red;

    pub fn new(config: &ControlConfig) -> Self {
        Self {
            phase: BlinkPhase::Solid,
            color: LedColor::Off,
            count: 0,
            remaining: 0,
            timer_ms: 0,
            on_ms: config.blink_on_ms,
            off_ms: config.blink_off_ms,
            idle_ms: config.blink_idle_ms,
        }
    }

    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// Color the LED should show now
    pub fn color(&self) -> LedColor {
        self.color
    }

    /// Show a steady color
    pub fn solid(&mut self, color: LedColor) {
        self.phase = BlinkPhase::Solid;
        self.color = color;
    }

    /// Start blinking `code`, beginning with a flash
    pub fn blink(&mut self, code: FaultCode) {
        self.count = code.blink_count();
        if self.count == 0 {
            self.enter(BlinkPhase::Idle);
        } else {
            self.remaining = self.count;
            self.enter(BlinkPhase::On);
        }
    }

    /// Advance time; returns the new color when it changed
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<LedColor> {
        if self.phase == BlinkPhase::Solid {
            return None;
        }

        self.timer_ms = self.timer_ms.saturating_sub(elapsed_ms);
        if self.timer_ms > 0 {
            return None;
        }

        let before = self.color;
        match self.phase {
            BlinkPhase::On => self.enter(BlinkPhase::Off),
            BlinkPhase::Off => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining > 0 {
                    self.enter(BlinkPhase::On);
                } else {
                    self.enter(BlinkPhase::Idle);
                }
            }
            BlinkPhase::Idle => {
                if self.count > 0 {
                    self.remaining = self.count;
                    self.enter(BlinkPhase::On);
                } else {
                    self.enter(BlinkPhase::Idle);
                }
            }
            BlinkPhase::Solid => {}
        }

        (self.color != before).then_some(self.color)
    }

    fn enter(&mut self, phase: BlinkPhase) {
        self.phase = phase;
        match phase {
            BlinkPhase::On => {
                self.color = Self::FAULT_COLOR;
                self.timer_ms = self.on_ms;
            }
            BlinkPhase::Off => {
                self.color = LedColor::Off;
                self.timer_ms = self.off_ms;
            }
            BlinkPhase::Idle => {
                self.color = LedColor::Off;
                self.timer_ms = self.idle_ms;
            }
            BlinkPhase::Solid => {}
        }
    }
}
