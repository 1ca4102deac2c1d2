//! Timing and threshold configuration
//!
//! Every loop reads its constants from one of these structs so a board can
//! tune them (or tests can shrink them) without touching the state machines.
//! With the `serde` feature the whole set can be stored as postcard bytes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Acquisition loop timing and fault-ladder thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcquisitionConfig {
    /// Consecutive missed frame-ready waits before a resync pause
    /// (about three nominal frame periods)
    pub missed_frame_limit: u16,
    /// Resync pause, long enough for the sensor to drop its stream
    pub resync_pause_ms: u32,
    /// Consecutive resyncs without a good frame before a sync fault
    pub sync_fault_limit: u8,
    /// Idle after each delivered frame
    pub frame_idle_ms: u32,
    /// Reset line assertion time
    pub reset_assert_ms: u32,
    /// Settle delay after power-on or reset release
    pub power_on_settle_ms: u32,
    /// Error-state cooldown length in ticks
    pub error_cooldown_ticks: u16,
    /// Error-state tick length
    pub error_tick_ms: u32,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            missed_frame_limit: 36,
            resync_pause_ms: 185,
            sync_fault_limit: 10,
            frame_idle_ms: 30,
            reset_assert_ms: 10,
            power_on_settle_ms: 1000,
            error_cooldown_ticks: 60,
            error_tick_ms: 1000,
        }
    }
}

/// Render loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderConfig {
    /// Evaluation tick
    pub eval_interval_ms: u32,
    /// Parameter-edit inactivity timeout
    pub edit_timeout_ms: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            eval_interval_ms: 20,
            edit_timeout_ms: 10_000,
        }
    }
}

/// Control loop timing (button and status LED)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlConfig {
    /// Evaluation tick
    pub eval_interval_ms: u32,
    /// Ticks a press must be held to count as a long press
    pub long_press_ticks: u16,
    /// Blink on-phase
    pub blink_on_ms: u32,
    /// Blink off-phase
    pub blink_off_ms: u32,
    /// Pause between blink groups
    pub blink_idle_ms: u32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            eval_interval_ms: 50,
            long_press_ticks: 60,
            blink_on_ms: 200,
            blink_off_ms: 300,
            blink_idle_ms: 2000,
        }
    }
}

impl ControlConfig {
    /// Long press duration in milliseconds
    pub fn long_press_ms(&self) -> u32 {
        self.long_press_ticks as u32 * self.eval_interval_ms
    }
}

/// Complete camera runtime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraConfig {
    pub acquisition: AcquisitionConfig,
    pub render: RenderConfig,
    pub control: ControlConfig,
}
