//! Parameter editing state machine
//!
//! The menu is implicit: at rest (slot 0) short presses cycle the
//! palette/marker selector directly. A long press commits the current slot
//! and moves to the next one, where the parameter label is shown and short
//! presses cycle its value. Any slot other than 0 times out after a period
//! without presses, committing the edit and returning to rest. Slot 0 also
//! commits on timeout once it has been changed.
//!
//! The editor is pure: it tracks a mirror of the persisted values and
//! returns [`Effects`] for the render loop to carry out.

use core::fmt::Write;

use heapless::String;

use crate::params::{ParamId, ParameterSet};

/// Maximum label length, e.g. "Emissivity: 100"
pub const MAX_LABEL_LEN: usize = 24;

/// Side effects requested by an editor event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Effects {
    /// Write this value to persistent storage
    pub persist: Option<(ParamId, i32)>,
    /// Send this emissivity to the sensor
    pub emissivity: Option<u8>,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        self.persist.is_none() && self.emissivity.is_none()
    }
}

/// Button-driven parameter editor
#[derive(Debug, Clone)]
pub struct ParameterEditor {
    /// Index into `ParamId::EDITABLE`
    slot: usize,
    /// Choice index of the slot's value being edited
    choice: usize,
    /// Choice index when the slot was entered
    entry_choice: usize,
    /// Remaining inactivity time, `None` when no timeout runs
    timeout_ms: Option<u32>,
    timeout_period_ms: u32,
    /// Working values: committed values plus the slot being edited
    live: ParameterSet,
}

impl ParameterEditor {
    /// Start at rest with the persisted values
    pub fn new(persisted: ParameterSet, timeout_period_ms: u32) -> Self {
        let choice = ParamId::EDITABLE[0].choice_index(persisted.get(ParamId::EDITABLE[0]));
        Self {
            slot: 0,
            choice,
            entry_choice: choice,
            timeout_ms: None,
            timeout_period_ms,
            live: persisted,
        }
    }

    /// Current slot index, always in `0..ParamId::EDITABLE.len()`
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Parameter under the cursor
    pub fn param(&self) -> ParamId {
        ParamId::EDITABLE[self.slot]
    }

    /// A non-resting slot is selected (label shown)
    pub fn is_editing(&self) -> bool {
        self.slot != 0
    }

    /// Remaining inactivity time
    pub fn timeout_remaining_ms(&self) -> Option<u32> {
        self.timeout_ms
    }

    /// Values the display should use right now
    pub fn values(&self) -> &ParameterSet {
        &self.live
    }

    /// Short press: next value of the current slot
    pub fn on_short_press(&mut self) -> Effects {
        let param = self.param();
        self.choice = (self.choice + 1) % param.choice_count();
        let value = param.choice_value(self.choice);
        self.live.set(param, value);
        self.timeout_ms = Some(self.timeout_period_ms);

        debug!("{:?} -> {}", param, value);

        let mut effects = Effects::default();
        if param == ParamId::Emissivity {
            effects.emissivity = Some(self.live.emissivity_percent());
        }
        effects
    }

    /// Long press: commit the current slot and move to the next
    pub fn on_long_press(&mut self) -> Effects {
        let effects = self.commit();

        self.slot = (self.slot + 1) % ParamId::EDITABLE.len();
        self.timeout_ms = if self.slot == 0 {
            None
        } else {
            Some(self.timeout_period_ms)
        };
        self.load_slot();

        debug!("Editing slot {}", self.slot);
        effects
    }

    /// Advance time; commits and returns to rest when the timeout expires
    pub fn tick(&mut self, elapsed_ms: u32) -> Effects {
        let remaining = match self.timeout_ms {
            Some(remaining) => remaining.saturating_sub(elapsed_ms),
            None => return Effects::default(),
        };
        if remaining > 0 {
            self.timeout_ms = Some(remaining);
            return Effects::default();
        }

        debug!("Parameter entry timed out");
        let effects = self.commit();
        self.slot = 0;
        self.timeout_ms = None;
        self.load_slot();
        effects
    }

    /// Text overlay for the slot being edited, `None` at rest
    pub fn label(&self) -> Option<String<MAX_LABEL_LEN>> {
        if !self.is_editing() {
            return None;
        }

        let param = self.param();
        let value = self.live.get(param);
        let mut text = String::new();
        // Longest label fits MAX_LABEL_LEN
        let _ = match param {
            ParamId::Units => {
                let unit = if value != 0 { "Metric" } else { "Imperial" };
                write!(text, "{} {}", param.label(), unit)
            }
            _ => write!(text, "{} {}", param.label(), value),
        };
        Some(text)
    }

    fn commit(&mut self) -> Effects {
        let mut effects = Effects::default();
        if self.choice == self.entry_choice {
            return effects;
        }

        let param = self.param();
        let value = param.choice_value(self.choice);
        effects.persist = Some((param, value));
        if param == ParamId::Emissivity {
            effects.emissivity = Some(self.live.emissivity_percent());
        }
        self.entry_choice = self.choice;
        effects
    }

    fn load_slot(&mut self) {
        let param = self.param();
        self.choice = param.choice_index(self.live.get(param));
        self.entry_choice = self.choice;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TIMEOUT: u32 = 10_000;

    fn editor() -> ParameterEditor {
        ParameterEditor::new(ParameterSet::default(), TIMEOUT)
    }

    #[test]
    fn test_rest_state() {
        let e = editor();
        assert_eq!(e.slot(), 0);
        assert!(!e.is_editing());
        assert_eq!(e.label(), None);
        assert_eq!(e.timeout_remaining_ms(), None);
    }

    #[test]
    fn test_short_press_at_rest_cycles_palette() {
        let mut e = editor();
        for expected in [1, 2, 3, 0] {
            let effects = e.on_short_press();
            assert!(effects.is_empty());
            assert_eq!(e.values().get(ParamId::PaletteMarker), expected);
        }
        assert_eq!(e.timeout_remaining_ms(), Some(TIMEOUT));
    }

    #[test]
    fn test_rest_change_commits_on_timeout() {
        let mut e = editor();
        e.on_short_press();
        assert!(e.tick(TIMEOUT - 20).is_empty());
        let effects = e.tick(20);
        assert_eq!(effects.persist, Some((ParamId::PaletteMarker, 1)));
        assert_eq!(e.timeout_remaining_ms(), None);
    }

    #[test]
    fn test_long_press_cycle() {
        let mut e = editor();

        e.on_long_press();
        assert_eq!(e.param(), ParamId::Emissivity);
        assert_eq!(e.label().unwrap().as_str(), "Emissivity: 97");
        assert_eq!(e.timeout_remaining_ms(), Some(TIMEOUT));

        e.on_long_press();
        assert_eq!(e.param(), ParamId::Units);
        assert_eq!(e.label().unwrap().as_str(), "Units: Imperial");

        e.on_long_press();
        assert_eq!(e.slot(), 0);
        assert_eq!(e.timeout_remaining_ms(), None);
        assert_eq!(e.label(), None);
    }

    #[test]
    fn test_emissivity_edit_applies_and_commits() {
        let mut e = editor();
        e.on_long_press();

        let effects = e.on_short_press();
        assert_eq!(effects.emissivity, Some(98));
        assert_eq!(effects.persist, None);

        let effects = e.on_long_press();
        assert_eq!(effects.persist, Some((ParamId::Emissivity, 98)));
        assert_eq!(effects.emissivity, Some(98));
        assert_eq!(e.param(), ParamId::Units);
    }

    #[test]
    fn test_emissivity_wraps() {
        let mut set = ParameterSet::default();
        set.set(ParamId::Emissivity, 100);
        let mut e = ParameterEditor::new(set, TIMEOUT);
        e.on_long_press();

        assert_eq!(e.on_short_press().emissivity, Some(10));
        assert_eq!(e.label().unwrap().as_str(), "Emissivity: 10");
    }

    #[test]
    fn test_unchanged_slot_not_persisted() {
        let mut e = editor();
        e.on_long_press();
        // Cycle units all the way around
        e.on_long_press();
        e.on_short_press();
        e.on_short_press();
        assert_eq!(e.on_long_press().persist, None);
    }

    #[test]
    fn test_timeout_commits_and_returns_to_rest() {
        let mut e = editor();
        e.on_long_press();
        e.on_long_press();
        e.on_short_press();
        assert_eq!(e.label().unwrap().as_str(), "Units: Metric");

        let effects = e.tick(TIMEOUT);
        assert_eq!(effects.persist, Some((ParamId::Units, 1)));
        assert_eq!(e.slot(), 0);
        assert!(e.values().metric());
    }

    #[test]
    fn test_press_restarts_timeout() {
        let mut e = editor();
        e.on_long_press();
        e.tick(TIMEOUT - 100);
        e.on_short_press();
        assert_eq!(e.timeout_remaining_ms(), Some(TIMEOUT));
        assert!(e.tick(TIMEOUT - 100).is_empty());
        assert!(e.is_editing());
    }

    #[test]
    fn test_next_slot_loads_committed_value() {
        let mut e = editor();
        e.on_long_press();
        e.on_short_press();
        e.on_long_press();
        e.on_long_press();
        e.on_long_press();
        assert_eq!(e.label().unwrap().as_str(), "Emissivity: 98");
    }

    #[derive(Debug, Clone, Copy)]
    enum Input {
        Short,
        Long,
        Tick(u32),
    }

    fn input() -> impl Strategy<Value = Input> {
        prop_oneof![
            Just(Input::Short),
            Just(Input::Long),
            (0u32..12_000).prop_map(Input::Tick),
        ]
    }

    proptest! {
        #[test]
        fn test_slot_always_in_bounds(inputs in proptest::collection::vec(input(), 0..200)) {
            let mut e = editor();
            for input in inputs {
                let was_last = e.slot() == ParamId::EDITABLE.len() - 1;
                match input {
                    Input::Short => { e.on_short_press(); }
                    Input::Long => {
                        e.on_long_press();
                        if was_last {
                            prop_assert_eq!(e.slot(), 0);
                            prop_assert_eq!(e.timeout_remaining_ms(), None);
                        }
                    }
                    Input::Tick(ms) => { e.tick(ms); }
                }
                prop_assert!(e.slot() < ParamId::EDITABLE.len());
                for id in ParamId::ALL {
                    prop_assert!(id.range().contains(&e.values().get(id)));
                }
            }
        }
    }
}
