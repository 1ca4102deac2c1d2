//! Persisted camera parameters
//!
//! Four integer parameters survive power cycles. Three of them can be
//! edited from the button menu; the fourth (upscale strategy) is a hidden
//! setting with no menu slot.

mod store;

use core::ops::RangeInclusive;

use thermavid_hal::StorageKey;

pub use store::{ParameterStore, StoreError};

/// Emissivity choices offered by the menu, in percent
pub const EMISSIVITY_TABLE: [u8; 23] = [
    10, 20, 30, 40, 50, 60, 70, 80, 82, 84, 86, 88, 90, 91, 92, 93, 94, 95, 96, 97, 98, 99, 100,
];

/// Palette/marker selector bit: markers and spotmeter shown
pub const MARKER_MASK: i32 = 0x01;

/// Palette/marker selector bit: black-hot palette
pub const PALETTE_MASK: i32 = 0x02;

/// Position of `percent` in [`EMISSIVITY_TABLE`], or the last entry if absent
pub fn emissivity_index(percent: i32) -> usize {
    EMISSIVITY_TABLE
        .iter()
        .position(|&e| e as i32 == percent)
        .unwrap_or(EMISSIVITY_TABLE.len() - 1)
}

/// Parameter identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamId {
    /// Palette polarity and marker enable, see [`PALETTE_MASK`] and [`MARKER_MASK`]
    PaletteMarker,
    /// Scene emissivity in percent
    Emissivity,
    /// 0 imperial, 1 metric
    Units,
    /// 0 duplicate pixels, 1 interpolate
    Interpolation,
}

impl ParamId {
    /// Every persisted parameter
    pub const ALL: [ParamId; 4] = [
        ParamId::PaletteMarker,
        ParamId::Emissivity,
        ParamId::Units,
        ParamId::Interpolation,
    ];

    /// Menu slots in cycling order; slot 0 is the resting display
    pub const EDITABLE: [ParamId; 3] = [ParamId::PaletteMarker, ParamId::Emissivity, ParamId::Units];

    /// Flash key holding this parameter
    pub fn key(self) -> StorageKey {
        match self {
            ParamId::PaletteMarker => StorageKey::PaletteMarker,
            ParamId::Emissivity => StorageKey::Emissivity,
            ParamId::Units => StorageKey::Units,
            ParamId::Interpolation => StorageKey::Interpolation,
        }
    }

    /// Value written on first run
    pub fn default_value(self) -> i32 {
        match self {
            ParamId::PaletteMarker => 0,
            ParamId::Emissivity => 97,
            ParamId::Units => 0,
            ParamId::Interpolation => 1,
        }
    }

    /// Legal values
    pub fn range(self) -> RangeInclusive<i32> {
        match self {
            ParamId::PaletteMarker => 0..=3,
            ParamId::Emissivity => 10..=100,
            ParamId::Units => 0..=1,
            ParamId::Interpolation => 0..=1,
        }
    }

    /// Menu label prefix
    pub fn label(self) -> &'static str {
        match self {
            ParamId::PaletteMarker => "",
            ParamId::Emissivity => "Emissivity:",
            ParamId::Units => "Units:",
            ParamId::Interpolation => "Interpolation:",
        }
    }

    /// Number of menu choices
    pub fn choice_count(self) -> usize {
        match self {
            ParamId::PaletteMarker => 4,
            ParamId::Emissivity => EMISSIVITY_TABLE.len(),
            ParamId::Units | ParamId::Interpolation => 2,
        }
    }

    /// Parameter value of menu choice `index`
    pub fn choice_value(self, index: usize) -> i32 {
        match self {
            ParamId::Emissivity => EMISSIVITY_TABLE[index % EMISSIVITY_TABLE.len()] as i32,
            _ => (index % self.choice_count()) as i32,
        }
    }

    /// Menu choice index of `value`
    pub fn choice_index(self, value: i32) -> usize {
        match self {
            ParamId::Emissivity => emissivity_index(value),
            _ => (value.max(0) as usize).min(self.choice_count() - 1),
        }
    }

    fn index(self) -> usize {
        match self {
            ParamId::PaletteMarker => 0,
            ParamId::Emissivity => 1,
            ParamId::Units => 2,
            ParamId::Interpolation => 3,
        }
    }
}

/// Snapshot of all parameter values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParameterSet {
    values: [i32; 4],
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            values: ParamId::ALL.map(ParamId::default_value),
        }
    }
}

impl ParameterSet {
    pub fn get(&self, id: ParamId) -> i32 {
        self.values[id.index()]
    }

    pub fn set(&mut self, id: ParamId, value: i32) {
        self.values[id.index()] = value;
    }

    pub fn black_hot(&self) -> bool {
        self.get(ParamId::PaletteMarker) & PALETTE_MASK != 0
    }

    pub fn markers_enabled(&self) -> bool {
        self.get(ParamId::PaletteMarker) & MARKER_MASK != 0
    }

    pub fn emissivity_percent(&self) -> u8 {
        self.get(ParamId::Emissivity).clamp(0, 100) as u8
    }

    pub fn metric(&self) -> bool {
        self.get(ParamId::Units) != 0
    }

    pub fn interpolate(&self) -> bool {
        self.get(ParamId::Interpolation) != 0
    }
}
