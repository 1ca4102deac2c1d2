//! Fault codes
//!
//! A fault code is the only thing the status LED can say about a failure:
//! the indicator blinks it out as a count.

/// Fault categories reported to the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FaultCode {
    /// No fault
    None = 0,
    /// Bus bring-up failed (SPI/I2C)
    BusInit = 1,
    /// Peripheral bring-up failed (storage, video generator)
    PeripheralInit = 2,
    /// Frame buffer allocation failed
    MemoryInit = 3,
    /// Sensor control channel did not respond
    SensorControl = 4,
    /// Sensor image stream failed
    SensorStream = 5,
    /// Sensor image stream would not stay synchronized
    SensorSync = 6,
}

impl FaultCode {
    /// Number of blinks the status indicator shows for this code
    pub fn blink_count(self) -> u8 {
        self as u8
    }

    /// Whether this code represents a real fault
    pub fn is_fault(self) -> bool {
        self != FaultCode::None
    }

    /// Create a code from its numeric value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(FaultCode::None),
            1 => Some(FaultCode::BusInit),
            2 => Some(FaultCode::PeripheralInit),
            3 => Some(FaultCode::MemoryInit),
            4 => Some(FaultCode::SensorControl),
            5 => Some(FaultCode::SensorStream),
            6 => Some(FaultCode::SensorSync),
            _ => None,
        }
    }
}
