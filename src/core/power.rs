// Transmit power levels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PowerError {
    #[error("Invalid power specification: {0}")]
    InvalidFormat(String),
}

/// Device independent power level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Power {
    Min,
    Low,
    Mid,
    #[default]
    High,
    Max,
}

/// Two-bit power field as stored in channel and GPS records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PowerCode {
    Low = 0,
    Mid = 1,
    High = 2,
    Turbo = 3,
}

impl PowerCode {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => PowerCode::Low,
            1 => PowerCode::Mid,
            2 => PowerCode::High,
            _ => PowerCode::Turbo,
        }
    }
}

impl From<PowerCode> for Power {
    fn from(code: PowerCode) -> Self {
        match code {
            PowerCode::Low => Power::Low,
            PowerCode::Mid => Power::Mid,
            PowerCode::High => Power::High,
            PowerCode::Turbo => Power::Max,
        }
    }
}

impl From<Power> for PowerCode {
    /// Min has no device counterpart and is stored as low.
    fn from(power: Power) -> Self {
        match power {
            Power::Min | Power::Low => PowerCode::Low,
            Power::Mid => PowerCode::Mid,
            Power::High => PowerCode::High,
            Power::Max => PowerCode::Turbo,
        }
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Power::Min => "Min",
            Power::Low => "Low",
            Power::Mid => "Mid",
            Power::High => "High",
            Power::Max => "Max",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for Power {
    type Err = PowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(Power::Min),
            "low" => Ok(Power::Low),
            "mid" | "middle" => Ok(Power::Mid),
            "high" => Ok(Power::High),
            "max" | "turbo" => Ok(Power::Max),
            _ => Err(PowerError::InvalidFormat(s.to_string())),
        }
    }
}
