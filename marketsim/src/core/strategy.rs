use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::errors::{Result, SimulationError};

/// Pricing strategy tag. Presets fix the unit price; `Custom` takes it from
/// the caller. The tag never changes how a run is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    LowPrice,
    Premium,
    Penetration,
    #[default]
    Custom,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::LowPrice,
        Strategy::Premium,
        Strategy::Penetration,
        Strategy::Custom,
    ];

    /// Unit price attached to the preset, `None` for `Custom`.
    pub fn preset_price(&self) -> Option<f64> {
        match self {
            Strategy::LowPrice => Some(3.0),
            Strategy::Premium => Some(10.0),
            Strategy::Penetration => Some(1.5),
            Strategy::Custom => None,
        }
    }

    /// Preset price, or `custom_price` for `Custom`.
    pub fn resolve_price(&self, custom_price: f64) -> f64 {
        self.preset_price().unwrap_or(custom_price)
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::LowPrice => "Low Price",
            Strategy::Premium => "Premium",
            Strategy::Penetration => "Penetration",
            Strategy::Custom => "Custom",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Strategy {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "lowprice" | "low" => Ok(Strategy::LowPrice),
            "premium" => Ok(Strategy::Premium),
            "penetration" => Ok(Strategy::Penetration),
            "custom" => Ok(Strategy::Custom),
            _ => Err(SimulationError::InvalidParameter(format!(
                "unknown strategy '{}'",
                s
            ))),
        }
    }
}
