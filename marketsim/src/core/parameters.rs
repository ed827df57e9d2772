use serde::{Deserialize, Serialize};

use super::strategy::Strategy;
use crate::utils::errors::{Result, SimulationError};

pub const DEFAULT_TRIAL_COUNT: usize = 10_000;
pub const DEFAULT_NOISE_FRACTION: f64 = 0.05;

fn default_trial_count() -> usize {
    DEFAULT_TRIAL_COUNT
}

fn default_noise_fraction() -> f64 {
    DEFAULT_NOISE_FRACTION
}

/// Inputs of a single simulation run.
///
/// Constructing the struct does not validate it; [`validate`](Self::validate)
/// is called by the engine before any sampling and by
/// [`from_json_str`](Self::from_json_str).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    price: f64,
    cost: f64,
    elasticity: f64,
    market_size: f64,
    #[serde(default)]
    strategy: Strategy,
    #[serde(default = "default_trial_count")]
    trial_count: usize,
    #[serde(default = "default_noise_fraction")]
    noise_fraction: f64,
}

impl SimulationParameters {
    pub fn new(price: f64, cost: f64, elasticity: f64, market_size: f64) -> Self {
        Self {
            price,
            cost,
            elasticity,
            market_size,
            strategy: Strategy::Custom,
            trial_count: DEFAULT_TRIAL_COUNT,
            noise_fraction: DEFAULT_NOISE_FRACTION,
        }
    }

    /// Parameters for `strategy`, using its preset price unless the strategy
    /// is `Custom`, in which case `custom_price` is used.
    pub fn for_strategy(
        strategy: Strategy,
        custom_price: f64,
        cost: f64,
        elasticity: f64,
        market_size: f64,
    ) -> Self {
        Self::new(
            strategy.resolve_price(custom_price),
            cost,
            elasticity,
            market_size,
        )
        .with_strategy(strategy)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: SimulationParameters = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_trial_count(mut self, trial_count: usize) -> Self {
        self.trial_count = trial_count;
        self
    }

    pub fn with_noise_fraction(mut self, noise_fraction: f64) -> Self {
        self.noise_fraction = noise_fraction;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn elasticity(&self) -> f64 {
        self.elasticity
    }

    pub fn market_size(&self) -> f64 {
        self.market_size
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn trial_count(&self) -> usize {
        self.trial_count
    }

    pub fn noise_fraction(&self) -> f64 {
        self.noise_fraction
    }

    /// Per-unit margin `price - cost`.
    pub fn unit_margin(&self) -> f64 {
        self.price - self.cost
    }

    /// Checks every field constraint and reports the first violation.
    pub fn validate(&self) -> Result<()> {
        check_finite("price", self.price)?;
        check_finite("cost", self.cost)?;
        check_finite("elasticity", self.elasticity)?;
        check_finite("market_size", self.market_size)?;
        check_finite("noise_fraction", self.noise_fraction)?;

        if self.price <= 0.0 {
            return Err(invalid("price must be > 0"));
        }
        if self.cost <= 0.0 {
            return Err(invalid("cost must be > 0"));
        }
        if self.elasticity < 0.0 {
            return Err(invalid("elasticity must be >= 0"));
        }
        if self.market_size <= 0.0 {
            return Err(invalid("market_size must be > 0"));
        }
        if self.trial_count == 0 {
            return Err(invalid("trial_count must be > 0"));
        }
        if self.noise_fraction < 0.0 {
            return Err(invalid("noise_fraction must be >= 0"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> SimulationError {
    SimulationError::InvalidParameter(message.to_string())
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::InvalidParameter(format!(
            "{} must be a finite number, got {}",
            name, value
        )))
    }
}
