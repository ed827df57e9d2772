use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};

use crate::prelude::*;

/// Spread of the profit column: dispersion, range and percentiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitDistribution {
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub p95: f64,
}

impl ProfitDistribution {
    pub fn from_result(result: &SimulationResult) -> Result<Self> {
        Self::from_values(result.profit())
    }

    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(SimulationError::EmptySample(
                "cannot describe an empty profit column".to_string(),
            ));
        }

        // sample standard deviation is undefined for a single trial
        let std_dev = if values.len() > 1 {
            values.std_dev()
        } else {
            0.0
        };
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        let mut data = Data::new(values.to_vec());
        Ok(Self {
            std_dev,
            min,
            max,
            p5: data.percentile(5),
            p25: data.percentile(25),
            median: data.percentile(50),
            p75: data.percentile(75),
            p95: data.percentile(95),
        })
    }
}
