use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Headline numbers of a run, gathered in a single pass over the table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub trials: usize,
    pub mean_demand: f64,
    pub mean_revenue: f64,
    pub mean_profit: f64,
    /// Fraction of trials with strictly positive profit, in `[0, 1]`.
    pub breakeven_chance: f64,
}

impl SummaryStatistics {
    pub fn from_result(result: &SimulationResult) -> Result<Self> {
        if result.is_empty() {
            return Err(SimulationError::EmptySample(
                "cannot summarize an empty simulation result".to_string(),
            ));
        }

        let (demand, revenue, profit, profitable) = result.rows().fold(
            (0.0, 0.0, 0.0, 0usize),
            |(demand, revenue, profit, profitable), row| {
                (
                    demand + row.demand,
                    revenue + row.revenue,
                    profit + row.profit,
                    profitable + usize::from(row.profit > 0.0),
                )
            },
        );

        let n = result.len() as f64;
        Ok(Self {
            trials: result.len(),
            mean_demand: demand / n,
            mean_revenue: revenue / n,
            mean_profit: profit / n,
            breakeven_chance: profitable as f64 / n,
        })
    }
}
