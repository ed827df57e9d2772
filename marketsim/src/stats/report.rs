use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

pub const DEFAULT_HEAD_ROWS: usize = 100;
pub const DEFAULT_SCATTER_ROWS: usize = 1000;

/// Sizes of the presentation views attached to a report, and whether the
/// run behind it uses [`MonteCarloEngine::par_run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub bins: usize,
    pub head_rows: usize,
    pub scatter_rows: usize,
    pub parallel: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            bins: DEFAULT_HISTOGRAM_BINS,
            head_rows: DEFAULT_HEAD_ROWS,
            scatter_rows: DEFAULT_SCATTER_ROWS,
            parallel: false,
        }
    }
}

/// Everything a presentation layer shows for one strategy: headline
/// metrics, profit spread and histogram, the first rows of the table and a
/// random subsample for a demand/revenue scatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReport {
    pub parameters: SimulationParameters,
    pub seed: u64,
    pub base_demand: f64,
    pub summary: SummaryStatistics,
    pub profit_distribution: ProfitDistribution,
    pub profit_histogram: Histogram,
    pub head: SimulationResult,
    pub scatter_sample: SimulationResult,
}

/// Seed of the stream a report draws its scatter subsample from. Kept apart
/// from the trial streams so the subsample does not depend on whether the
/// run was parallel.
pub fn scatter_seed(seed: u64) -> u64 {
    seeded_rng(seed ^ SCATTER_STREAM).gen::<u64>()
}

const SCATTER_STREAM: u64 = 0x5ca7_7e25_a3b1_e000;

impl StrategyReport {
    /// Runs the engine from `seed` and builds the report. The whole report is
    /// reproducible from `(params, seed, options)`.
    pub fn build(params: &SimulationParameters, seed: u64, options: ReportOptions) -> Result<Self> {
        let engine = MonteCarloEngine::new();
        let result = if options.parallel {
            engine.par_run(params, seed)?
        } else {
            engine.run(params, &mut seeded_rng(seed))?
        };
        let mut scatter_rng = seeded_rng(scatter_seed(seed));
        Self::from_result(params, seed, &result, &mut scatter_rng, options)
    }

    pub fn from_result<R: Rng + ?Sized>(
        params: &SimulationParameters,
        seed: u64,
        result: &SimulationResult,
        rng: &mut R,
        options: ReportOptions,
    ) -> Result<Self> {
        Ok(Self {
            parameters: *params,
            seed,
            base_demand: LinearElasticityModel.base_demand(params),
            summary: SummaryStatistics::from_result(result)?,
            profit_distribution: ProfitDistribution::from_result(result)?,
            profit_histogram: Histogram::of_profit(result, options.bins)?,
            head: result.head(options.head_rows),
            scatter_sample: result.sample(options.scatter_rows, rng),
        })
    }
}
