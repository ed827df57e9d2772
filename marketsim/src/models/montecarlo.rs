//! Monte Carlo demand engine.
//!
//! * Each trial draws `z ~ N(0, 1)` from the caller's random source and sets
//!   **demand = clamp(base + spread · z, 0, market_size)**.
//! * Revenue and profit are exact functions of the clamped demand.
//! * [`MonteCarloEngine::par_run`] splits the trials into fixed-size batches,
//!   each driven by its own RNG seeded from the run seed, so the output does
//!   not depend on how many worker threads rayon uses.

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use tracing::debug;

use crate::prelude::*;

pub const DEFAULT_BATCH_SIZE: usize = 4096;

/// Seeded random source used by callers that do not bring their own.
pub type SeededRng = StdRng;

pub fn seeded_rng(seed: u64) -> SeededRng {
    StdRng::seed_from_u64(seed)
}

/// Seeds of the first `n_batches` batches of a parallel run started from
/// `seed`, drawn from a master generator seeded with `seed`. Runs from
/// neighbouring seeds get unrelated batch streams.
pub fn batch_seeds(seed: u64, n_batches: usize) -> Vec<u64> {
    let mut master = seeded_rng(seed);
    (0..n_batches).map(|_| master.gen::<u64>()).collect()
}

/// Runs a simulation with the linear elasticity demand model.
pub fn run<R: Rng + ?Sized>(
    params: &SimulationParameters,
    rng: &mut R,
) -> Result<SimulationResult> {
    MonteCarloEngine::new().run(params, rng)
}

#[derive(Debug, Clone)]
pub struct MonteCarloEngine<M = LinearElasticityModel> {
    model: M,
    batch_size: usize,
}

impl MonteCarloEngine<LinearElasticityModel> {
    pub fn new() -> Self {
        Self::with_model(LinearElasticityModel)
    }
}

impl Default for MonteCarloEngine<LinearElasticityModel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: DemandModel> MonteCarloEngine<M> {
    pub fn with_model(model: M) -> Self {
        Self {
            model,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Trials per batch in [`par_run`](Self::par_run). Part of the
    /// reproducibility key: changing it changes the output for a given seed.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Simulates `params.trial_count()` trials, consuming randomness only
    /// from `rng`. Fails before sampling if the parameters are invalid.
    pub fn run<R: Rng + ?Sized>(
        &self,
        params: &SimulationParameters,
        rng: &mut R,
    ) -> Result<SimulationResult> {
        let (base, spread) = self.prepare(params)?;
        debug!(
            strategy = %params.strategy(),
            trials = params.trial_count(),
            base_demand = base,
            spread,
            "running demand simulation"
        );
        Ok(simulate_batch(params, base, spread, params.trial_count(), rng))
    }

    fn prepare(&self, params: &SimulationParameters) -> Result<(f64, f64)> {
        params.validate()?;
        let base = self.model.base_demand(params);
        let spread = self.model.demand_spread(params);
        if !base.is_finite() || !spread.is_finite() {
            return Err(SimulationError::InvalidParameter(format!(
                "base demand is not finite ({}) for the given inputs",
                base
            )));
        }
        Ok((base, spread))
    }
}

impl<M: DemandModel + Sync> MonteCarloEngine<M> {
    /// Parallel counterpart of [`run`](Self::run). Batch `i` draws from
    /// `seeded_rng(batch_seeds(seed, _)[i])` and batches are concatenated in
    /// order, so equal `(params, seed, batch_size)` give equal results.
    pub fn par_run(&self, params: &SimulationParameters, seed: u64) -> Result<SimulationResult> {
        let (base, spread) = self.prepare(params)?;
        let trials = params.trial_count();
        let batch_size = self.batch_size;
        let n_batches = trials.div_ceil(batch_size);
        debug!(
            strategy = %params.strategy(),
            trials,
            batches = n_batches,
            batch_size,
            base_demand = base,
            spread,
            "running parallel demand simulation"
        );

        let seeds = batch_seeds(seed, n_batches);
        let batches: Vec<SimulationResult> = seeds
            .into_par_iter()
            .enumerate()
            .map(|(batch, batch_seed)| {
                let len = batch_size.min(trials - batch * batch_size);
                let mut rng = seeded_rng(batch_seed);
                simulate_batch(params, base, spread, len, &mut rng)
            })
            .collect();

        let mut result = SimulationResult::with_capacity(trials);
        for mut batch in batches {
            result.append(&mut batch);
        }
        Ok(result)
    }
}

fn simulate_batch<R: Rng + ?Sized>(
    params: &SimulationParameters,
    base: f64,
    spread: f64,
    trials: usize,
    rng: &mut R,
) -> SimulationResult {
    let market_size = params.market_size();
    let demand = (0..trials)
        .map(|_| {
            let z: f64 = StandardNormal.sample(rng);
            (base + spread * z).clamp(0.0, market_size)
        })
        .collect();
    SimulationResult::from_demand(demand, params.price(), params.cost())
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;
    use proptest::strategy::Strategy;

    use super::*;

    fn params_strategy() -> impl Strategy<Value = SimulationParameters> {
        (
            0.1f64..50.0,
            0.1f64..20.0,
            0.0f64..3.0,
            1.0f64..1.0e6,
            0.0f64..0.5,
            1usize..300,
        )
            .prop_map(|(price, cost, elasticity, market, noise, trials)| {
                SimulationParameters::new(price, cost, elasticity, market)
                    .with_noise_fraction(noise)
                    .with_trial_count(trials)
            })
    }

    proptest! {
        #[test]
        fn prop_result_invariants(params in params_strategy(), seed in any::<u64>()) {
            let result = run(&params, &mut seeded_rng(seed)).unwrap();
            prop_assert_eq!(result.len(), params.trial_count());
            for row in result.rows() {
                prop_assert!(row.demand >= 0.0 && row.demand <= params.market_size());
                prop_assert_eq!(row.revenue, row.demand * params.price());
                prop_assert_eq!(row.profit, row.demand * (params.price() - params.cost()));
            }
        }

        #[test]
        fn prop_run_deterministic(params in params_strategy(), seed in any::<u64>()) {
            let a = run(&params, &mut seeded_rng(seed)).unwrap();
            let b = run(&params, &mut seeded_rng(seed)).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_par_run_invariants(params in params_strategy(), seed in any::<u64>(), batch in 1usize..64) {
            let engine = MonteCarloEngine::new().with_batch_size(batch);
            let result = engine.par_run(&params, seed).unwrap();
            prop_assert_eq!(result.len(), params.trial_count());
            prop_assert!(result.demand().iter().all(|&d| d >= 0.0 && d <= params.market_size()));
            prop_assert_eq!(result, engine.par_run(&params, seed).unwrap());
        }
    }
}
