//! Monte Carlo estimation of revenue and profit for a product pricing
//! decision.
//!
//! A [`SimulationParameters`](crate::core::parameters::SimulationParameters)
//! set is fed to a [`MonteCarloEngine`](crate::models::montecarlo::MonteCarloEngine)
//! together with a caller-owned seeded random source; the engine returns a
//! column-aligned [`SimulationResult`](crate::core::outcome::SimulationResult)
//! from which the `stats` module derives summaries, percentiles and
//! histograms.

pub mod core;
pub mod models;
pub mod prelude;
pub mod stats;
pub mod utils;
