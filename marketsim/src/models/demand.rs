use crate::prelude::*;

/// Trait for models mapping pricing inputs to a noise-free demand level.
pub trait DemandModel {
    /// Expected demand before noise and clamping. May fall outside
    /// `[0, market_size]`.
    fn base_demand(&self, params: &SimulationParameters) -> f64;

    /// Standard deviation of the sampled demand. Uses `|base|` so a negative
    /// base demand still yields a valid scale.
    fn demand_spread(&self, params: &SimulationParameters) -> f64 {
        self.base_demand(params).abs() * params.noise_fraction()
    }
}

/// Demand falls linearly with the markup `(price - cost) / cost`, scaled by
/// the elasticity:
///
/// `base = market_size * (1 - elasticity * (price - cost) / cost)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearElasticityModel;

impl DemandModel for LinearElasticityModel {
    fn base_demand(&self, params: &SimulationParameters) -> f64 {
        params.market_size()
            * (1.0 - params.elasticity() * (params.price() - params.cost()) / params.cost())
    }
}
