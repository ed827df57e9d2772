use marketsim::prelude::*;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

pub const DEFAULT_SEED: u64 = 42;

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Request accepted by [`run_simulation`].
#[derive(Debug, Deserialize)]
pub struct SimulationInput {
    pub parameters: SimulationParameters,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub options: ReportOptions,
}

#[derive(Debug, Serialize)]
pub struct StrategyPreset {
    pub strategy: Strategy,
    pub label: String,
    pub price: Option<f64>,
}

/// Parses a request, applies the strategy's preset price and builds the
/// report. Presets override the `price` field; `custom` keeps it.
pub fn simulate_report(input_json: &str) -> Result<StrategyReport> {
    let input: SimulationInput = serde_json::from_str(input_json)?;
    let params = match input.parameters.strategy().preset_price() {
        Some(price) => input.parameters.with_price(price),
        None => input.parameters,
    };
    StrategyReport::build(&params, input.seed, input.options)
}

pub fn presets() -> Vec<StrategyPreset> {
    Strategy::ALL
        .iter()
        .map(|&strategy| StrategyPreset {
            strategy,
            label: strategy.to_string(),
            price: strategy.preset_price(),
        })
        .collect()
}

#[wasm_bindgen]
pub fn run_simulation(input_json: &str) -> std::result::Result<JsValue, JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let report = simulate_report(input_json).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    serde_wasm_bindgen::to_value(&report).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn strategy_presets() -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&presets()).map_err(|e| JsValue::from_str(&e.to_string()))
}
