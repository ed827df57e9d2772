use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use marketsim::prelude::*;
use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_STRATEGY: Strategy = Strategy::LowPrice;
pub const DEFAULT_CUSTOM_PRICE: f64 = 5.0;
pub const DEFAULT_COST: f64 = 2.0;
pub const DEFAULT_ELASTICITY: f64 = 1.0;
pub const DEFAULT_MARKET_SIZE: f64 = 10_000.0;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Parser)]
#[command(
    name = "marketsim",
    version,
    about = "Simulate revenue and profit of a pricing strategy before launch"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Simulate one strategy and print its report
    Run(RunArgs),
    /// Simulate every strategy on the same inputs and compare them
    Compare(CompareArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub params: ParameterArgs,
    /// Number of profit histogram bins
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    pub bins: usize,
    /// Raw rows shown from the start of the table
    #[arg(long, default_value_t = DEFAULT_HEAD_ROWS)]
    pub head: usize,
    /// Size of the random demand/revenue subsample
    #[arg(long, default_value_t = DEFAULT_SCATTER_ROWS)]
    pub scatter: usize,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn report_options(&self, parallel: bool) -> ReportOptions {
        ReportOptions {
            bins: self.bins,
            head_rows: self.head,
            scatter_rows: self.scatter,
            parallel,
        }
    }
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub params: ParameterArgs,
    /// Print the comparison as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Default, Args)]
pub struct ParameterArgs {
    /// JSON parameter file; flags take precedence over its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// low-price, premium, penetration or custom
    #[arg(long, value_parser = parse_strategy)]
    pub strategy: Option<Strategy>,
    /// Unit price, used by the custom strategy
    #[arg(long)]
    pub price: Option<f64>,
    /// Production cost per unit
    #[arg(long)]
    pub cost: Option<f64>,
    /// Price elasticity (0 = insensitive, above 1 = very sensitive)
    #[arg(long)]
    pub elasticity: Option<f64>,
    /// Addressable market size in units
    #[arg(long)]
    pub market_size: Option<f64>,
    /// Number of simulated trials
    #[arg(long)]
    pub trials: Option<usize>,
    /// Demand noise as a fraction of base demand
    #[arg(long)]
    pub noise: Option<f64>,
    /// Seed of the random source
    #[arg(long)]
    pub seed: Option<u64>,
    /// Spread trials over worker threads with per-batch seeds
    #[arg(long)]
    pub parallel: bool,
}

fn parse_strategy(s: &str) -> std::result::Result<Strategy, String> {
    s.parse::<Strategy>().map_err(String::from)
}

/// Parameter document accepted by `--config`. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterFile {
    pub strategy: Option<Strategy>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub elasticity: Option<f64>,
    pub market_size: Option<f64>,
    pub trial_count: Option<usize>,
    pub noise_fraction: Option<f64>,
    pub seed: Option<u64>,
}

impl ParameterFile {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid parameter file")
    }
}

/// Inputs after merging flags, the parameter file and defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    pub strategy: Strategy,
    pub custom_price: f64,
    pub cost: f64,
    pub elasticity: f64,
    pub market_size: f64,
    pub trial_count: usize,
    pub noise_fraction: f64,
    pub seed: u64,
    pub parallel: bool,
}

impl ParameterSet {
    pub fn parameters(&self) -> SimulationParameters {
        self.parameters_for(self.strategy)
    }

    pub fn parameters_for(&self, strategy: Strategy) -> SimulationParameters {
        SimulationParameters::for_strategy(
            strategy,
            self.custom_price,
            self.cost,
            self.elasticity,
            self.market_size,
        )
        .with_trial_count(self.trial_count)
        .with_noise_fraction(self.noise_fraction)
    }
}

impl ParameterArgs {
    pub fn load(&self) -> Result<ParameterSet> {
        let file = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                ParameterFile::from_json_str(&json)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => ParameterFile::default(),
        };
        Ok(self.merge(file))
    }

    pub fn merge(&self, file: ParameterFile) -> ParameterSet {
        let strategy = self.strategy.or(file.strategy).unwrap_or(DEFAULT_STRATEGY);
        let price = self.price.or(file.price);
        if let (Some(price), Some(preset)) = (price, strategy.preset_price()) {
            warn!(%strategy, price, preset, "ignoring price, strategy has a preset price");
        }
        ParameterSet {
            strategy,
            custom_price: price.unwrap_or(DEFAULT_CUSTOM_PRICE),
            cost: self.cost.or(file.cost).unwrap_or(DEFAULT_COST),
            elasticity: self
                .elasticity
                .or(file.elasticity)
                .unwrap_or(DEFAULT_ELASTICITY),
            market_size: self
                .market_size
                .or(file.market_size)
                .unwrap_or(DEFAULT_MARKET_SIZE),
            trial_count: self
                .trials
                .or(file.trial_count)
                .unwrap_or(DEFAULT_TRIAL_COUNT),
            noise_fraction: self
                .noise
                .or(file.noise_fraction)
                .unwrap_or(DEFAULT_NOISE_FRACTION),
            seed: self.seed.or(file.seed).unwrap_or(DEFAULT_SEED),
            parallel: self.parallel,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["marketsim", "run"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let set = args.params.merge(ParameterFile::default());
        assert_eq!(set.strategy, Strategy::LowPrice);
        assert_eq!(set.seed, 42);
        let params = set.parameters();
        assert_eq!(params.price(), 3.0);
        assert_eq!(params.cost(), 2.0);
        assert_eq!(params.elasticity(), 1.0);
        assert_eq!(params.market_size(), 10_000.0);
        assert_eq!(params.trial_count(), 10_000);
        assert_eq!(params.noise_fraction(), 0.05);
        assert_eq!(args.report_options(set.parallel), ReportOptions::default());
    }

    #[test]
    fn test_flags_override_file() {
        let cli = Cli::try_parse_from([
            "marketsim",
            "run",
            "--strategy",
            "custom",
            "--price",
            "7.5",
            "--trials",
            "200",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let file = ParameterFile::from_json_str(
            r#"{"strategy": "premium", "price": 4.0, "cost": 1.5, "trial_count": 50, "seed": 9}"#,
        )
        .unwrap();
        let set = args.params.merge(file);
        assert_eq!(set.strategy, Strategy::Custom);
        assert_eq!(set.custom_price, 7.5);
        assert_eq!(set.cost, 1.5);
        assert_eq!(set.trial_count, 200);
        assert_eq!(set.seed, 9);
    }

    #[test]
    fn test_compare_parameters_per_strategy() {
        let cli = Cli::try_parse_from(["marketsim", "compare", "--price", "6"]).unwrap();
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        let set = args.params.merge(ParameterFile::default());
        assert_eq!(set.parameters_for(Strategy::Premium).price(), 10.0);
        assert_eq!(set.parameters_for(Strategy::Custom).price(), 6.0);
        assert_eq!(
            set.parameters_for(Strategy::Penetration).strategy(),
            Strategy::Penetration
        );
    }

    #[test]
    fn test_rejects_unknown_strategy() {
        assert!(Cli::try_parse_from(["marketsim", "run", "--strategy", "skimming"]).is_err());
    }

    #[test]
    fn test_load_config_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            r#"{{"strategy": "custom", "price": 4.5, "cost": 1.25, "market_size": 800, "seed": 11}}"#
        )?;
        let args = ParameterArgs {
            config: Some(file.path().to_path_buf()),
            trials: Some(250),
            parallel: true,
            ..Default::default()
        };
        let set = args.load()?;
        assert_eq!(set.strategy, Strategy::Custom);
        assert_eq!(set.custom_price, 4.5);
        assert_eq!(set.cost, 1.25);
        assert_eq!(set.market_size, 800.0);
        assert_eq!(set.trial_count, 250);
        assert_eq!(set.seed, 11);
        assert_eq!(set.elasticity, DEFAULT_ELASTICITY);
        assert!(set.parallel);
        Ok(())
    }

    #[test]
    fn test_load_reports_bad_config() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let missing = ParameterArgs {
            config: Some(dir.path().join("missing.json")),
            ..Default::default()
        };
        assert!(format!("{:#}", missing.load().unwrap_err()).contains("reading"));

        let path = dir.path().join("params.json");
        fs::write(&path, r#"{"prise": 3.0}"#)?;
        let invalid = ParameterArgs {
            config: Some(path),
            ..Default::default()
        };
        assert!(format!("{:#}", invalid.load().unwrap_err()).contains("parsing"));
        Ok(())
    }

    #[test]
    fn test_rejects_unknown_file_field() {
        assert!(ParameterFile::from_json_str(r#"{"prise": 3.0}"#).is_err());
    }
}
