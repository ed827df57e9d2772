mod cli;
mod render;

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use marketsim::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, CompareArgs, ParameterSet, RunArgs};
use render::ComparisonRow;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Run(args) => run_strategy(&args, &mut out)?,
        Command::Compare(args) => compare_strategies(&args, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn simulate(set: &ParameterSet, params: &SimulationParameters) -> Result<SimulationResult> {
    let engine = MonteCarloEngine::new();
    let result = if set.parallel {
        engine.par_run(params, set.seed)?
    } else {
        engine.run(params, &mut seeded_rng(set.seed))?
    };
    Ok(result)
}

fn run_strategy<W: Write>(args: &RunArgs, out: &mut W) -> Result<()> {
    let set = args.params.load()?;
    let params = set.parameters();
    info!(strategy = %params.strategy(), seed = set.seed, "simulating strategy");

    let report = StrategyReport::build(&params, set.seed, args.report_options(set.parallel))?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        render::write_report(out, &report)?;
    }
    Ok(())
}

fn compare_strategies<W: Write>(args: &CompareArgs, out: &mut W) -> Result<()> {
    let set = args.params.load()?;
    let rows = Strategy::ALL
        .iter()
        .map(|&strategy| -> Result<ComparisonRow> {
            let params = set.parameters_for(strategy);
            info!(%strategy, price = params.price(), "simulating strategy");
            let result = simulate(&set, &params)?;
            Ok(ComparisonRow {
                strategy,
                price: params.price(),
                base_demand: LinearElasticityModel.base_demand(&params),
                summary: SummaryStatistics::from_result(&result)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
    } else {
        render::write_comparison(out, &rows)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ParameterArgs, ParameterFile};

    fn parameter_set(parallel: bool) -> ParameterSet {
        ParameterArgs {
            trials: Some(5_000),
            parallel,
            ..Default::default()
        }
        .merge(ParameterFile::default())
    }

    #[test]
    fn test_simulate_parallel_branch() -> Result<()> {
        let set = parameter_set(true);
        let params = set.parameters();
        let result = simulate(&set, &params)?;
        assert_eq!(result.len(), set.trial_count);
        assert_eq!(result, MonteCarloEngine::new().par_run(&params, set.seed)?);
        Ok(())
    }

    #[test]
    fn test_simulate_sequential_branch() -> Result<()> {
        let set = parameter_set(false);
        let params = set.parameters();
        let result = simulate(&set, &params)?;
        assert_eq!(result.len(), 5_000);
        assert_eq!(result, run(&params, &mut seeded_rng(set.seed))?);
        Ok(())
    }

    #[test]
    fn test_run_report_matches_library_build() -> Result<()> {
        let cli = Cli::try_parse_from([
            "marketsim", "run", "--trials", "5000", "--parallel", "--scatter", "30", "--json",
        ])?;
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let mut out = Vec::new();
        run_strategy(&args, &mut out)?;
        let printed: serde_json::Value = serde_json::from_slice(&out)?;

        let set = args.params.load()?;
        let expected =
            StrategyReport::build(&set.parameters(), set.seed, args.report_options(true))?;
        assert_eq!(
            printed["profit_histogram"]["counts"],
            serde_json::to_value(expected.profit_histogram.counts())?
        );
        let scatter: Vec<f64> = serde_json::from_value(printed["scatter_sample"]["demand"].clone())?;
        assert_eq!(scatter.len(), 30);
        for (printed, expected) in scatter.iter().zip(expected.scatter_sample.demand()) {
            assert!((printed - expected).abs() <= 1e-9 * expected.abs().max(1.0));
        }
        Ok(())
    }
}
