use std::io::{self, Write};

use marketsim::prelude::*;
use serde::Serialize;

const BAR_WIDTH: usize = 40;
const SCATTER_PREVIEW_ROWS: usize = 10;

/// One line of `marketsim compare`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub strategy: Strategy,
    pub price: f64,
    pub base_demand: f64,
    pub summary: SummaryStatistics,
}

/// Formats `value` with `decimals` digits and thousands separators.
pub fn format_amount(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

pub fn write_report<W: Write>(out: &mut W, report: &StrategyReport) -> io::Result<()> {
    let p = &report.parameters;
    writeln!(out, "Strategy: {}", p.strategy())?;
    writeln!(
        out,
        "  price {}  cost {}  elasticity {}  market {}  trials {}  noise {:.1}%  seed {}",
        format_amount(p.price(), 2),
        format_amount(p.cost(), 2),
        p.elasticity(),
        format_amount(p.market_size(), 0),
        p.trial_count(),
        p.noise_fraction() * 100.0,
        report.seed
    )?;
    writeln!(out, "  base demand {}", format_amount(report.base_demand, 2))?;
    writeln!(out)?;

    writeln!(out, "Simulation summary")?;
    write_summary(out, &report.summary)?;
    writeln!(out)?;

    let d = &report.profit_distribution;
    writeln!(out, "Profit distribution ($)")?;
    writeln!(out, "  std dev  {:>16}", format_amount(d.std_dev, 2))?;
    for (label, value) in [
        ("min", d.min),
        ("p5", d.p5),
        ("p25", d.p25),
        ("median", d.median),
        ("p75", d.p75),
        ("p95", d.p95),
        ("max", d.max),
    ] {
        writeln!(out, "  {:<7}  {:>16}", label, format_amount(value, 2))?;
    }
    writeln!(out)?;

    writeln!(out, "Profit histogram ($)")?;
    write_histogram(out, &report.profit_histogram)?;
    writeln!(out)?;

    let preview = report.scatter_sample.len().min(SCATTER_PREVIEW_ROWS);
    writeln!(
        out,
        "Revenue vs demand sample ({} of {} sampled rows)",
        preview,
        report.scatter_sample.len()
    )?;
    write_rows(out, &report.scatter_sample.head(preview))?;
    writeln!(out)?;

    writeln!(out, "Raw simulation data (first {} rows)", report.head.len())?;
    write_rows(out, &report.head)
}

pub fn write_summary<W: Write>(out: &mut W, summary: &SummaryStatistics) -> io::Result<()> {
    writeln!(
        out,
        "  Avg Revenue ($)    {:>16}",
        format_amount(summary.mean_revenue, 2)
    )?;
    writeln!(
        out,
        "  Avg Profit ($)     {:>16}",
        format_amount(summary.mean_profit, 2)
    )?;
    writeln!(
        out,
        "  Break-even Chance  {:>15.2}%",
        summary.breakeven_chance * 100.0
    )
}

pub fn write_histogram<W: Write>(out: &mut W, histogram: &Histogram) -> io::Result<()> {
    let peak = histogram.counts().iter().copied().max().unwrap_or(0).max(1);
    for (lo, hi, count) in histogram.iter() {
        let bar = "#".repeat(count * BAR_WIDTH / peak);
        writeln!(
            out,
            "  {:>14} .. {:>14} | {:<width$} {}",
            format_amount(lo, 2),
            format_amount(hi, 2),
            bar,
            count,
            width = BAR_WIDTH
        )?;
    }
    Ok(())
}

pub fn write_rows<W: Write>(out: &mut W, rows: &SimulationResult) -> io::Result<()> {
    writeln!(out, "  {:>12} {:>16} {:>16}", "Demand", "Revenue", "Profit")?;
    for row in rows.rows() {
        writeln!(
            out,
            "  {:>12.2} {:>16.2} {:>16.2}",
            row.demand, row.revenue, row.profit
        )?;
    }
    Ok(())
}

pub fn write_comparison<W: Write>(out: &mut W, rows: &[ComparisonRow]) -> io::Result<()> {
    writeln!(
        out,
        "{:<12} {:>8} {:>14} {:>16} {:>16} {:>10}",
        "Strategy", "Price", "Base demand", "Avg Revenue", "Avg Profit", "Break-even"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<12} {:>8} {:>14} {:>16} {:>16} {:>9.2}%",
            row.strategy.to_string(),
            format_amount(row.price, 2),
            format_amount(row.base_demand, 0),
            format_amount(row.summary.mean_revenue, 2),
            format_amount(row.summary.mean_profit, 2),
            row.summary.breakeven_chance * 100.0
        )?;
    }
    Ok(())
}
