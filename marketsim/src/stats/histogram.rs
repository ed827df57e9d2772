use serde::{Deserialize, Serialize};

use crate::prelude::*;

pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

/// Equal-width histogram. Bins are half-open `[lo, hi)` except the last,
/// which also holds the maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<usize>,
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(SimulationError::InvalidParameter(
                "histogram bins must be > 0".to_string(),
            ));
        }
        if values.is_empty() {
            return Err(SimulationError::EmptySample(
                "cannot bin an empty column".to_string(),
            ));
        }

        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        // edges must stay distinct at the magnitude of the data
        let resolution = lo.abs().max(hi.abs()) * f64::EPSILON * bins as f64;
        if lo == hi {
            let pad = resolution.max(0.5);
            lo -= pad;
            hi += pad;
        } else if hi - lo < 2.0 * resolution {
            lo -= resolution;
            hi += resolution;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| if i == bins { hi } else { lo + width * i as f64 })
            .collect();

        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Self { edges, counts })
    }

    /// Profit histogram of a run.
    pub fn of_profit(result: &SimulationResult, bins: usize) -> Result<Self> {
        Self::new(result.profit(), bins)
    }

    /// `bins + 1` ascending bin edges.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(lower edge, upper edge, count)` per bin.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }
}
