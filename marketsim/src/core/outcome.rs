use rand::{seq::index, Rng};
use serde::{Deserialize, Serialize};

/// One simulated trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSample {
    pub demand: f64,
    pub revenue: f64,
    pub profit: f64,
}

impl OutcomeSample {
    /// Derives revenue and profit from an already clamped demand.
    pub fn new(demand: f64, price: f64, cost: f64) -> Self {
        Self {
            demand,
            revenue: demand * price,
            profit: demand * (price - cost),
        }
    }
}

/// Column-aligned table of trial outcomes, in trial order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    demand: Vec<f64>,
    revenue: Vec<f64>,
    profit: Vec<f64>,
}

impl SimulationResult {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            demand: Vec::with_capacity(capacity),
            revenue: Vec::with_capacity(capacity),
            profit: Vec::with_capacity(capacity),
        }
    }

    /// Builds the table from clamped demands, deriving the other two columns.
    pub fn from_demand(demand: Vec<f64>, price: f64, cost: f64) -> Self {
        let margin = price - cost;
        let revenue = demand.iter().map(|d| d * price).collect();
        let profit = demand.iter().map(|d| d * margin).collect();
        Self {
            demand,
            revenue,
            profit,
        }
    }

    pub fn push(&mut self, sample: OutcomeSample) {
        self.demand.push(sample.demand);
        self.revenue.push(sample.revenue);
        self.profit.push(sample.profit);
    }

    /// Moves every row of `other` to the end of `self`.
    pub fn append(&mut self, other: &mut SimulationResult) {
        self.demand.append(&mut other.demand);
        self.revenue.append(&mut other.revenue);
        self.profit.append(&mut other.profit);
    }

    pub fn len(&self) -> usize {
        self.demand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demand.is_empty()
    }

    pub fn demand(&self) -> &[f64] {
        &self.demand
    }

    pub fn revenue(&self) -> &[f64] {
        &self.revenue
    }

    pub fn profit(&self) -> &[f64] {
        &self.profit
    }

    pub fn get(&self, index: usize) -> Option<OutcomeSample> {
        Some(OutcomeSample {
            demand: *self.demand.get(index)?,
            revenue: *self.revenue.get(index)?,
            profit: *self.profit.get(index)?,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = OutcomeSample> + '_ {
        self.demand
            .iter()
            .zip(&self.revenue)
            .zip(&self.profit)
            .map(|((&demand, &revenue), &profit)| OutcomeSample {
                demand,
                revenue,
                profit,
            })
    }

    /// First `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> SimulationResult {
        let n = n.min(self.len());
        Self {
            demand: self.demand[..n].to_vec(),
            revenue: self.revenue[..n].to_vec(),
            profit: self.profit[..n].to_vec(),
        }
    }

    /// `n` distinct rows drawn uniformly without replacement, kept in trial
    /// order. Returns every row when `n >= len()`.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> SimulationResult {
        let n = n.min(self.len());
        let mut indices = index::sample(rng, self.len(), n).into_vec();
        indices.sort_unstable();
        indices
            .into_iter()
            .filter_map(|i| self.get(i))
            .collect()
    }
}

impl FromIterator<OutcomeSample> for SimulationResult {
    fn from_iter<I: IntoIterator<Item = OutcomeSample>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut result = SimulationResult::with_capacity(iter.size_hint().0);
        iter.for_each(|sample| result.push(sample));
        result
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn table() -> SimulationResult {
        SimulationResult::from_demand((0..10).map(f64::from).collect(), 3.0, 2.0)
    }

    #[test]
    fn test_from_demand_derives_columns() {
        let result = table();
        assert_eq!(result.len(), 10);
        for (i, row) in result.rows().enumerate() {
            assert_eq!(row.demand, i as f64);
            assert_eq!(row.revenue, row.demand * 3.0);
            assert_eq!(row.profit, row.demand * (3.0 - 2.0));
        }
        assert_eq!(result.get(4), Some(OutcomeSample::new(4.0, 3.0, 2.0)));
        assert_eq!(result.get(10), None);
    }

    #[test]
    fn test_head() {
        let result = table();
        let head = result.head(3);
        assert_eq!(head.demand(), &[0.0, 1.0, 2.0]);
        assert_eq!(head.revenue(), &[0.0, 3.0, 6.0]);
        assert_eq!(result.head(100).len(), 10);
        assert!(result.head(0).is_empty());
    }

    #[test]
    fn test_sample_is_ordered_subset() {
        let result = table();
        let mut rng = StdRng::seed_from_u64(7);
        let sample = result.sample(4, &mut rng);
        assert_eq!(sample.len(), 4);
        assert!(sample.demand().windows(2).all(|w| w[0] < w[1]));
        for row in sample.rows() {
            assert_eq!(result.get(row.demand as usize), Some(row));
        }
        assert_eq!(result.sample(50, &mut rng), result);
    }

    #[test]
    fn test_sample_reproducible() {
        let result = table();
        let a = result.sample(5, &mut StdRng::seed_from_u64(11));
        let b = result.sample(5, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn test_collect_and_append() {
        let mut left: SimulationResult = (0..2)
            .map(|d| OutcomeSample::new(d as f64, 2.0, 1.0))
            .collect();
        let mut right = SimulationResult::from_demand(vec![5.0], 2.0, 1.0);
        left.append(&mut right);
        assert!(right.is_empty());
        assert_eq!(left.demand(), &[0.0, 1.0, 5.0]);
        assert_eq!(left.profit(), &[0.0, 1.0, 5.0]);
    }
}
