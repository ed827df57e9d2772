pub mod demand;
pub mod montecarlo;
