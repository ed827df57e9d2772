pub mod outcome;
pub mod parameters;
pub mod strategy;
