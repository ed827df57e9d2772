pub mod distribution;
pub mod histogram;
pub mod report;
pub mod summary;
