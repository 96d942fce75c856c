pub mod aggregation;
pub mod refresh;
