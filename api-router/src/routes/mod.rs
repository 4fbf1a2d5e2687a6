pub mod aggregates;
pub mod exercises;
pub mod liveness;
pub mod refresh;
pub mod root;
pub mod statistics;
