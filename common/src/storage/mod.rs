pub mod atomic;
pub mod graph_store;
pub mod metadata_store;
pub mod types;
