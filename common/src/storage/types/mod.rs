pub mod graph_metadata;
pub mod linked_data;
pub mod node_link;
pub mod raw_exercise;
