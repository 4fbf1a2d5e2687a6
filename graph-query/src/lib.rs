#![allow(clippy::missing_docs_in_private_items)]

//! Read-only queries over a loaded exercise graph.
//!
//! Every query is generic over [`ExerciseGraph`], implemented for both the linked-data
//! and the node-link representation, so results agree regardless of the format asked for.

mod graph;
pub mod paths;
pub mod stats;
pub mod tags;

#[cfg(test)]
mod fixtures;

pub use graph::{ExerciseGraph, ExerciseNode, LinkSelection, TagField};
pub use paths::{dependency_path, end_nodes, find_exercise, start_nodes};
pub use stats::{statistics, Statistics};
pub use tags::{search_by_tag, tag_count, tag_list, MatchMode};
