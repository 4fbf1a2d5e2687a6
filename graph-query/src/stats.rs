use serde::Serialize;

use crate::{
    graph::{ExerciseGraph, TagField},
    tags::{tag_count, tag_list},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "keywordCountDistinct")]
    pub keyword_count_distinct: usize,
    #[serde(rename = "keywordCountTotal")]
    pub keyword_count_total: usize,
    #[serde(rename = "nodeCount")]
    pub node_count: usize,
}

/// Keyword counts are case-insensitive.
pub fn statistics<G: ExerciseGraph>(graph: &G) -> Statistics {
    Statistics {
        kind: "Statistics",
        keyword_count_distinct: tag_list(graph, TagField::Keywords, false).len(),
        keyword_count_total: tag_count(graph, TagField::Keywords, false)
            .values()
            .fold(0_usize, |total, count| total.saturating_add(*count)),
        node_count: graph.nodes().len(),
    }
}
