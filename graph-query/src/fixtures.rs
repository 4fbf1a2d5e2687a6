use common::storage::types::{
    graph_metadata::GraphMetadata,
    linked_data::{Dependency, LinkedDataGraph, LinkedDataNode, Person, EXERCISE_TYPE},
    node_link::NodeLinkGraph,
};
use serde_json::json;

use crate::{ExerciseGraph, ExerciseNode};

pub fn exercise(id: &str, depends_on: &[&str]) -> LinkedDataNode {
    LinkedDataNode {
        id: id.into(),
        node_type: EXERCISE_TYPE.into(),
        teaches: Vec::new(),
        depends_on: depends_on
            .iter()
            .map(|dep| Dependency::Direct((*dep).to_string()))
            .collect(),
        author: Vec::new(),
        published_at: None,
        keywords: Vec::new(),
    }
}

pub fn with_keywords(mut node: LinkedDataNode, keywords: &[&str]) -> LinkedDataNode {
    node.keywords = keywords.iter().map(|k| (*k).to_string()).collect();
    node
}

pub fn with_authors(mut node: LinkedDataNode, authors: &[&str]) -> LinkedDataNode {
    node.author = authors.iter().map(|name| Person::named(*name)).collect();
    node
}

pub fn with_teaches(mut node: LinkedDataNode, teaches: &[&str]) -> LinkedDataNode {
    node.teaches = teaches.iter().map(|t| (*t).to_string()).collect();
    node
}

pub fn with_one_of(mut node: LinkedDataNode, alternatives: &[&str]) -> LinkedDataNode {
    node.depends_on.push(Dependency::OneOf {
        one_of: alternatives.iter().map(|a| (*a).to_string()).collect(),
    });
    node
}

pub fn linked_data(nodes: Vec<LinkedDataNode>) -> LinkedDataGraph {
    LinkedDataGraph {
        context: json!({"schema": "https://schema.org/"}),
        metadata: GraphMetadata {
            id: "https://example.com/".into(),
            generated_by: json!({"@type": "schema:Organization"}),
            generated_at: "2024-01-01T00:00:00.000000Z".into(),
        },
        graph: nodes,
    }
}

/// The same exercises in both representations.
pub fn both(nodes: Vec<LinkedDataNode>) -> (LinkedDataGraph, NodeLinkGraph) {
    let node_link = NodeLinkGraph::from_linked_data(&nodes);
    (linked_data(nodes), node_link)
}

pub fn ids<G: ExerciseGraph>(graph: &G) -> Vec<&str> {
    graph.nodes().iter().map(ExerciseNode::id).collect()
}

pub fn sorted_ids<G: ExerciseGraph>(graph: &G) -> Vec<&str> {
    let mut ids = ids(graph);
    ids.sort_unstable();
    ids
}
