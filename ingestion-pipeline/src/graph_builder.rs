use std::collections::HashSet;

use common::{
    storage::{
        graph_store::GraphSnapshot,
        types::{
            linked_data::{Dependency, LinkedDataGraph, LinkedDataNode, Person, EXERCISE_TYPE},
            node_link::NodeLinkGraph,
            raw_exercise::{OneOrMany, RawDependency, RawExerciseMetadata},
        },
    },
    utils::graph_templates::GraphTemplates,
};
use tracing::warn;

/// Maps one raw record onto its linked-data node. Records without an identifier yield `None`.
pub fn linked_data_node(record: &RawExerciseMetadata) -> Option<LinkedDataNode> {
    let id = record.identifier()?.trim();
    if id.is_empty() {
        return None;
    }

    let depends_on = record
        .depends_on
        .iter()
        .flatten()
        .filter_map(|dependency| match dependency {
            RawDependency::Id(id) => Some(Dependency::Direct(id.clone())),
            RawDependency::Alternatives(ids) | RawDependency::OneOf { one_of: ids } => {
                match ids.as_slice() {
                    [] => None,
                    [single] => Some(Dependency::Direct(single.clone())),
                    _ => Some(Dependency::OneOf {
                        one_of: ids.clone(),
                    }),
                }
            }
        })
        .collect();

    Some(LinkedDataNode {
        id: id.to_string(),
        node_type: EXERCISE_TYPE.to_string(),
        teaches: strings(record.teaches.as_ref()),
        depends_on,
        author: strings(record.author.as_ref())
            .into_iter()
            .map(Person::named)
            .collect(),
        published_at: record.first_used.clone(),
        keywords: strings(record.keywords.as_ref()),
    })
}

fn strings(value: Option<&OneOrMany<String>>) -> Vec<String> {
    value.cloned().map(OneOrMany::into_vec).unwrap_or_default()
}

/// Builds the node list shared by both representations. The first record carrying an
/// identifier wins; later duplicates are dropped.
fn collect_nodes(records: &[RawExerciseMetadata]) -> Vec<LinkedDataNode> {
    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(records.len());

    for record in records {
        let Some(node) = linked_data_node(record) else {
            warn!("raw exercise record without an identifier; skipping");
            continue;
        };
        if !seen.insert(node.id.clone()) {
            warn!(id = %node.id, "duplicate exercise identifier; keeping the first record");
            continue;
        }
        nodes.push(node);
    }

    nodes
}

pub fn build_linked_data_graph(
    records: &[RawExerciseMetadata],
    templates: &GraphTemplates,
) -> LinkedDataGraph {
    LinkedDataGraph {
        context: templates.context.clone(),
        metadata: templates.fresh_metadata(),
        graph: collect_nodes(records),
    }
}

pub fn build_node_link_graph(records: &[RawExerciseMetadata]) -> NodeLinkGraph {
    NodeLinkGraph::from_linked_data(&collect_nodes(records))
}

/// Both representations from one pass over the records, so they cannot disagree.
pub fn build_snapshot(records: &[RawExerciseMetadata], templates: &GraphTemplates) -> GraphSnapshot {
    let nodes = collect_nodes(records);
    let node_link = NodeLinkGraph::from_linked_data(&nodes);

    GraphSnapshot {
        linked_data: LinkedDataGraph {
            context: templates.context.clone(),
            metadata: templates.fresh_metadata(),
            graph: nodes,
        },
        node_link,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::storage::types::node_link::Link;
    use serde_json::json;

    fn templates() -> GraphTemplates {
        GraphTemplates::new(
            "https://example.com/",
            json!({"schema": "https://schema.org/"}),
            json!({"@type": "schema:Organization", "name": "STEMgraph"}),
        )
    }

    fn record(value: serde_json::Value) -> RawExerciseMetadata {
        serde_json::from_value(value).expect("valid record")
    }

    #[test]
    fn maps_raw_fields_onto_linked_data_node() {
        let node = linked_data_node(&record(json!({
            "uuid": "a",
            "teaches": "recursion",
            "depends_on": ["b", ["c", "d"], {"oneOf": ["e"]}],
            "author": ["Jane Doe", "John Roe"],
            "first_used": "2024-03-01",
            "keywords": ["x", "y"]
        })))
        .expect("node");

        assert_eq!(node.id, "a");
        assert_eq!(node.node_type, "Exercise");
        assert_eq!(node.teaches, vec!["recursion"]);
        assert_eq!(
            node.depends_on,
            vec![
                Dependency::Direct("b".into()),
                Dependency::OneOf {
                    one_of: vec!["c".into(), "d".into()]
                },
                Dependency::Direct("e".into()),
            ]
        );
        assert_eq!(
            node.author,
            vec![Person::named("Jane Doe"), Person::named("John Roe")]
        );
        assert_eq!(node.published_at.as_deref(), Some("2024-03-01"));
        assert_eq!(node.keywords, vec!["x", "y"]);
    }

    #[test]
    fn record_without_identifier_is_dropped() {
        let records = vec![
            RawExerciseMetadata::default(),
            record(json!({"id": "a"})),
        ];

        let graph = build_linked_data_graph(&records, &templates());
        assert_eq!(graph.graph.len(), 1);
    }

    #[test]
    fn first_duplicate_wins() {
        let records = vec![
            record(json!({"id": "a", "keywords": ["first"]})),
            record(json!({"id": "a", "keywords": ["second"]})),
        ];

        let graph = build_linked_data_graph(&records, &templates());
        assert_eq!(graph.graph.len(), 1);
        assert_eq!(graph.graph[0].keywords, vec!["first"]);
    }

    #[test]
    fn both_representations_share_node_ids() {
        let records = vec![
            record(json!({"id": "a", "depends_on": ["b"]})),
            record(json!({"id": "b"})),
            record(json!({"id": "c", "depends_on": [{"oneOf": ["a", "b"]}]})),
            record(json!({"id": "a"})),
        ];

        let linked = build_linked_data_graph(&records, &templates());
        let node_link = build_node_link_graph(&records);

        let mut linked_ids: Vec<_> = linked.graph.iter().map(|n| n.id.clone()).collect();
        let mut flat_ids: Vec<_> = node_link.nodes.iter().map(|n| n.id.clone()).collect();
        linked_ids.sort();
        flat_ids.sort();
        assert_eq!(linked_ids, flat_ids);
    }

    #[test]
    fn snapshot_links_follow_dependencies() {
        let records = vec![
            record(json!({"id": "a", "depends_on": ["b"]})),
            record(json!({"id": "b"})),
        ];

        let snapshot = build_snapshot(&records, &templates());
        assert_eq!(
            snapshot.node_link.links,
            vec![Link {
                source: "b".into(),
                target: "a".into(),
                one_of_group: None,
            }]
        );
        assert_eq!(snapshot.linked_data.metadata.id, "https://example.com/");
        assert_eq!(
            snapshot.linked_data.context,
            json!({"schema": "https://schema.org/"})
        );
    }
}
