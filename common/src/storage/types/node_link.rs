use serde::{Deserialize, Serialize};

use super::linked_data::{Dependency, LinkedDataNode};

/// Flattened exercise node consumed by force-directed visualizers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teaches: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<String>,
    #[serde(
        rename = "publishedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

/// Edge from a prerequisite (`source`) to the exercise requiring it (`target`).
///
/// Links produced from a `oneOf` group carry the position of that group inside the
/// target's `dependsOn` list, so alternatives stay distinguishable from hard requirements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    #[serde(rename = "oneOfGroup", default, skip_serializing_if = "Option::is_none")]
    pub one_of_group: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLinkGraph {
    #[serde(default)]
    pub nodes: Vec<FlatNode>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl From<&LinkedDataNode> for FlatNode {
    fn from(node: &LinkedDataNode) -> Self {
        Self {
            id: node.id.clone(),
            node_type: node.node_type.clone(),
            teaches: node.teaches.clone(),
            author: node.author.iter().map(|person| person.name.clone()).collect(),
            published_at: node.published_at.clone(),
            keywords: node.keywords.clone(),
        }
    }
}

impl NodeLinkGraph {
    /// Derives nodes and links from linked-data nodes so both representations agree.
    pub fn from_linked_data(nodes: &[LinkedDataNode]) -> Self {
        let mut links = Vec::new();
        for node in nodes {
            for (position, dependency) in node.depends_on.iter().enumerate() {
                match dependency {
                    Dependency::Direct(source) => links.push(Link {
                        source: source.clone(),
                        target: node.id.clone(),
                        one_of_group: None,
                    }),
                    Dependency::OneOf { one_of } => {
                        links.extend(one_of.iter().map(|source| Link {
                            source: source.clone(),
                            target: node.id.clone(),
                            one_of_group: Some(position),
                        }));
                    }
                }
            }
        }

        Self {
            nodes: nodes.iter().map(FlatNode::from).collect(),
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::linked_data::{Person, EXERCISE_TYPE};
    use serde_json::json;

    fn node(id: &str, depends_on: Vec<Dependency>) -> LinkedDataNode {
        LinkedDataNode {
            id: id.into(),
            node_type: EXERCISE_TYPE.into(),
            teaches: Vec::new(),
            depends_on,
            author: vec![Person::named("Jane Doe")],
            published_at: None,
            keywords: vec!["x".into()],
        }
    }

    #[test]
    fn flattens_direct_and_grouped_dependencies() {
        let nodes = vec![
            node(
                "a",
                vec![
                    Dependency::Direct("b".into()),
                    Dependency::OneOf {
                        one_of: vec!["c".into(), "d".into()],
                    },
                ],
            ),
            node("b", Vec::new()),
        ];

        let graph = NodeLinkGraph::from_linked_data(&nodes);

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].author, vec!["Jane Doe".to_string()]);
        assert_eq!(
            serde_json::to_value(&graph.links).expect("serialize"),
            json!([
                {"source": "b", "target": "a"},
                {"source": "c", "target": "a", "oneOfGroup": 1},
                {"source": "d", "target": "a", "oneOfGroup": 1}
            ])
        );
    }
}
