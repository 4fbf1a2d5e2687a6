use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::graph_metadata::GraphMetadata;

pub const EXERCISE_TYPE: &str = "Exercise";
pub const PERSON_TYPE: &str = "Person";

/// A prerequisite of an exercise: either one exercise or any one of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    Direct(String),
    OneOf {
        #[serde(rename = "oneOf")]
        one_of: Vec<String>,
    },
}

impl Dependency {
    /// Every exercise that could satisfy this prerequisite.
    pub fn candidates(&self) -> &[String] {
        match self {
            Self::Direct(id) => std::slice::from_ref(id),
            Self::OneOf { one_of } => one_of,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "@type")]
    pub person_type: String,
    pub name: String,
}

impl Person {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            person_type: PERSON_TYPE.to_string(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedDataNode {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teaches: Vec<String>,
    #[serde(rename = "dependsOn", default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<Person>,
    #[serde(
        rename = "publishedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

/// The JSON-LD document: `@context`, graph metadata and the `@graph` node list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedDataGraph {
    #[serde(rename = "@context")]
    pub context: Value,
    #[serde(flatten)]
    pub metadata: GraphMetadata,
    #[serde(rename = "@graph", default)]
    pub graph: Vec<LinkedDataNode>,
}

impl LinkedDataGraph {
    /// Same context and metadata, different node set.
    #[must_use]
    pub fn with_nodes(&self, graph: Vec<LinkedDataNode>) -> Self {
        Self {
            context: self.context.clone(),
            metadata: self.metadata.clone(),
            graph,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_json_ld_member_names() {
        let node = LinkedDataNode {
            id: "a".into(),
            node_type: EXERCISE_TYPE.into(),
            teaches: vec!["loops".into()],
            depends_on: vec![
                Dependency::Direct("b".into()),
                Dependency::OneOf {
                    one_of: vec!["c".into(), "d".into()],
                },
            ],
            author: vec![Person::named("Jane Doe")],
            published_at: Some("2024-01-01".into()),
            keywords: Vec::new(),
        };

        let value = serde_json::to_value(&node).expect("serialize");
        assert_eq!(
            value,
            json!({
                "@id": "a",
                "@type": "Exercise",
                "teaches": ["loops"],
                "dependsOn": ["b", {"oneOf": ["c", "d"]}],
                "author": [{"@type": "Person", "name": "Jane Doe"}],
                "publishedAt": "2024-01-01"
            })
        );

        let back: LinkedDataNode = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, node);
    }

    #[test]
    fn dependency_candidates_cover_groups() {
        assert_eq!(Dependency::Direct("b".into()).candidates(), ["b".to_string()]);
        let group = Dependency::OneOf {
            one_of: vec!["c".into(), "d".into()],
        };
        assert_eq!(group.candidates().len(), 2);
    }
}
