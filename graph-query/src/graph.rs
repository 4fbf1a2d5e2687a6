use std::collections::{HashMap, HashSet};

use common::storage::types::{
    linked_data::{LinkedDataGraph, LinkedDataNode},
    node_link::{FlatNode, NodeLinkGraph},
};

/// Tag-like fields a query can read from an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    /// Author names; read through the `name` member of linked-data `Person` entries.
    Author,
    Keywords,
    Teaches,
}

impl TagField {
    /// Field name used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Keywords => "keyword",
            Self::Teaches => "teaches",
        }
    }
}

/// Which links a node-link subgraph keeps for a selected node set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSelection {
    /// Links with both ends selected.
    Induced,
    /// Links with at least one end selected.
    Touching,
}

pub trait ExerciseNode {
    fn id(&self) -> &str;
    fn tag_values(&self, field: TagField) -> Vec<&str>;
}

pub trait ExerciseGraph: Sized {
    type Node: ExerciseNode + Clone;

    fn nodes(&self) -> &[Self::Node];

    /// `(prerequisite, dependent)` pairs, in node order.
    fn dependency_edges(&self) -> Vec<(&str, &str)>;

    /// New graph holding the nodes at `positions`, in that order.
    fn subgraph(&self, positions: &[usize], selection: LinkSelection) -> Self;

    fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }
}

impl ExerciseNode for LinkedDataNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn tag_values(&self, field: TagField) -> Vec<&str> {
        match field {
            TagField::Author => self.author.iter().map(|person| person.name.as_str()).collect(),
            TagField::Keywords => self.keywords.iter().map(String::as_str).collect(),
            TagField::Teaches => self.teaches.iter().map(String::as_str).collect(),
        }
    }
}

impl ExerciseNode for FlatNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn tag_values(&self, field: TagField) -> Vec<&str> {
        let values = match field {
            TagField::Author => &self.author,
            TagField::Keywords => &self.keywords,
            TagField::Teaches => &self.teaches,
        };
        values.iter().map(String::as_str).collect()
    }
}

impl ExerciseGraph for LinkedDataGraph {
    type Node = LinkedDataNode;

    fn nodes(&self) -> &[LinkedDataNode] {
        &self.graph
    }

    fn dependency_edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .iter()
            .flat_map(|node| {
                node.depends_on
                    .iter()
                    .flat_map(|dependency| dependency.candidates())
                    .map(move |prerequisite| (prerequisite.as_str(), node.id.as_str()))
            })
            .collect()
    }

    fn subgraph(&self, positions: &[usize], _selection: LinkSelection) -> Self {
        self.with_nodes(select(&self.graph, positions))
    }
}

impl ExerciseGraph for NodeLinkGraph {
    type Node = FlatNode;

    fn nodes(&self) -> &[FlatNode] {
        &self.nodes
    }

    fn dependency_edges(&self) -> Vec<(&str, &str)> {
        self.links
            .iter()
            .map(|link| (link.source.as_str(), link.target.as_str()))
            .collect()
    }

    fn subgraph(&self, positions: &[usize], selection: LinkSelection) -> Self {
        let nodes = select(&self.nodes, positions);
        let selected: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
        let links = self
            .links
            .iter()
            .filter(|link| {
                let source = selected.contains(link.source.as_str());
                let target = selected.contains(link.target.as_str());
                match selection {
                    LinkSelection::Induced => source && target,
                    LinkSelection::Touching => source || target,
                }
            })
            .cloned()
            .collect();

        Self { nodes, links }
    }
}

fn select<T: Clone>(items: &[T], positions: &[usize]) -> Vec<T> {
    positions
        .iter()
        .filter_map(|&position| items.get(position).cloned())
        .collect()
}

/// First position of every node id.
pub(crate) fn node_positions<G: ExerciseGraph>(graph: &G) -> HashMap<&str, usize> {
    let mut positions = HashMap::with_capacity(graph.nodes().len());
    for (position, node) in graph.nodes().iter().enumerate() {
        positions.entry(node.id()).or_insert(position);
    }
    positions
}

/// Dependent id to its prerequisite ids, in declaration order.
pub(crate) fn prerequisite_map<G: ExerciseGraph>(graph: &G) -> HashMap<&str, Vec<&str>> {
    let mut prerequisites: HashMap<&str, Vec<&str>> = HashMap::new();
    for (prerequisite, dependent) in graph.dependency_edges() {
        prerequisites.entry(dependent).or_default().push(prerequisite);
    }
    prerequisites
}
