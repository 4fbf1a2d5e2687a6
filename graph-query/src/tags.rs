use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet},
};

use serde::Deserialize;

use crate::graph::{ExerciseGraph, ExerciseNode, LinkSelection, TagField};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Exact,
    Partial,
}

fn normalize(value: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(value.to_lowercase())
    }
}

fn normalized_values<'a, N: ExerciseNode>(
    node: &'a N,
    field: TagField,
    case_sensitive: bool,
) -> impl Iterator<Item = Cow<'a, str>> {
    node.tag_values(field)
        .into_iter()
        .map(move |value| normalize(value, case_sensitive))
}

/// Occurrences of every distinct value of `field` across all nodes.
pub fn tag_count<G: ExerciseGraph>(
    graph: &G,
    field: TagField,
    case_sensitive: bool,
) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for node in graph.nodes() {
        for value in normalized_values(node, field, case_sensitive) {
            let count = counts.entry(value.into_owned()).or_insert(0_usize);
            *count = count.saturating_add(1);
        }
    }
    counts
}

/// Sorted distinct values of `field`.
pub fn tag_list<G: ExerciseGraph>(graph: &G, field: TagField, case_sensitive: bool) -> Vec<String> {
    graph
        .nodes()
        .iter()
        .flat_map(|node| normalized_values(node, field, case_sensitive))
        .map(Cow::into_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Nodes where any value of `field` matches `term`, plus every link touching them.
pub fn search_by_tag<G: ExerciseGraph>(
    graph: &G,
    field: TagField,
    term: &str,
    mode: MatchMode,
    case_sensitive: bool,
) -> G {
    let term = normalize(term, case_sensitive);
    let positions: Vec<usize> = graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| {
            normalized_values(*node, field, case_sensitive).any(|value| match mode {
                MatchMode::Exact => value == term,
                MatchMode::Partial => value.contains(&*term),
            })
        })
        .map(|(position, _)| position)
        .collect();

    graph.subgraph(&positions, LinkSelection::Touching)
}
