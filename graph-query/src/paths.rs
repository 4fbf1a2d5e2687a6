use std::collections::HashSet;

use crate::graph::{node_positions, prerequisite_map, ExerciseGraph, ExerciseNode, LinkSelection};

/// Single-node subgraph for `id`.
pub fn find_exercise<G: ExerciseGraph>(graph: &G, id: &str) -> Option<G> {
    let position = *node_positions(graph).get(id)?;
    Some(graph.subgraph(&[position], LinkSelection::Induced))
}

/// `id` followed by every exercise it transitively depends on, depth-first.
///
/// All alternatives of a `oneOf` group are followed. Each node appears once, at its
/// first visit, so diamonds and cycles terminate. Prerequisites naming unknown
/// exercises are skipped.
pub fn dependency_path<G: ExerciseGraph>(graph: &G, id: &str) -> Option<G> {
    let positions = node_positions(graph);
    let start = *positions.get(id)?;
    let prerequisites = prerequisite_map(graph);

    let mut visited: HashSet<&str> = HashSet::from([id]);
    let mut order = vec![start];
    // (node id, index of the next prerequisite to visit)
    let mut stack: Vec<(&str, usize)> = vec![(id, 0)];

    while let Some(frame) = stack.last_mut() {
        let (current, cursor) = *frame;
        frame.1 = cursor.saturating_add(1);

        let next = prerequisites
            .get(current)
            .and_then(|deps| deps.get(cursor))
            .copied();

        match next {
            Some(next) => {
                if !visited.insert(next) {
                    continue;
                }
                if let Some(&position) = positions.get(next) {
                    order.push(position);
                    stack.push((next, 0));
                }
            }
            None => {
                stack.pop();
            }
        }
    }

    Some(graph.subgraph(&order, LinkSelection::Induced))
}

/// Exercises without prerequisites.
pub fn start_nodes<G: ExerciseGraph>(graph: &G) -> G {
    let prerequisites = prerequisite_map(graph);
    let positions: Vec<usize> = graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| {
            prerequisites
                .get(node.id())
                .map_or(true, |deps| deps.is_empty())
        })
        .map(|(position, _)| position)
        .collect();

    graph.subgraph(&positions, LinkSelection::Induced)
}

/// Exercises no other exercise names as a prerequisite, including inside `oneOf` groups.
pub fn end_nodes<G: ExerciseGraph>(graph: &G) -> G {
    let required: HashSet<&str> = graph
        .dependency_edges()
        .into_iter()
        .filter(|(prerequisite, dependent)| prerequisite != dependent)
        .map(|(prerequisite, _)| prerequisite)
        .collect();

    let positions: Vec<usize> = graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| !required.contains(node.id()))
        .map(|(position, _)| position)
        .collect();

    graph.subgraph(&positions, LinkSelection::Induced)
}
