use std::collections::HashMap;

use crate::ir::{Edge, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// A connected component with at least one edge.
    Connected,
    /// Every laid-out node without a single incident edge.
    Orphan,
}

/// Disjoint slice of the graph laid out by one delegate call. Members and
/// edges are indices into the caller's node and edge slices, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub kind: GroupKind,
    pub nodes: Vec<usize>,
    pub edges: Vec<usize>,
}

impl Group {
    pub fn is_orphan(&self) -> bool {
        self.kind == GroupKind::Orphan
    }
}

/// Splits the graph into connected components (edges read as undirected),
/// ordered by the input position of each component's first node, followed by
/// one trailing orphan group.
///
/// Pass-through nodes and repeated ids are never grouped. Edges whose
/// endpoints are not both groupable nodes are ignored.
pub fn partition(nodes: &[Node], edges: &[Edge]) -> Vec<Group> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    let mut eligible = vec![false; nodes.len()];
    for (idx, node) in nodes.iter().enumerate() {
        if node.is_pass_through() {
            continue;
        }
        if index.contains_key(node.id.as_str()) {
            tracing::warn!(id = %node.id, "duplicate node id; later copy keeps its position");
            continue;
        }
        index.insert(node.id.as_str(), idx);
        eligible[idx] = true;
    }

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut live_edges: Vec<(usize, usize)> = Vec::with_capacity(edges.len());
    let mut dangling = 0usize;
    for (edge_idx, edge) in edges.iter().enumerate() {
        let (Some(&from), Some(&to)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) else {
            dangling += 1;
            continue;
        };
        adjacency[from].push(to);
        adjacency[to].push(from);
        live_edges.push((edge_idx, from));
    }
    if dangling > 0 {
        tracing::warn!(count = dangling, "ignoring edges with unknown endpoints");
    }

    let mut component: Vec<Option<usize>> = vec![None; nodes.len()];
    let mut groups: Vec<Group> = Vec::new();
    let mut orphans: Vec<usize> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();

    for seed in 0..nodes.len() {
        if !eligible[seed] || component[seed].is_some() {
            continue;
        }
        if adjacency[seed].is_empty() {
            orphans.push(seed);
            continue;
        }

        let group_idx = groups.len();
        let mut members = Vec::new();
        component[seed] = Some(group_idx);
        stack.push(seed);
        while let Some(current) = stack.pop() {
            members.push(current);
            for &next in &adjacency[current] {
                if component[next].is_none() {
                    component[next] = Some(group_idx);
                    stack.push(next);
                }
            }
        }
        members.sort_unstable();
        groups.push(Group {
            kind: GroupKind::Connected,
            nodes: members,
            edges: Vec::new(),
        });
    }

    for (edge_idx, from) in live_edges {
        if let Some(group_idx) = component[from] {
            groups[group_idx].edges.push(edge_idx);
        }
    }

    if !orphans.is_empty() {
        groups.push(Group {
            kind: GroupKind::Orphan,
            nodes: orphans,
            edges: Vec::new(),
        });
    }

    tracing::debug!(
        groups = groups.len(),
        orphans = groups.last().filter(|g| g.is_orphan()).map_or(0, |g| g.nodes.len()),
        "partitioned graph"
    );
    groups
}
