use std::collections::HashMap;

use super::group::GroupLayout;
use super::partition::Group;
use crate::ir::{Node, Position};

#[derive(Debug, Clone)]
pub struct Composition {
    pub nodes: Vec<Node>,
    /// Vertical offset each group was shifted by, in partition order.
    pub offsets: Vec<f32>,
}

/// Stacks resolved groups top to bottom in partition order, `2 × spacing`
/// apart, then appends every ungrouped node with its input position.
///
/// `layouts[i]` must belong to `groups[i]`. Grouped nodes the delegate did not
/// place keep their input position as well.
pub fn compose(
    nodes: &[Node],
    groups: &[Group],
    layouts: &[GroupLayout],
    spacing: f32,
) -> Composition {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    let mut grouped = vec![false; nodes.len()];
    let mut offsets = Vec::with_capacity(groups.len());
    let mut offset = 0.0;

    for (group, layout) in groups.iter().zip(layouts) {
        offsets.push(offset);
        if group.nodes.is_empty() {
            continue;
        }
        let placed: HashMap<&str, Position> = layout
            .resolved
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), Position::new(n.x, offset + n.y)))
            .collect();
        for &idx in &group.nodes {
            grouped[idx] = true;
            let node = &nodes[idx];
            let position = placed.get(node.id.as_str()).copied().unwrap_or(node.position);
            out.push(node.with_position(position));
        }
        offset += layout.resolved.height + 2.0 * spacing;
    }

    for (idx, node) in nodes.iter().enumerate() {
        if !grouped[idx] {
            out.push(node.clone());
        }
    }

    Composition {
        nodes: out,
        offsets,
    }
}
