use std::collections::HashSet;

use super::partition::Group;
use super::resolve::{ResolvedGroup, resolve};
use super::{
    DelegateEdge, DelegateError, DelegateNode, DelegateRequest, LayoutDelegate, LayoutError,
    PlacedNode, RankDirection,
};
use crate::config::{DelegateFailurePolicy, LayoutConfig};
use crate::ir::{Edge, Node, Size};

/// Layout size of a node: explicit size, else measured size, else the
/// configured default. Zero, negative and non-finite values count as absent.
pub fn resolve_size(node: &Node, config: &LayoutConfig) -> Size {
    let usable = |value: Option<f32>| value.filter(|v| v.is_finite() && *v > 0.0);
    let measured = node.measured.as_ref();
    Size {
        width: usable(node.width)
            .or_else(|| usable(measured.map(|m| m.width)))
            .unwrap_or(config.default_width),
        height: usable(node.height)
            .or_else(|| usable(measured.map(|m| m.height)))
            .unwrap_or(config.default_height),
    }
}

/// Placeholder edges chaining `ids` in order (`ids[0] -> ids[1] -> ...`).
///
/// Edge-less groups give a layered algorithm nothing to rank against; the
/// chain makes it lay them out as one readable row. These edges only ever
/// live inside a delegate request.
pub fn linear_chain_hint(ids: &[String]) -> Vec<DelegateEdge> {
    ids.windows(2)
        .map(|pair| DelegateEdge {
            source: pair[0].clone(),
            target: pair[1].clone(),
        })
        .collect()
}

pub fn build_request(
    group: &Group,
    nodes: &[Node],
    edges: &[Edge],
    config: &LayoutConfig,
) -> DelegateRequest {
    let orphan = group.is_orphan();
    let delegate_nodes: Vec<DelegateNode> = group
        .nodes
        .iter()
        .map(|&idx| {
            let node = &nodes[idx];
            let size = resolve_size(node, config);
            DelegateNode {
                id: node.id.clone(),
                width: size.width,
                height: size.height,
            }
        })
        .collect();

    let delegate_edges = if orphan {
        let ids: Vec<String> = delegate_nodes.iter().map(|n| n.id.clone()).collect();
        linear_chain_hint(&ids)
    } else {
        group
            .edges
            .iter()
            .map(|&idx| DelegateEdge {
                source: edges[idx].source.clone(),
                target: edges[idx].target.clone(),
            })
            .collect()
    };

    DelegateRequest {
        nodes: delegate_nodes,
        edges: delegate_edges,
        direction: RankDirection::LeftRight,
        node_spacing: config.node_spacing(orphan),
        rank_spacing: config.rank_spacing(orphan),
    }
}

/// Naive placement used when the delegate fails under
/// [`DelegateFailurePolicy::LinearFallback`]: one column at x = 0.
pub fn stacked_placement(request: &DelegateRequest, spacing: f32) -> Vec<PlacedNode> {
    let mut cursor = 0.0;
    request
        .nodes
        .iter()
        .map(|node| {
            let placed = PlacedNode {
                id: node.id.clone(),
                x: 0.0,
                y: cursor,
                width: node.width,
                height: node.height,
            };
            cursor += node.height + spacing;
            placed
        })
        .collect()
}

/// Everything known about one group after its delegate call and resolution.
#[derive(Debug, Clone)]
pub struct GroupLayout {
    pub index: usize,
    pub orphan: bool,
    pub fallback: bool,
    pub raw: Vec<PlacedNode>,
    pub resolved: ResolvedGroup,
}

pub fn layout_group<D: LayoutDelegate + ?Sized>(
    delegate: &D,
    index: usize,
    group: &Group,
    nodes: &[Node],
    edges: &[Edge],
    config: &LayoutConfig,
) -> Result<GroupLayout, LayoutError> {
    let _span = tracing::debug_span!("group", index, orphan = group.is_orphan()).entered();
    let request = build_request(group, nodes, edges, config);

    let (placed, fallback) = match delegate.layout(&request) {
        Ok(placed) => (placed, false),
        Err(err) => match config.on_delegate_error {
            DelegateFailurePolicy::Abort => {
                return Err(LayoutError::Delegate {
                    group: index,
                    source: err,
                });
            }
            DelegateFailurePolicy::LinearFallback => {
                tracing::warn!(group = index, error = %err, "delegate failed; stacking group");
                (stacked_placement(&request, config.spacing), true)
            }
        },
    };

    let raw = keep_requested(&request, placed);
    let resolved = resolve(&raw, config.spacing);
    tracing::debug!(
        nodes = request.nodes.len(),
        placed = raw.len(),
        height = resolved.height,
        "laid out group"
    );

    Ok(GroupLayout {
        index,
        orphan: group.is_orphan(),
        fallback,
        raw,
        resolved,
    })
}

/// Drops answers for ids that were never asked about (including repeats) and
/// reports requested ids the delegate skipped.
fn keep_requested(request: &DelegateRequest, placed: Vec<PlacedNode>) -> Vec<PlacedNode> {
    let requested: HashSet<&str> = request.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut seen: HashSet<String> = HashSet::with_capacity(placed.len());
    let kept: Vec<PlacedNode> = placed
        .into_iter()
        .filter(|p| requested.contains(p.id.as_str()) && seen.insert(p.id.clone()))
        .collect();
    if kept.len() < request.nodes.len() {
        tracing::warn!(
            missing = request.nodes.len() - kept.len(),
            "delegate returned no coordinates for some nodes; keeping their positions"
        );
    }
    kept
}
