//! Automatic left-to-right layout for flow graphs.
//!
//! The pipeline is a single pass: [`partition`] the graph into independent
//! groups, hand each group to a [`LayoutDelegate`], [`resolve`] the raw
//! coordinates into overlap-free ranks, and [`compose`] the groups into one
//! vertical stack. Pass-through nodes (notes) skip every stage.

mod compose;
mod delegate;
mod error;
mod group;
mod partition;
mod resolve;

pub use compose::{Composition, compose};
pub use delegate::{
    DagreDelegate, DelegateEdge, DelegateNode, DelegateRequest, LayoutDelegate, PlacedNode,
    RankDirection,
};
pub use error::{DelegateError, LayoutError};
pub use group::{
    GroupLayout, build_request, layout_group, linear_chain_hint, resolve_size, stacked_placement,
};
pub use partition::{Group, GroupKind, partition};
pub use resolve::{ResolvedGroup, ResolvedNode, resolve};

use crate::config::LayoutConfig;
use crate::ir::{Edge, Node};

#[derive(Debug, Clone)]
pub struct GroupReport {
    pub index: usize,
    pub kind: GroupKind,
    pub node_ids: Vec<String>,
    /// Delegate output (or fallback placement) before resolution.
    pub raw: Vec<PlacedNode>,
    pub height: f32,
    pub offset: f32,
    pub fallback: bool,
}

/// Final nodes plus what happened to each group on the way.
#[derive(Debug, Clone)]
pub struct LayoutReport {
    pub nodes: Vec<Node>,
    pub groups: Vec<GroupReport>,
}

/// Lays out `nodes` with the dagre delegate. Returns every input node exactly
/// once with its final position; nothing is changed in place.
pub fn compute_layout(
    nodes: &[Node],
    edges: &[Edge],
    config: &LayoutConfig,
) -> Result<Vec<Node>, LayoutError> {
    compute_layout_with(&DagreDelegate, nodes, edges, config)
}

pub fn compute_layout_with<D: LayoutDelegate + ?Sized>(
    delegate: &D,
    nodes: &[Node],
    edges: &[Edge],
    config: &LayoutConfig,
) -> Result<Vec<Node>, LayoutError> {
    compute_layout_report(delegate, nodes, edges, config).map(|report| report.nodes)
}

pub fn compute_layout_report<D: LayoutDelegate + ?Sized>(
    delegate: &D,
    nodes: &[Node],
    edges: &[Edge],
    config: &LayoutConfig,
) -> Result<LayoutReport, LayoutError> {
    config.validate()?;
    let _span = tracing::debug_span!("layout", nodes = nodes.len(), edges = edges.len()).entered();

    let groups = partition(nodes, edges);
    let layouts = layout_groups(delegate, &groups, nodes, edges, config)?;
    let composition = compose(nodes, &groups, &layouts, config.spacing);

    let reports = groups
        .iter()
        .zip(layouts)
        .zip(&composition.offsets)
        .map(|((group, layout), offset)| GroupReport {
            index: layout.index,
            kind: group.kind,
            node_ids: group.nodes.iter().map(|&idx| nodes[idx].id.clone()).collect(),
            raw: layout.raw,
            height: layout.resolved.height,
            offset: *offset,
            fallback: layout.fallback,
        })
        .collect();

    Ok(LayoutReport {
        nodes: composition.nodes,
        groups: reports,
    })
}

/// One delegate call per group. Results come back in partition order whether
/// or not the calls ran concurrently.
fn layout_groups<D: LayoutDelegate + ?Sized>(
    delegate: &D,
    groups: &[Group],
    nodes: &[Node],
    edges: &[Edge],
    config: &LayoutConfig,
) -> Result<Vec<GroupLayout>, LayoutError> {
    #[cfg(feature = "parallel")]
    if config.parallel && groups.len() > 1 {
        use rayon::prelude::*;
        return groups
            .par_iter()
            .enumerate()
            .map(|(index, group)| layout_group(delegate, index, group, nodes, edges, config))
            .collect();
    }

    groups
        .iter()
        .enumerate()
        .map(|(index, group)| layout_group(delegate, index, group, nodes, edges, config))
        .collect()
}
