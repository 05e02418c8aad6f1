use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};

use super::DelegateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDirection {
    LeftRight,
}

impl RankDirection {
    fn dagre_rankdir(self) -> &'static str {
        match self {
            RankDirection::LeftRight => "lr",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DelegateNode {
    pub id: String,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateEdge {
    pub source: String,
    pub target: String,
}

/// Abstract input for one group: sized nodes, directed edges and spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegateRequest {
    pub nodes: Vec<DelegateNode>,
    pub edges: Vec<DelegateEdge>,
    pub direction: RankDirection,
    /// Gap between neighbouring nodes of one layer.
    pub node_spacing: f32,
    /// Gap between layers.
    pub rank_spacing: f32,
}

/// Delegate output for one node; `x`/`y` are the top-left corner.
///
/// Nodes of one layer share the same `x`: the left edge of the layer's widest
/// node.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Layered layout algorithm the engine hands each group to.
///
/// Implementations must be pure: the same request yields the same answer.
/// Nodes missing from the answer keep their previous position.
pub trait LayoutDelegate: Sync {
    fn layout(&self, request: &DelegateRequest) -> Result<Vec<PlacedNode>, DelegateError>;
}

impl<F> LayoutDelegate for F
where
    F: Fn(&DelegateRequest) -> Result<Vec<PlacedNode>, DelegateError> + Sync,
{
    fn layout(&self, request: &DelegateRequest) -> Result<Vec<PlacedNode>, DelegateError> {
        self(request)
    }
}

/// [`LayoutDelegate`] backed by `dagre_rust`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagreDelegate;

impl LayoutDelegate for DagreDelegate {
    fn layout(&self, request: &DelegateRequest) -> Result<Vec<PlacedNode>, DelegateError> {
        if request.nodes.is_empty() {
            return Ok(Vec::new());
        }
        panic::catch_unwind(AssertUnwindSafe(|| run_dagre(request)))
            .map_err(|payload| DelegateError::Panicked(panic_message(payload.as_ref())))
    }
}

const DAGRE_RANKER: &str = "longest-path";

fn run_dagre(request: &DelegateRequest) -> Vec<PlacedNode> {
    let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
        DagreGraph::new(Some(GraphOption {
            directed: Some(true),
            multigraph: Some(false),
            compound: Some(false),
        }));

    let mut graph_config = DagreConfig::default();
    graph_config.rankdir = Some(request.direction.dagre_rankdir().to_string());
    graph_config.nodesep = Some(request.node_spacing);
    graph_config.ranksep = Some(request.rank_spacing);
    // network-simplex never terminates on some acyclic inputs in dagre_rust 0.0.5.
    graph_config.ranker = Some(DAGRE_RANKER.to_string());
    graph_config.marginx = Some(0.0);
    graph_config.marginy = Some(0.0);
    dagre_graph.set_graph(graph_config);

    for node in &request.nodes {
        let mut dagre_node = DagreNode::default();
        dagre_node.width = node.width;
        dagre_node.height = node.height;
        dagre_graph.set_node(node.id.clone(), Some(dagre_node));
    }

    // Not a multigraph: repeated pairs collapse, and self loops carry no layering.
    let mut edge_set: HashSet<(&str, &str)> = HashSet::new();
    for edge in &request.edges {
        if edge.source == edge.target {
            continue;
        }
        if !edge_set.insert((edge.source.as_str(), edge.target.as_str())) {
            continue;
        }
        let edge_label = DagreEdge::default();
        let _ = dagre_graph.set_edge(&edge.source, &edge.target, Some(edge_label), None);
    }

    dagre_layout::run_layout(&mut dagre_graph);

    // Dagre centres every node of a layer on one line. Aligning the layer on
    // its widest node keeps the whole layer in a single column.
    let mut centres: Vec<(&DelegateNode, f32, f32)> = Vec::with_capacity(request.nodes.len());
    let mut layers: HashMap<i64, (f32, f32)> = HashMap::new();
    for node in &request.nodes {
        let Some(dagre_node) = dagre_graph.node(&node.id) else {
            continue;
        };
        let layer = layers
            .entry(dagre_node.x.round() as i64)
            .or_insert((dagre_node.x, 0.0));
        layer.1 = layer.1.max(node.width);
        centres.push((node, dagre_node.x, dagre_node.y));
    }

    centres
        .into_iter()
        .map(|(node, cx, cy)| {
            let (layer_centre, layer_width) = layers[&(cx.round() as i64)];
            PlacedNode {
                id: node.id.clone(),
                x: layer_centre - layer_width / 2.0,
                y: cy - node.height / 2.0,
                width: node.width,
                height: node.height,
            }
        })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
