#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{DelegateFailurePolicy, LayoutConfig, load_config, parse_config};
pub use ir::{Edge, FlowGraph, Node, NodeKind, Position, Size};
pub use layout::{
    DagreDelegate, LayoutDelegate, LayoutError, LayoutReport, compute_layout, compute_layout_report,
    compute_layout_with,
};
