use flowgraph_layout::{DelegateFailurePolicy, FlowGraph, LayoutConfig, compute_layout};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowLayoutOptions {
    spacing: Option<f32>,
    default_width: Option<f32>,
    default_height: Option<f32>,
    on_delegate_error: Option<DelegateFailurePolicy>,
}

fn build_layout_config(options: FlowLayoutOptions) -> LayoutConfig {
    // No thread pool on wasm32-unknown-unknown.
    let mut config = LayoutConfig {
        parallel: false,
        ..LayoutConfig::default()
    };
    if let Some(spacing) = options.spacing {
        config.spacing = spacing;
    }
    if let Some(width) = options.default_width {
        config.default_width = width;
    }
    if let Some(height) = options.default_height {
        config.default_height = height;
    }
    if let Some(policy) = options.on_delegate_error {
        config.on_delegate_error = policy;
    }
    config
}

fn layout_flow(graph_json: &str, options: FlowLayoutOptions) -> Result<String, String> {
    let mut graph: FlowGraph = serde_json::from_str(graph_json).map_err(|e| e.to_string())?;
    let config = build_layout_config(options);
    graph.nodes =
        compute_layout(&graph.nodes, &graph.edges, &config).map_err(|e| e.to_string())?;
    serde_json::to_string(&graph).map_err(|e| e.to_string())
}

/// Takes `{"nodes": [...], "edges": [...]}` and returns the same document with
/// every node's `position` filled in.
#[wasm_bindgen]
pub fn layout_flow_graph(graph_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<FlowLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        FlowLayoutOptions::default()
    };

    layout_flow(graph_json, options).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use crate::{FlowLayoutOptions, layout_flow};

    #[test]
    fn lays_out_a_document_and_keeps_notes() {
        let graph = r#"{
            "nodes": [
                {"id": "A", "type": "genericNode", "position": {"x": 0, "y": 0}, "data": {"k": 1}},
                {"id": "B", "type": "genericNode", "position": {"x": 0, "y": 0}},
                {"id": "N", "type": "noteNode", "position": {"x": 5, "y": 6}}
            ],
            "edges": [{"id": "e", "source": "A", "target": "B", "animated": true}]
        }"#;

        let out = layout_flow(graph, FlowLayoutOptions::default()).expect("layout should succeed");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let nodes = value["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 3);

        let find = |id: &str| nodes.iter().find(|n| n["id"] == id).unwrap();
        assert!(find("B")["position"]["x"].as_f64() > find("A")["position"]["x"].as_f64());
        assert_eq!(find("A")["data"]["k"], 1);
        assert_eq!(find("N")["position"]["x"], 5.0);
        assert_eq!(value["edges"][0]["animated"], true);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(layout_flow("{\"nodes\": 3}", FlowLayoutOptions::default()).is_err());
    }
}
