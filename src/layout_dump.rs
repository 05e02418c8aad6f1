use crate::config::LayoutConfig;
use crate::layout::{GroupKind, LayoutReport, resolve_size};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub spacing: f32,
    pub nodes: Vec<NodeDump>,
    pub groups: Vec<GroupDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub group: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GroupDump {
    pub index: usize,
    pub orphan: bool,
    pub fallback: bool,
    pub offset: f32,
    pub height: f32,
    pub nodes: Vec<String>,
    pub raw: Vec<RawDump>,
}

#[derive(Debug, Serialize)]
pub struct RawDump {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutDump {
    pub fn from_report(report: &LayoutReport, config: &LayoutConfig) -> Self {
        let mut membership: HashMap<&str, usize> = HashMap::new();
        for group in &report.groups {
            for id in &group.node_ids {
                membership.entry(id.as_str()).or_insert(group.index);
            }
        }

        let nodes = report
            .nodes
            .iter()
            .map(|node| {
                let size = resolve_size(node, config);
                NodeDump {
                    id: node.id.clone(),
                    kind: format!("{:?}", node.kind()),
                    x: node.position.x,
                    y: node.position.y,
                    width: size.width,
                    height: size.height,
                    group: if node.is_pass_through() {
                        None
                    } else {
                        membership.get(node.id.as_str()).copied()
                    },
                }
            })
            .collect();

        let groups = report
            .groups
            .iter()
            .map(|group| GroupDump {
                index: group.index,
                orphan: group.kind == GroupKind::Orphan,
                fallback: group.fallback,
                offset: group.offset,
                height: group.height,
                nodes: group.node_ids.clone(),
                raw: group
                    .raw
                    .iter()
                    .map(|p| RawDump {
                        id: p.id.clone(),
                        x: p.x,
                        y: p.y,
                        width: p.width,
                        height: p.height,
                    })
                    .collect(),
            })
            .collect();

        LayoutDump {
            spacing: config.spacing,
            nodes,
            groups,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    report: &LayoutReport,
    config: &LayoutConfig,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_report(report, config);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
