//! Styling for the external graph renderer.
//!
//! This module turns a [`Snapshot`] plus a [`MappingConfig`] into a
//! [`RenderDocument`]: every node and edge tagged and annotated with the
//! visual channels the renderer needs. Layout, hit-testing and animation stay
//! with the renderer.
//!
//! - [`color`] - `Rgb` values and interpolation
//! - [`mapping`] - metric-to-color/width mapping per view mode
//! - [`label`] - node label wrapping and truncation

pub mod color;
pub mod label;
pub mod mapping;

pub use color::Rgb;
pub use label::format_label;
pub use mapping::{Domain, EdgeClass, EdgeStyle, MappingConfig, VisualMapper};

use crate::pipeline::{Snapshot, Stats};
use crate::types::{Edge, HierarchyNode, TreeEntry, ViewMode};
use serde::Serialize;
use std::collections::HashSet;

/// Uniform label settings applied to every node or edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stylesheet {
    pub view_mode: ViewMode,
    pub node_font_size: f64,
    pub compound_font_size: f64,
    pub edge_font_size: f64,
}

impl From<&MappingConfig> for Stylesheet {
    fn from(config: &MappingConfig) -> Self {
        Self {
            view_mode: config.view_mode,
            node_font_size: config.node_font_size,
            compound_font_size: config.compound_font_size(),
            edge_font_size: config.edge_font_size,
        }
    }
}

/// Node or edge with its styling
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "group", rename_all = "lowercase")]
pub enum StyledElement {
    Nodes {
        data: HierarchyNode,
        /// Wrapped/truncated label for display
        display_label: String,
        /// Has child nodes
        compound: bool,
    },
    Edges {
        data: Edge,
        style: EdgeStyle,
    },
}

impl StyledElement {
    pub fn id(&self) -> &str {
        match self {
            StyledElement::Nodes { data, .. } => &data.id,
            StyledElement::Edges { data, .. } => &data.id,
        }
    }
}

/// Everything the renderer and the navigation panel need for one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct RenderDocument {
    pub revision: u64,
    pub stylesheet: Stylesheet,
    pub mapping: MappingConfig,
    pub elements: Vec<StyledElement>,
    pub tree: Vec<TreeEntry>,
    pub global_stats: Stats,
    pub filtered_stats: Stats,
}

impl RenderDocument {
    /// Style every element of `snapshot`: nodes first, then edges.
    pub fn build(snapshot: &Snapshot, config: &MappingConfig) -> Self {
        let model = &snapshot.model;
        let mapper = VisualMapper::new(*config);

        let parents: HashSet<&str> = model
            .nodes()
            .iter()
            .filter_map(|n| n.parent_id.as_deref())
            .collect();

        let nodes = model.nodes().iter().map(|node| StyledElement::Nodes {
            display_label: format_label(&node.label),
            compound: parents.contains(node.id.as_str()),
            data: node.clone(),
        });
        let edges = model.edges().iter().map(|edge| StyledElement::Edges {
            style: mapper.map_edge(edge),
            data: edge.clone(),
        });

        Self {
            revision: snapshot.revision,
            stylesheet: Stylesheet::from(config),
            mapping: *config,
            elements: nodes.chain(edges).collect(),
            tree: snapshot.tree.clone(),
            global_stats: snapshot.global_stats,
            filtered_stats: snapshot.filtered_stats,
        }
    }

    pub fn element(&self, id: &str) -> Option<&StyledElement> {
        self.elements.iter().find(|e| e.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::FilterConfig;
    use crate::types::RawRecord;

    #[test]
    fn test_render_document() {
        let records = vec![
            RawRecord::new("top/u_cpu", "top/u_mem")
                .with_connections(4)
                .with_slack(-5.0, -8.0)
                .with_direction("to"),
            RawRecord::new("top/u_cpu", "top/u_io").with_slack(0.0, 0.0),
        ];
        let snapshot = Snapshot::build(&records, &FilterConfig::default(), 7);
        let config = MappingConfig::new(ViewMode::Wns)
            .with_domain(-10.0, 0.0)
            .with_thickness(1.0, 5.0);
        let doc = RenderDocument::build(&snapshot, &config);

        assert_eq!(doc.revision, 7);
        assert_eq!(doc.elements.len(), 4 + 2);

        match doc.element("top").unwrap() {
            StyledElement::Nodes { compound, .. } => assert!(*compound),
            other => panic!("expected node, got {:?}", other),
        }
        match doc.element("top/u_cpu").unwrap() {
            StyledElement::Nodes { display_label, compound, .. } => {
                assert_eq!(display_label, "u_\u{200B}cpu");
                assert!(!*compound);
            }
            other => panic!("expected node, got {:?}", other),
        }
        match doc.element("top/u_cpu->top/u_mem").unwrap() {
            StyledElement::Edges { style, .. } => assert_eq!(style.width, 3.0),
            other => panic!("expected edge, got {:?}", other),
        }
        match doc.element("top/u_io->top/u_cpu").unwrap() {
            StyledElement::Edges { style, .. } => assert_eq!(style.class, EdgeClass::Good),
            other => panic!("expected edge, got {:?}", other),
        }
    }

    #[test]
    fn test_render_json_shape() {
        let snapshot = Snapshot::build(
            &[RawRecord::new("a", "b").with_slack(-1.0, -1.0)],
            &FilterConfig::default(),
            1,
        );
        let doc = RenderDocument::build(&snapshot, &MappingConfig::default());
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["elements"][0]["group"], "nodes");
        assert_eq!(json["elements"][2]["group"], "edges");
        assert_eq!(json["elements"][2]["data"]["source"], "b");
        assert_eq!(json["stylesheet"]["compound_font_size"], 14.0);
    }
}
