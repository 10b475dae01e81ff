//! HTML rendering of a relation graph.
//!
//! The document is a standalone page driving vis-network: graph data and
//! viewer options are embedded as one JSON block, node positions come
//! from `ForceLayout`, and the browser continues the physics simulation
//! with a toggle and a physics configuration panel.

use std::path::{Path, PathBuf};

use relgraph_core::{GraphConfig, RelgraphError, Result};
use serde::Serialize;
use serde_json::json;

use crate::{ForceLayout, RelationGraph};

const TEMPLATE: &str = include_str!("templates/graph.html");
const DOCUMENT_NAME: &str = "graph.html";

/// Viewer options.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// CSS height of the canvas
    pub height: String,
    /// CSS width of the canvas
    pub width: String,
    /// Draw arrow heads on edges
    pub directed: bool,
    /// Show the physics configuration panel
    pub physics_controls: bool,
    /// Iterations for the initial layout
    pub layout_iterations: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&GraphConfig::default())
    }
}

impl From<&GraphConfig> for RenderOptions {
    fn from(config: &GraphConfig) -> Self {
        Self {
            height: config.height.clone(),
            width: config.width.clone(),
            directed: true,
            physics_controls: config.physics_controls,
            layout_iterations: config.layout_iterations,
        }
    }
}

/// Node as the viewer expects it.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkNode {
    pub id: String,
    pub label: String,
    pub title: String,
    pub x: f64,
    pub y: f64,
}

/// Edge as the viewer expects it.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrows: Option<&'static str>,
}

/// Everything embedded in the document.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkData {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
    pub options: serde_json::Value,
}

/// Renders relation graphs into standalone HTML documents.
#[derive(Debug, Clone, Default)]
pub struct GraphRenderer {
    options: RenderOptions,
    scratch_dir: Option<PathBuf>,
}

impl GraphRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            scratch_dir: None,
        }
    }

    /// Create temporary render directories under `dir` instead of the
    /// system temp location.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Lay out the graph and collect the viewer data.
    pub fn network_data(&self, graph: &RelationGraph) -> NetworkData {
        let positions = ForceLayout::default()
            .with_iterations(self.options.layout_iterations)
            .compute(graph);

        let nodes = graph
            .nodes()
            .zip(positions)
            .map(|(label, pos)| NetworkNode {
                id: label.to_string(),
                label: label.to_string(),
                title: label.to_string(),
                x: pos.x,
                y: pos.y,
            })
            .collect();

        let arrows = self.options.directed.then_some("to");
        let edges = graph
            .edges()
            .map(|e| NetworkEdge {
                from: e.source.to_string(),
                to: e.target.to_string(),
                label: e.label.to_string(),
                title: e.label.to_string(),
                arrows,
            })
            .collect();

        NetworkData {
            nodes,
            edges,
            options: self.viewer_options(),
        }
    }

    fn viewer_options(&self) -> serde_json::Value {
        json!({
            "nodes": {
                "shape": "dot",
                "size": 12,
                "font": { "size": 14 }
            },
            "edges": {
                "font": { "size": 12, "align": "middle" },
                "smooth": { "type": "dynamic" }
            },
            "physics": {
                "enabled": true,
                "solver": "barnesHut",
                "barnesHut": {
                    "gravitationalConstant": -8000,
                    "centralGravity": 0.3,
                    "springLength": 150,
                    "springConstant": 0.04,
                    "damping": 0.09
                },
                "stabilization": { "iterations": 150 }
            },
            "interaction": { "hover": true },
            "configure": {
                "enabled": self.options.physics_controls,
                "filter": ["physics"]
            }
        })
    }

    /// Render the document in memory.
    pub fn render_html(&self, graph: &RelationGraph) -> Result<String> {
        let data = self.network_data(graph);
        let json = serde_json::to_string(&data)
            .map_err(|e| RelgraphError::Render(format!("Failed to serialize graph: {e}")))?;

        Ok(TEMPLATE
            .replace("__WIDTH__", &self.options.width)
            .replace("__HEIGHT__", &self.options.height)
            .replace("__GRAPH_DATA__", &escape_script_json(&json)))
    }

    /// Render the document through a scoped temporary file.
    ///
    /// The document is written to a fresh temporary directory and read
    /// back; the directory is removed when this returns, on success or
    /// failure.
    pub fn render(&self, graph: &RelationGraph) -> Result<String> {
        let html = self.render_html(graph)?;

        let scratch = match &self.scratch_dir {
            Some(dir) => tempfile::Builder::new().prefix("relgraph-").tempdir_in(dir),
            None => tempfile::Builder::new().prefix("relgraph-").tempdir(),
        }
        .map_err(|e| RelgraphError::Render(format!("Failed to create temp dir: {e}")))?;

        let path = scratch.path().join(DOCUMENT_NAME);
        write_document(&path, &html)?;
        let content = std::fs::read_to_string(&path)
            .map_err(|e| RelgraphError::Render(format!("Failed to read {}: {e}", path.display())))?;

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            bytes = content.len(),
            "Rendered graph document"
        );

        Ok(content)
    }

    /// Render the document to a caller-chosen path.
    pub fn render_to_file(&self, graph: &RelationGraph, path: &Path) -> Result<()> {
        let html = self.render_html(graph)?;
        write_document(path, &html)
    }
}

fn write_document(path: &Path, html: &str) -> Result<()> {
    std::fs::write(path, html)
        .map_err(|e| RelgraphError::Render(format!("Failed to write {}: {e}", path.display())))
}

/// Make JSON safe to place inside a `<script>` element.
///
/// `<`, `>` and `&` only occur inside JSON strings, where the unicode
/// escapes decode back to the same characters.
fn escape_script_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Pull the embedded data block back out of a rendered document.
pub fn extract_embedded_data(html: &str) -> Option<serde_json::Value> {
    const OPEN: &str = r#"<script type="application/json" id="graph-data">"#;
    let start = html.find(OPEN)? + OPEN.len();
    let end = start + html[start..].find("</script>")?;
    serde_json::from_str(&html[start..end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgraph_core::Triplet;

    fn sample_graph() -> RelationGraph {
        RelationGraph::from_triplets(&[
            Triplet::new("Paris", "is capital of", "France"),
            Triplet::new("France", "member of", "EU"),
        ])
    }

    #[test]
    fn test_network_data_mirrors_graph() {
        let data = GraphRenderer::default().network_data(&sample_graph());

        let ids: Vec<_> = data.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["Paris", "France", "EU"]);

        assert_eq!(data.edges.len(), 2);
        assert_eq!(data.edges[0].from, "Paris");
        assert_eq!(data.edges[0].to, "France");
        assert_eq!(data.edges[0].label, "is capital of");
        assert_eq!(data.edges[0].arrows, Some("to"));
    }

    #[test]
    fn test_html_embeds_data_and_physics_controls() {
        let html = GraphRenderer::default()
            .render_html(&sample_graph())
            .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("vis-network"));
        assert!(html.contains("physics-toggle"));
        assert!(html.contains("height: 600px"));

        let data = extract_embedded_data(&html).unwrap();
        assert_eq!(data["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(data["edges"][1]["label"], "member of");
        assert_eq!(data["options"]["configure"]["filter"][0], "physics");
        assert_eq!(data["options"]["physics"]["enabled"], true);
    }

    #[test]
    fn test_labels_cannot_break_out_of_script() {
        let graph = RelationGraph::from_triplets(&[Triplet::new(
            "</script><script>alert(1)</script>",
            "a & b <c>",
            "B",
        )]);
        let html = GraphRenderer::default().render_html(&graph).unwrap();

        assert_eq!(html.matches("</script>").count(), 3);
        let data = extract_embedded_data(&html).unwrap();
        assert_eq!(data["nodes"][0]["label"], "</script><script>alert(1)</script>");
        assert_eq!(data["edges"][0]["label"], "a & b <c>");
    }

    #[test]
    fn test_undirected_option_drops_arrows() {
        let renderer = GraphRenderer::new(RenderOptions {
            directed: false,
            ..Default::default()
        });
        let data = renderer.network_data(&sample_graph());
        assert!(data.edges.iter().all(|e| e.arrows.is_none()));
    }

    #[test]
    fn test_render_cleans_up_temp_dir() {
        let base = tempfile::tempdir().unwrap();
        let renderer = GraphRenderer::default().with_scratch_dir(base.path());

        let html = renderer.render(&sample_graph()).unwrap();
        assert!(html.contains("Paris"));
        assert_eq!(std::fs::read_dir(base.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_render_missing_scratch_dir_is_render_error() {
        let renderer = GraphRenderer::default().with_scratch_dir("/nonexistent/relgraph-scratch");
        assert!(matches!(
            renderer.render(&sample_graph()),
            Err(RelgraphError::Render(_))
        ));
    }

    #[test]
    fn test_render_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        GraphRenderer::default()
            .render_to_file(&sample_graph(), &path)
            .unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(extract_embedded_data(&html).is_some());
    }
}
