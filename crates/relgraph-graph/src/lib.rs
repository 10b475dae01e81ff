//! relgraph Graph - Graph construction and rendering
//!
//! Builds a directed graph (one node per distinct entity label, one
//! labeled edge per subject/object pair) from extracted triplets and
//! renders it as a self-contained interactive HTML document.

pub mod graph;
pub mod layout;
pub mod render;

pub use graph::{EdgeView, RelationGraph};
pub use layout::{ForceLayout, Position};
pub use render::{
    extract_embedded_data, GraphRenderer, NetworkData, NetworkEdge, NetworkNode, RenderOptions,
};
