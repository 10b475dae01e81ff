//! Property-based tests for graph construction and rendering.
//!
//! These tests verify invariants that should hold for any triplet list:
//! - Node set equals distinct subjects and objects
//! - One edge per distinct (subject, object) pair, last label wins
//! - Every node and edge survives into the rendered document

use proptest::prelude::*;
use relgraph_core::Triplet;
use relgraph_graph::{extract_embedded_data, GraphRenderer, RelationGraph, RenderOptions};
use std::collections::{HashMap, HashSet};

/// Small label alphabet so duplicates and self-loops are common
fn arb_entity() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-E]".prop_map(|s| s),
        "[a-zA-Z <>&\"']{1,10}".prop_map(|s| s),
    ]
}

fn arb_relation() -> impl Strategy<Value = String> {
    "[a-z ]{0,12}".prop_map(|s| s)
}

fn arb_triplets() -> impl Strategy<Value = Vec<Triplet>> {
    prop::collection::vec(
        (arb_entity(), arb_relation(), arb_entity())
            .prop_map(|(s, r, o)| Triplet::new(s, r, o)),
        0..20,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn node_set_is_distinct_endpoints(triplets in arb_triplets()) {
        let graph = RelationGraph::from_triplets(&triplets);

        let expected: HashSet<&str> = triplets
            .iter()
            .flat_map(|t| [t.subject.as_str(), t.object.as_str()])
            .collect();
        let actual: HashSet<&str> = graph.nodes().collect();

        prop_assert_eq!(graph.node_count(), expected.len());
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn edges_collapse_per_pair_with_last_label(triplets in arb_triplets()) {
        let graph = RelationGraph::from_triplets(&triplets);

        let mut last: HashMap<(&str, &str), &str> = HashMap::new();
        for t in &triplets {
            last.insert((t.subject.as_str(), t.object.as_str()), t.relation.as_str());
        }

        prop_assert_eq!(graph.edge_count(), last.len());
        for ((s, o), label) in last {
            prop_assert_eq!(graph.edge_label(s, o), Some(label));
        }
    }

    #[test]
    fn rendered_document_contains_every_node_and_edge(triplets in arb_triplets()) {
        let graph = RelationGraph::from_triplets(&triplets);
        let renderer = GraphRenderer::new(RenderOptions {
            layout_iterations: 10,
            ..Default::default()
        });

        let html = renderer.render_html(&graph).unwrap();
        let data = extract_embedded_data(&html).unwrap();

        let nodes: HashSet<String> = data["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["id"].as_str().unwrap().to_string())
            .collect();
        let expected_nodes: HashSet<String> = graph.nodes().map(str::to_string).collect();
        prop_assert_eq!(nodes, expected_nodes);

        let edges: HashSet<(String, String, String)> = data["edges"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| {
                (
                    e["from"].as_str().unwrap().to_string(),
                    e["to"].as_str().unwrap().to_string(),
                    e["label"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        let expected_edges: HashSet<(String, String, String)> = graph
            .edges()
            .map(|e| (e.source.to_string(), e.target.to_string(), e.label.to_string()))
            .collect();
        prop_assert_eq!(edges.len(), graph.edge_count());
        prop_assert_eq!(edges, expected_edges);
    }
}

#[test]
fn self_loop_document() {
    let graph = RelationGraph::from_triplets(&[Triplet::new("A", "self", "A")]);
    let html = GraphRenderer::default().render(&graph).unwrap();
    let data = extract_embedded_data(&html).unwrap();

    assert_eq!(data["nodes"].as_array().unwrap().len(), 1);
    assert_eq!(data["edges"][0]["from"], "A");
    assert_eq!(data["edges"][0]["to"], "A");
    assert_eq!(data["edges"][0]["label"], "self");
}
