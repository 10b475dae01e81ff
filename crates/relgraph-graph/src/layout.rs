//! Force-directed layout (Fruchterman-Reingold).
//!
//! Computes the initial node positions embedded in the rendered
//! document. The browser keeps simulating from there when physics is
//! enabled, so the result only has to be a reasonable starting point.
//! Seeding is deterministic: nodes start evenly spaced on a circle.

use crate::RelationGraph;
use petgraph::visit::EdgeRef;
use serde::Serialize;

/// A node position on the canvas, origin at the center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Layout configuration.
#[derive(Debug, Clone, Copy)]
pub struct ForceLayout {
    /// Number of simulation steps.
    pub iterations: usize,
    /// Canvas width in layout units.
    pub width: f64,
    /// Canvas height in layout units.
    pub height: f64,
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self {
            iterations: 200,
            width: 1000.0,
            height: 600.0,
        }
    }
}

/// Below this distance two nodes count as coincident.
const MIN_DISTANCE: f64 = 0.01;

impl ForceLayout {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Compute one position per node, indexed like `RelationGraph::nodes`.
    #[must_use]
    pub fn compute(&self, graph: &RelationGraph) -> Vec<Position> {
        let pg = graph.as_petgraph();
        let n = pg.node_count();
        if n == 0 {
            return Vec::new();
        }

        let mut positions = self.seed(n);
        if n == 1 {
            return positions;
        }

        // Ideal edge length for the available area
        let k = (self.width * self.height / n as f64).sqrt();
        let initial_temperature = self.width / 10.0;
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;

        let edges: Vec<(usize, usize)> = pg
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
            .filter(|(s, t)| s != t)
            .collect();

        let mut displacement = vec![(0.0f64, 0.0f64); n];

        for step in 0..self.iterations {
            displacement.iter_mut().for_each(|d| *d = (0.0, 0.0));

            // Repulsion between every pair
            for i in 0..n {
                for j in (i + 1)..n {
                    let (dx, dy, dist) = delta(positions[i], positions[j], i, j);
                    let force = k * k / dist;
                    let (fx, fy) = (dx / dist * force, dy / dist * force);
                    displacement[i].0 += fx;
                    displacement[i].1 += fy;
                    displacement[j].0 -= fx;
                    displacement[j].1 -= fy;
                }
            }

            // Attraction along edges
            for &(s, t) in &edges {
                let (dx, dy, dist) = delta(positions[s], positions[t], s, t);
                let force = dist * dist / k;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                displacement[s].0 -= fx;
                displacement[s].1 -= fy;
                displacement[t].0 += fx;
                displacement[t].1 += fy;
            }

            // Move, capped by the cooling temperature
            let temperature =
                initial_temperature * (1.0 - step as f64 / self.iterations as f64);
            for (pos, &(dx, dy)) in positions.iter_mut().zip(&displacement) {
                let len = (dx * dx + dy * dy).sqrt();
                if len < MIN_DISTANCE {
                    continue;
                }
                let capped = len.min(temperature);
                pos.x = (pos.x + dx / len * capped).clamp(-half_w, half_w);
                pos.y = (pos.y + dy / len * capped).clamp(-half_h, half_h);
            }
        }

        positions
    }

    fn seed(&self, n: usize) -> Vec<Position> {
        if n == 1 {
            return vec![Position { x: 0.0, y: 0.0 }];
        }
        let radius = self.width.min(self.height) / 3.0;
        (0..n)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / n as f64;
                Position {
                    x: radius * angle.cos(),
                    y: radius * angle.sin(),
                }
            })
            .collect()
    }
}

/// Vector from b to a, with a deterministic nudge for coincident nodes.
fn delta(a: Position, b: Position, i: usize, j: usize) -> (f64, f64, f64) {
    let (mut dx, mut dy) = (a.x - b.x, a.y - b.y);
    let mut dist = (dx * dx + dy * dy).sqrt();
    if dist < MIN_DISTANCE {
        let angle = (i * 31 + j * 17) as f64;
        dx = MIN_DISTANCE * angle.cos();
        dy = MIN_DISTANCE * angle.sin();
        dist = MIN_DISTANCE;
    }
    (dx, dy, dist)
}
