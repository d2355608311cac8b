//! Fixed-iteration force relaxation.
//!
//! Each pass accumulates three forces per node (centering, pairwise overlap
//! repulsion, linear edge springs) from the positions at the start of the pass,
//! displaces every node by its summed force and clamps it inside the bounds. There
//! is no velocity and no randomness: the same input always settles to the same
//! layout.
//!
//! Repulsion is all-pairs, so a pass is O(n²); see
//! [`MAX_INTERACTIVE_NODES`](super::config::MAX_INTERACTIVE_NODES).

use std::collections::HashMap;

use super::builder::{Edge, Node};
use super::config::LayoutConfig;
use super::types::Bounds;

/// Floor for pair distances, avoids dividing by zero for coincident nodes.
const MIN_DISTANCE: f64 = 1.0;

/// Spring neighbors of one node: (index of the other endpoint, effective gain).
type Springs = Vec<Vec<(usize, f64)>>;

/// Resolves active edges to index pairs once per relaxation call.
///
/// Edges with a missing endpoint or identical endpoints are skipped. When the
/// springs on a node add up to more than `max_attraction_gain` they are scaled
/// down uniformly to that total.
fn springs(nodes: &[Node], edges: &[&Edge], config: &LayoutConfig) -> Springs {
	let index: HashMap<&str, usize> = nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect();

	let mut springs: Springs = vec![Vec::new(); nodes.len()];
	for edge in edges {
		let (Some(&a), Some(&b)) = (
			index.get(edge.source.as_str()),
			index.get(edge.target.as_str()),
		) else {
			continue;
		};
		if a == b {
			continue;
		}
		let gain = edge.strength * config.attraction;
		springs[a].push((b, gain));
		springs[b].push((a, gain));
	}

	for list in &mut springs {
		let total: f64 = list.iter().map(|&(_, g)| g).sum();
		if total > config.max_attraction_gain && total > 0.0 {
			let scale = config.max_attraction_gain / total;
			for (_, g) in list.iter_mut() {
				*g *= scale;
			}
		}
	}
	springs
}

/// Keeps a coordinate so that `[v - r, v + r]` stays `margin` inside `[0, extent]`.
/// Falls back to the midpoint when the extent is too small to fit the node.
fn clamp_axis(v: f64, radius: f64, extent: f64, margin: f64) -> f64 {
	let lo = margin + radius;
	let hi = extent - margin - radius;
	if lo > hi { extent / 2.0 } else { v.clamp(lo, hi) }
}

/// Accumulates this pass's force on every node into `fx`/`fy`.
fn accumulate(nodes: &mut [Node], springs: &Springs, center: (f64, f64), config: &LayoutConfig) {
	let snapshot: Vec<(f64, f64, f64)> = nodes.iter().map(|n| (n.x, n.y, n.radius)).collect();
	let (cx, cy) = center;

	for (i, node) in nodes.iter_mut().enumerate() {
		let (xi, yi, ri) = snapshot[i];
		let mut fx = (cx - xi) * config.centering;
		let mut fy = (cy - yi) * config.centering;

		for (j, &(xj, yj, rj)) in snapshot.iter().enumerate() {
			if i == j {
				continue;
			}
			let (dx, dy) = (xi - xj, yi - yj);
			let raw = dx.hypot(dy);
			let dist = raw.max(MIN_DISTANCE);
			let min_dist = 1.5 * (ri + rj) + config.padding;
			if dist >= min_dist {
				continue;
			}
			// Coincident pair: split along x, lower index to the left.
			let (ux, uy) = if raw > 0.0 {
				(dx / raw, dy / raw)
			} else if i < j {
				(-1.0, 0.0)
			} else {
				(1.0, 0.0)
			};
			let push = (min_dist - dist) * config.repulsion;
			fx += ux * push;
			fy += uy * push;
		}

		for &(j, gain) in &springs[i] {
			let (xj, yj, _) = snapshot[j];
			fx += (xj - xi) * gain;
			fy += (yj - yi) * gain;
		}

		node.fx = fx;
		node.fy = fy;
	}
}

/// Relaxes seeded nodes against the active edges and returns the settled nodes.
///
/// Takes the node array by value so no caller can observe a half-relaxed layout.
/// The returned nodes keep their ids, order and radii; only positions change (and
/// `fx`/`fy` hold the forces of the final pass).
pub fn relax(mut nodes: Vec<Node>, edges: &[&Edge], bounds: Bounds, config: &LayoutConfig) -> Vec<Node> {
	if nodes.is_empty() || config.iterations == 0 {
		return nodes;
	}

	let springs = springs(&nodes, edges, config);
	let center = bounds.center();

	for _ in 0..config.iterations {
		accumulate(&mut nodes, &springs, center, config);
		for node in &mut nodes {
			node.x = clamp_axis(node.x + node.fx, node.radius, bounds.width, config.margin);
			node.y = clamp_axis(node.y + node.fy, node.radius, bounds.height, config.margin);
		}
	}

	nodes
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::relationship_graph::builder::build;
	use crate::components::relationship_graph::config::{GraphConfig, MAX_INTERACTIVE_NODES};
	use crate::components::relationship_graph::test_support::investor;
	use crate::components::relationship_graph::types::{EdgeFilters, EdgeKind, InvestorStatus};
	use proptest::prelude::*;

	fn bounds() -> Bounds {
		Bounds::new(800.0, 600.0)
	}

	fn node(id: &str, x: f64, y: f64, radius: f64) -> Node {
		Node {
			id: id.into(),
			name: id.into(),
			company: None,
			category: None,
			city: None,
			status: InvestorStatus::Prospect,
			magnitude: 0.0,
			x,
			y,
			fx: 0.0,
			fy: 0.0,
			radius,
		}
	}

	fn distance(a: &Node, b: &Node) -> f64 {
		(a.x - b.x).hypot(a.y - b.y)
	}

	#[test]
	fn empty_graph_relaxes_to_nothing() {
		assert!(relax(Vec::new(), &[], bounds(), &LayoutConfig::default()).is_empty());
	}

	#[test]
	fn zero_iterations_leave_nodes_untouched() {
		let nodes = vec![node("a", 100.0, 100.0, 8.0)];
		let config = LayoutConfig {
			iterations: 0,
			..LayoutConfig::default()
		};
		assert_eq!(relax(nodes.clone(), &[], bounds(), &config), nodes);
	}

	#[test]
	fn single_node_settles_at_center() {
		let config = GraphConfig::default();
		let graph = build(&[investor("a", "", "", "", 0.0)], bounds(), &config);
		let settled = relax(graph.nodes, &[], bounds(), &config.layout);
		let (cx, cy) = bounds().center();
		assert!((settled[0].x - cx).abs() < 1e-9);
		assert!((settled[0].y - cy).abs() < 1e-9);
	}

	#[test]
	fn single_offset_node_moves_towards_center() {
		let start = node("a", 700.0, 300.0, 8.0);
		let settled = relax(vec![start.clone()], &[], bounds(), &LayoutConfig::default());
		let (cx, _) = bounds().center();
		assert!((settled[0].x - cx).abs() < (start.x - cx).abs());
	}

	#[test]
	fn two_nodes_sharing_a_category_pull_together_without_overlap() {
		let config = GraphConfig::default();
		let list = vec![investor("a", "", "X", "", 0.0), investor("b", "", "X", "", 0.0)];
		let graph = build(&list, bounds(), &config);
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.edges[0].kind, EdgeKind::SharedCategory);

		let initial = distance(&graph.nodes[0], &graph.nodes[1]);
		let active = graph.active_edges(&EdgeFilters::default());
		let settled = relax(graph.nodes.clone(), &active, bounds(), &config.layout);
		let settled_distance = distance(&settled[0], &settled[1]);

		assert!(settled_distance < initial);
		assert!(settled_distance >= settled[0].radius + settled[1].radius);
	}

	#[test]
	fn isolated_node_gets_no_spring() {
		let config = GraphConfig::default();
		let list = vec![
			investor("a", "Acme", "", "", 0.0),
			investor("b", "Acme", "", "", 0.0),
			investor("c", "Other", "", "", 0.0),
		];
		let graph = build(&list, bounds(), &config);
		assert_eq!(graph.edges.len(), 1);
		let active = graph.active_edges(&EdgeFilters::default());
		assert!(active.iter().all(|e| !e.touches("c")));

		let springs = springs(&graph.nodes, &active, &config.layout);
		assert!(springs[2].is_empty());

		let seed_c = graph.nodes[2].clone();
		let settled = relax(graph.nodes.clone(), &active, bounds(), &config.layout);
		let (cx, cy) = bounds().center();
		let c = &settled[2];
		assert!((c.x - cx).hypot(c.y - cy) < (seed_c.x - cx).hypot(seed_c.y - cy));
		assert!(distance(c, &settled[0]) >= c.radius + settled[0].radius);
		assert!(distance(c, &settled[1]) >= c.radius + settled[1].radius);
	}

	#[test]
	fn coincident_nodes_are_pushed_apart() {
		let nodes = vec![node("a", 400.0, 300.0, 8.0), node("b", 400.0, 300.0, 8.0)];
		let config = LayoutConfig {
			iterations: 1,
			..LayoutConfig::default()
		};
		let settled = relax(nodes, &[], bounds(), &config);
		assert!(settled.iter().all(|n| n.x.is_finite() && n.y.is_finite()));
		assert!(settled[0].x < settled[1].x);
	}

	#[test]
	fn dangling_edges_are_ignored() {
		let nodes = vec![node("a", 200.0, 300.0, 8.0), node("b", 600.0, 300.0, 8.0)];
		let dangling = Edge {
			source: "a".into(),
			target: "gone".into(),
			kind: EdgeKind::SharedCity,
			strength: 0.5,
		};
		let with = relax(nodes.clone(), &[&dangling], bounds(), &LayoutConfig::default());
		let without = relax(nodes, &[], bounds(), &LayoutConfig::default());
		assert_eq!(with, without);
	}

	#[test]
	fn hub_springs_are_capped() {
		let config = LayoutConfig::default();
		let mut nodes = vec![node("hub", 400.0, 300.0, 8.0)];
		let mut edges = Vec::new();
		for i in 0..40 {
			let id = format!("n{i}");
			nodes.push(node(&id, 100.0 + i as f64, 100.0, 8.0));
			edges.push(Edge {
				source: "hub".into(),
				target: id,
				kind: EdgeKind::SharedCompany,
				strength: config.company_strength,
			});
		}
		let refs: Vec<&Edge> = edges.iter().collect();
		let springs = springs(&nodes, &refs, &config);
		let total: f64 = springs[0].iter().map(|&(_, g)| g).sum();
		assert!((total - config.max_attraction_gain).abs() < 1e-9);
		assert!((springs[1][0].1 - config.company_strength).abs() < 1e-12);
	}

	#[test]
	fn tiny_bounds_fall_back_to_midpoint() {
		assert_eq!(clamp_axis(5.0, 20.0, 30.0, 10.0), 15.0);
		assert_eq!(clamp_axis(-50.0, 8.0, 800.0, 10.0), 18.0);
		assert_eq!(clamp_axis(900.0, 8.0, 800.0, 10.0), 782.0);
	}

	/// Documents the interactive ceiling: one full layout at the ceiling is a fixed,
	/// finite amount of pairwise work and still produces a contained layout.
	#[test]
	fn layout_at_node_ceiling_stays_contained() {
		let config = GraphConfig::default();
		let list: Vec<_> = (0..MAX_INTERACTIVE_NODES)
			.map(|i| investor(&i.to_string(), &format!("c{}", i % 7), "", "", i as f64))
			.collect();
		let bounds = Bounds::new(1600.0, 1200.0);
		let graph = build(&list, bounds, &config);
		let active = graph.active_edges(&EdgeFilters::default());
		let settled = relax(graph.nodes.clone(), &active, bounds, &config.layout);
		assert_eq!(settled.len(), MAX_INTERACTIVE_NODES);
		for n in &settled {
			assert!(n.x - n.radius >= 0.0 && n.x + n.radius <= bounds.width);
			assert!(n.y - n.radius >= 0.0 && n.y + n.radius <= bounds.height);
		}
	}

	fn arb_scene() -> impl Strategy<Value = (Vec<Node>, Vec<Edge>, Bounds, usize)> {
		(200.0..1200.0f64, 200.0..1200.0f64, 1usize..60)
			.prop_flat_map(|(w, h, iterations)| {
				let nodes = prop::collection::vec((-200.0..1400.0f64, -200.0..1400.0f64, 8.0..28.0f64), 1..15);
				(nodes, Just(w), Just(h), Just(iterations))
			})
			.prop_flat_map(|(raw, w, h, iterations)| {
				let n = raw.len();
				let edges = prop::collection::vec((0..n, 0..n, 0usize..3), 0..20);
				(Just(raw), edges, Just(w), Just(h), Just(iterations))
			})
			.prop_map(|(raw, edge_idx, w, h, iterations)| {
				let nodes: Vec<Node> = raw
					.iter()
					.enumerate()
					.map(|(i, &(x, y, r))| node(&format!("n{i}"), x, y, r))
					.collect();
				let config = LayoutConfig::default();
				let edges = edge_idx
					.into_iter()
					.filter(|(a, b, _)| a != b)
					.map(|(a, b, k)| {
						let kind = EdgeKind::ALL[k];
						Edge {
							source: format!("n{a}"),
							target: format!("n{b}"),
							kind,
							strength: config.strength(kind),
						}
					})
					.collect();
				(nodes, edges, Bounds::new(w, h), iterations)
			})
	}

	proptest! {
		#[test]
		fn settled_nodes_stay_inside_bounds((nodes, edges, bounds, iterations) in arb_scene()) {
			let config = LayoutConfig { iterations, ..LayoutConfig::default() };
			let refs: Vec<&Edge> = edges.iter().collect();
			let settled = relax(nodes, &refs, bounds, &config);
			for n in &settled {
				prop_assert!(n.x - n.radius >= 0.0 && n.x + n.radius <= bounds.width);
				prop_assert!(n.y - n.radius >= 0.0 && n.y + n.radius <= bounds.height);
			}
		}

		#[test]
		fn relaxation_is_deterministic((nodes, edges, bounds, iterations) in arb_scene()) {
			let config = LayoutConfig { iterations, ..LayoutConfig::default() };
			let refs: Vec<&Edge> = edges.iter().collect();
			let first = relax(nodes.clone(), &refs, bounds, &config);
			let second = relax(nodes.clone(), &refs, bounds, &config);
			prop_assert_eq!(&first, &second);

			let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
			let settled_ids: Vec<&str> = first.iter().map(|n| n.id.as_str()).collect();
			prop_assert_eq!(ids, settled_ids);
		}
	}
}
