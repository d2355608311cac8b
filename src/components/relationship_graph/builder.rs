//! Turns a flat investor list into nodes and shared-attribute edges.
//!
//! Nodes are seeded evenly on a circle around the viewport center so the relaxation
//! starts from a non-degenerate configuration. Edges are generated exhaustively over
//! all unordered pairs, one per attribute the pair shares.

use std::collections::HashSet;
use std::f64::consts::PI;

use super::config::{GraphConfig, RadiusConfig};
use super::types::{Bounds, EdgeFilters, EdgeKind, Investor, InvestorStatus};

/// A laid-out investor.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub name: String,
	pub company: Option<String>,
	pub category: Option<String>,
	pub city: Option<String>,
	pub status: InvestorStatus,
	/// Pipeline value, sanitized to a finite non-negative number.
	pub magnitude: f64,
	pub x: f64,
	pub y: f64,
	/// Force accumulated during the current relaxation pass.
	pub fx: f64,
	pub fy: f64,
	pub radius: f64,
}

impl Node {
	pub fn position(&self) -> (f64, f64) {
		(self.x, self.y)
	}
}

/// An undirected tie between two investors sharing an attribute value.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub source: String,
	pub target: String,
	pub kind: EdgeKind,
	pub strength: f64,
}

impl Edge {
	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}

	/// The endpoint opposite `id`, if `id` is an endpoint.
	pub fn other(&self, id: &str) -> Option<&str> {
		if self.source == id {
			Some(&self.target)
		} else if self.target == id {
			Some(&self.source)
		} else {
			None
		}
	}
}

/// Number of generated edges of each kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeCounts {
	pub company: usize,
	pub category: usize,
	pub city: usize,
}

impl EdgeCounts {
	pub fn get(&self, kind: EdgeKind) -> usize {
		match kind {
			EdgeKind::SharedCompany => self.company,
			EdgeKind::SharedCategory => self.category,
			EdgeKind::SharedCity => self.city,
		}
	}
}

/// Output of [`build`]: seeded nodes and every candidate edge.
#[derive(Clone, Debug, Default)]
pub struct BuiltGraph {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

impl BuiltGraph {
	/// Edges whose kind is enabled. Borrows; never regenerates.
	pub fn active_edges(&self, filters: &EdgeFilters) -> Vec<&Edge> {
		self.edges.iter().filter(|e| filters.enabled(e.kind)).collect()
	}

	pub fn edge_counts(&self) -> EdgeCounts {
		let mut counts = EdgeCounts::default();
		for edge in &self.edges {
			match edge.kind {
				EdgeKind::SharedCompany => counts.company += 1,
				EdgeKind::SharedCategory => counts.category += 1,
				EdgeKind::SharedCity => counts.city += 1,
			}
		}
		counts
	}
}

/// Radius for a node, linear in magnitude and clamped to the configured range.
pub fn node_radius(magnitude: f64, max_magnitude: f64, config: &RadiusConfig) -> f64 {
	let max_magnitude = if max_magnitude > 0.0 { max_magnitude } else { 1.0 };
	let r = config.min + (magnitude / max_magnitude) * (config.max - config.min);
	r.clamp(config.min, config.max)
}

fn sanitize_magnitude(value: f64) -> f64 {
	if value.is_finite() && value > 0.0 {
		value
	} else {
		0.0
	}
}

/// Shared value of an attribute, ignoring absent and blank values.
fn shared<'a>(a: &'a Option<String>, b: &Option<String>) -> Option<&'a str> {
	let a = a.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
	let b = b.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
	(a == b).then_some(a)
}

/// Builds the node set and the full candidate edge set.
///
/// Rejected investors are dropped before anything else happens, so they can never
/// appear as nodes or edge endpoints. A repeated id keeps its first record.
pub fn build(investors: &[Investor], bounds: Bounds, config: &GraphConfig) -> BuiltGraph {
	let mut seen = HashSet::new();
	let included: Vec<&Investor> = investors
		.iter()
		.filter(|inv| !inv.approval.is_rejected())
		.filter(|inv| seen.insert(inv.id.as_str()))
		.collect();

	let max_magnitude = included
		.iter()
		.map(|inv| sanitize_magnitude(inv.pipeline_value))
		.fold(0.0, f64::max);

	let n = included.len();
	let (cx, cy) = bounds.center();
	let seed_radius = bounds.width.min(bounds.height) * config.layout.seed_radius_fraction;

	let nodes: Vec<Node> = included
		.iter()
		.enumerate()
		.map(|(i, inv)| {
			// A lone node has no neighbors to spread from; seed it on the target.
			let (x, y) = if n == 1 {
				(cx, cy)
			} else {
				let angle = (i as f64) * 2.0 * PI / n as f64;
				(cx + seed_radius * angle.cos(), cy + seed_radius * angle.sin())
			};
			let magnitude = sanitize_magnitude(inv.pipeline_value);
			Node {
				id: inv.id.clone(),
				name: inv.name.clone(),
				company: inv.company.clone(),
				category: inv.category.clone(),
				city: inv.city.clone(),
				status: inv.status,
				magnitude,
				x,
				y,
				fx: 0.0,
				fy: 0.0,
				radius: node_radius(magnitude, max_magnitude, &config.radius),
			}
		})
		.collect();

	let mut edges = Vec::new();
	for i in 0..n {
		for j in (i + 1)..n {
			let (a, b) = (&nodes[i], &nodes[j]);
			let pairs = [
				(EdgeKind::SharedCompany, &a.company, &b.company),
				(EdgeKind::SharedCategory, &a.category, &b.category),
				(EdgeKind::SharedCity, &a.city, &b.city),
			];
			for (kind, va, vb) in pairs {
				if shared(va, vb).is_some() {
					edges.push(Edge {
						source: a.id.clone(),
						target: b.id.clone(),
						kind,
						strength: config.layout.strength(kind),
					});
				}
			}
		}
	}

	BuiltGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::relationship_graph::test_support::investor;
	use crate::components::relationship_graph::types::ApprovalStatus;
	use proptest::prelude::*;

	fn bounds() -> Bounds {
		Bounds::new(800.0, 600.0)
	}

	#[test]
	fn empty_input_builds_empty_graph() {
		let graph = build(&[], bounds(), &GraphConfig::default());
		assert!(graph.nodes.is_empty());
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn rejected_investors_are_excluded() {
		let mut rejected = investor("r", "Acme", "Seed", "Austin", 10.0);
		rejected.approval = ApprovalStatus::Rejected;
		let mut pending = investor("p", "Acme", "", "", 5.0);
		pending.approval = ApprovalStatus::Pending;
		let list = vec![investor("a", "Acme", "Seed", "Austin", 1.0), rejected, pending];

		let graph = build(&list, bounds(), &GraphConfig::default());
		let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["a", "p"]);
		assert!(graph.edges.iter().all(|e| !e.touches("r")));
	}

	#[test]
	fn pair_yields_one_edge_per_shared_attribute() {
		let list = vec![
			investor("a", "Acme", "Seed", "Austin", 0.0),
			investor("b", "Acme", "Seed", "Boston", 0.0),
		];
		let graph = build(&list, bounds(), &GraphConfig::default());
		let kinds: Vec<EdgeKind> = graph.edges.iter().map(|e| e.kind).collect();
		assert_eq!(kinds, vec![EdgeKind::SharedCompany, EdgeKind::SharedCategory]);
		assert_eq!(graph.edges[0].strength, GraphConfig::default().layout.company_strength);
	}

	#[test]
	fn duplicate_ids_keep_the_first_record() {
		let list = vec![
			investor("a", "Acme", "", "", 0.0),
			investor("a", "Other", "", "", 0.0),
			investor("b", "Acme", "", "", 0.0),
		];
		let graph = build(&list, bounds(), &GraphConfig::default());
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.nodes[0].company.as_deref(), Some("Acme"));
		assert_eq!(graph.edges.len(), 1);
	}

	#[test]
	fn attributes_match_after_trimming() {
		let list = vec![
			investor("a", " Acme", "Seed", "", 0.0),
			investor("b", "Acme  ", "seed", "", 0.0),
		];
		let graph = build(&list, bounds(), &GraphConfig::default());
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.edges[0].kind, EdgeKind::SharedCompany);
	}

	#[test]
	fn missing_or_blank_attributes_never_link() {
		let mut a = investor("a", "", "", "", 0.0);
		let mut b = investor("b", "", "", "", 0.0);
		a.city = Some("  ".into());
		b.city = Some("  ".into());
		let graph = build(&[a, b], bounds(), &GraphConfig::default());
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn nodes_are_seeded_on_a_circle() {
		let list: Vec<Investor> = (0..4)
			.map(|i| investor(&i.to_string(), "", "", "", 0.0))
			.collect();
		let graph = build(&list, bounds(), &GraphConfig::default());
		let (cx, cy) = bounds().center();
		let expected = 600.0 * GraphConfig::default().layout.seed_radius_fraction;
		for node in &graph.nodes {
			let d = (node.x - cx).hypot(node.y - cy);
			assert!((d - expected).abs() < 1e-9);
		}
		assert!((graph.nodes[0].x - (cx + expected)).abs() < 1e-9);
		assert!((graph.nodes[1].y - (cy + expected)).abs() < 1e-9);
	}

	#[test]
	fn single_node_is_seeded_at_center() {
		let graph = build(&[investor("a", "", "", "", 0.0)], bounds(), &GraphConfig::default());
		assert_eq!(graph.nodes[0].position(), bounds().center());
	}

	#[test]
	fn zero_magnitudes_use_minimum_radius() {
		let list = vec![investor("a", "", "", "", 0.0), investor("b", "", "", "", 0.0)];
		let graph = build(&list, bounds(), &GraphConfig::default());
		let min = GraphConfig::default().radius.min;
		assert!(graph.nodes.iter().all(|n| n.radius == min));
	}

	#[test]
	fn largest_magnitude_gets_maximum_radius() {
		let list = vec![
			investor("a", "", "", "", 1_000_000.0),
			investor("b", "", "", "", 500_000.0),
			investor("c", "", "", "", f64::NAN),
		];
		let config = GraphConfig::default();
		let graph = build(&list, bounds(), &config);
		assert_eq!(graph.nodes[0].radius, config.radius.max);
		let mid = (config.radius.min + config.radius.max) / 2.0;
		assert!((graph.nodes[1].radius - mid).abs() < 1e-9);
		assert_eq!(graph.nodes[2].radius, config.radius.min);
	}

	#[test]
	fn active_edges_follow_filters_without_touching_the_full_set() {
		let list = vec![
			investor("a", "Acme", "Seed", "Austin", 0.0),
			investor("b", "Acme", "Seed", "Austin", 0.0),
		];
		let graph = build(&list, bounds(), &GraphConfig::default());
		let mut filters = EdgeFilters::default();
		filters.toggle(EdgeKind::SharedCity);
		let active = graph.active_edges(&filters);
		assert_eq!(active.len(), 2);
		assert!(active.iter().all(|e| e.kind != EdgeKind::SharedCity));
		assert_eq!(graph.edges.len(), 3);
		assert_eq!(
			graph.edge_counts(),
			EdgeCounts {
				company: 1,
				category: 1,
				city: 1
			}
		);
	}

	fn arb_attr() -> impl Strategy<Value = Option<String>> {
		prop_oneof![
			Just(None),
			Just(Some(String::new())),
			"[ab]".prop_map(Some),
		]
	}

	fn arb_investors() -> impl Strategy<Value = Vec<Investor>> {
		prop::collection::vec(
			(arb_attr(), arb_attr(), arb_attr(), 0.0..1e7f64, 0u8..3),
			0..12,
		)
		.prop_map(|rows| {
			rows.into_iter()
				.enumerate()
				.map(|(i, (company, category, city, value, approval))| Investor {
					id: format!("inv-{i}"),
					name: format!("Investor {i}"),
					company,
					category,
					city,
					pipeline_value: value,
					approval: match approval {
						0 => ApprovalStatus::Approved,
						1 => ApprovalStatus::Pending,
						_ => ApprovalStatus::Rejected,
					},
					..Default::default()
				})
				.collect()
		})
	}

	proptest! {
		#[test]
		fn no_rejected_investor_becomes_a_node(list in arb_investors()) {
			let graph = build(&list, bounds(), &GraphConfig::default());
			for node in &graph.nodes {
				let source = list.iter().find(|inv| inv.id == node.id).unwrap();
				prop_assert!(!source.approval.is_rejected());
			}
			let expected = list.iter().filter(|inv| !inv.approval.is_rejected()).count();
			prop_assert_eq!(graph.nodes.len(), expected);
		}

		#[test]
		fn edges_exist_exactly_for_shared_values(list in arb_investors()) {
			let graph = build(&list, bounds(), &GraphConfig::default());
			for (i, a) in graph.nodes.iter().enumerate() {
				for b in graph.nodes.iter().skip(i + 1) {
					let checks = [
						(EdgeKind::SharedCompany, &a.company, &b.company),
						(EdgeKind::SharedCategory, &a.category, &b.category),
						(EdgeKind::SharedCity, &a.city, &b.city),
					];
					for (kind, va, vb) in checks {
						let expected = matches!((va.as_deref(), vb.as_deref()), (Some(x), Some(y)) if !x.is_empty() && x == y);
						let count = graph
							.edges
							.iter()
							.filter(|e| e.kind == kind && e.touches(&a.id) && e.touches(&b.id))
							.count();
						prop_assert_eq!(count, usize::from(expected));
					}
				}
			}
			prop_assert!(graph.edges.iter().all(|e| e.source != e.target));
		}

		#[test]
		fn radius_stays_in_range(list in arb_investors()) {
			let config = GraphConfig::default();
			let graph = build(&list, bounds(), &config);
			for node in &graph.nodes {
				prop_assert!(node.radius >= config.radius.min && node.radius <= config.radius.max);
			}
		}

		#[test]
		fn radius_is_monotonic_in_magnitude(a in 0.0..1e6f64, b in 0.0..1e6f64, max in 1e6..2e6f64) {
			let config = RadiusConfig::default();
			let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
			prop_assert!(node_radius(lo, max, &config) <= node_radius(hi, max, &config));
		}
	}
}
