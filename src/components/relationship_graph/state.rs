//! Graph state: the investor snapshot, its seeded graph, the settled layout and the
//! viewport, driven by discrete commands.
//!
//! Only three commands relax the layout again: a new investor list, a filter toggle
//! and a resize. Everything else (pan, zoom, hover, selection) touches the viewport
//! alone, so the layout never jitters while the user navigates.

use std::collections::HashSet;

use log::{debug, warn};

use super::builder::{BuiltGraph, Edge, EdgeCounts, Node, build};
use super::config::{GraphConfig, MAX_INTERACTIVE_NODES};
use super::layout::relax;
use super::types::{Bounds, EdgeKind, Investor};
use super::viewport::{DragState, Viewport};

/// Input events and toolbar actions, in screen coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphCommand {
	SetInvestors(Vec<Investor>),
	ToggleFilter(EdgeKind),
	Resize { width: f64, height: f64 },
	ZoomIn,
	ZoomOut,
	Wheel { delta_y: f64, x: f64, y: f64 },
	ResetView,
	PointerDown { x: f64, y: f64 },
	PointerMove { x: f64, y: f64 },
	PointerUp,
	PointerLeave,
}

/// Everything the render adapter needs for one frame.
pub struct Scene<'a> {
	pub nodes: &'a [Node],
	pub edges: Vec<&'a Edge>,
	pub viewport: &'a Viewport,
	pub bounds: Bounds,
}

/// Core state combining the built graph, its layout and viewer interaction.
pub struct GraphState {
	investors: Vec<Investor>,
	/// Seeded nodes and the full edge set of the last build.
	seeded: BuiltGraph,
	/// Settled positions for the current filters.
	nodes: Vec<Node>,
	pub viewport: Viewport,
	bounds: Bounds,
	config: GraphConfig,
	layouts: usize,
}

impl GraphState {
	pub fn new(investors: Vec<Investor>, width: f64, height: f64, config: GraphConfig) -> Self {
		let config = config.sanitized();
		let mut state = Self {
			investors,
			seeded: BuiltGraph::default(),
			nodes: Vec::new(),
			viewport: Viewport::new(width, height, config.zoom.clone()),
			bounds: Bounds::new(width, height),
			config,
			layouts: 0,
		};
		state.rebuild();
		state
	}

	/// Applies one command. Returns `true` when the layout was relaxed again.
	pub fn apply(&mut self, command: GraphCommand) -> bool {
		match command {
			GraphCommand::SetInvestors(investors) => {
				self.investors = investors;
				self.rebuild();
				true
			}
			GraphCommand::ToggleFilter(kind) => {
				if self.viewport.toggle_filter(kind) {
					self.relayout();
				}
				true
			}
			GraphCommand::Resize { width, height } => {
				let bounds = Bounds::new(width, height);
				if bounds == self.bounds {
					return false;
				}
				self.bounds = bounds;
				self.viewport.set_size(width, height);
				self.rebuild();
				true
			}
			GraphCommand::ZoomIn => {
				self.viewport.zoom_in();
				false
			}
			GraphCommand::ZoomOut => {
				self.viewport.zoom_out();
				false
			}
			GraphCommand::Wheel { delta_y, x, y } => {
				self.viewport.wheel(delta_y, x, y);
				false
			}
			GraphCommand::ResetView => {
				self.viewport.reset_view();
				false
			}
			GraphCommand::PointerDown { x, y } => {
				self.viewport.begin_drag(x, y);
				false
			}
			GraphCommand::PointerMove { x, y } => {
				if self.viewport.is_dragging() {
					self.viewport.update_drag(x, y);
				} else {
					let hovered = self.node_at_position(x, y).map(|n| n.id.clone());
					self.viewport.set_hovered(hovered);
				}
				false
			}
			GraphCommand::PointerUp => {
				let press = match self.viewport.drag {
					DragState::Dragging { start_x, start_y, .. } => Some((start_x, start_y)),
					DragState::Idle => None,
				};
				// A click selects the node under the press, or clears on background.
				if let (true, Some((x, y))) = (self.viewport.end_drag(), press) {
					let clicked = self.node_at_position(x, y).map(|n| n.id.clone());
					self.viewport.set_selected(clicked);
				}
				false
			}
			GraphCommand::PointerLeave => {
				self.viewport.end_drag();
				self.viewport.set_hovered(None);
				false
			}
		}
	}

	/// Rebuilds nodes and edges from the investor snapshot, then relaxes.
	fn rebuild(&mut self) {
		self.seeded = build(&self.investors, self.bounds, &self.config);
		debug!(
			"investor-graph: built {} nodes, {} edges",
			self.seeded.nodes.len(),
			self.seeded.edges.len()
		);
		if self.exceeds_interactive_ceiling() {
			warn!(
				"investor-graph: {} nodes exceeds the interactive ceiling of {}; layout may be slow",
				self.seeded.nodes.len(),
				MAX_INTERACTIVE_NODES
			);
		}
		let ids: HashSet<&str> = self.seeded.nodes.iter().map(|n| n.id.as_str()).collect();
		self.viewport.retain_ids(|id| ids.contains(id));
		self.relayout();
	}

	/// Relaxes the seeded nodes against the currently active edges.
	fn relayout(&mut self) {
		let active = self.seeded.active_edges(&self.viewport.filters());
		self.nodes = relax(self.seeded.nodes.clone(), &active, self.bounds, &self.config.layout);
		self.layouts += 1;
		debug!(
			"investor-graph: relaxed {} nodes against {} active edges",
			self.nodes.len(),
			active.len()
		);
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.seeded.edges
	}

	pub fn active_edges(&self) -> Vec<&Edge> {
		self.seeded.active_edges(&self.viewport.filters())
	}

	pub fn edge_counts(&self) -> EdgeCounts {
		self.seeded.edge_counts()
	}

	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	/// Number of relaxations run so far.
	pub fn layout_count(&self) -> usize {
		self.layouts
	}

	pub fn exceeds_interactive_ceiling(&self) -> bool {
		self.seeded.nodes.len() > MAX_INTERACTIVE_NODES
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn hovered_node(&self) -> Option<&Node> {
		self.viewport.hovered().and_then(|id| self.node(id))
	}

	/// Topmost node under a screen position. Later nodes are drawn on top, so the
	/// search runs back to front.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<&Node> {
		let (wx, wy) = self.viewport.screen_to_world(sx, sy);
		self.nodes
			.iter()
			.rev()
			.find(|n| (n.x - wx).hypot(n.y - wy) <= n.radius)
	}

	pub fn scene(&self) -> Scene<'_> {
		Scene {
			nodes: &self.nodes,
			edges: self.active_edges(),
			viewport: &self.viewport,
			bounds: self.bounds,
		}
	}
}
