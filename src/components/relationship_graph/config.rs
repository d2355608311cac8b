//! Tunable constants for building, laying out and drawing the graph.
//!
//! Everything has a sensible default; a page can override any subset by embedding
//! a JSON document (see [`crate::load_config`]). Missing sections and fields keep
//! their defaults.

use log::warn;
use serde::Deserialize;

use super::types::EdgeKind;

/// Node count above which a relaxation pass is no longer comfortably interactive.
///
/// Each iteration is quadratic in the node count. Larger graphs are still laid out,
/// there is no spatial partitioning to fall back on, but the state logs a warning.
pub const MAX_INTERACTIVE_NODES: usize = 300;

/// Parameters of the fixed-iteration relaxation.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
	/// Relaxation passes per layout.
	pub iterations: usize,
	/// Pull towards the viewport center, per unit of offset.
	pub centering: f64,
	/// Push per unit of overlap between two nodes that are too close.
	pub repulsion: f64,
	/// Extra spacing added to the repulsion threshold.
	pub padding: f64,
	/// Multiplier applied to every edge strength.
	pub attraction: f64,
	/// Upper bound on the summed spring gain acting on one node. Hubs with many
	/// edges have their springs scaled down to this total so a pass never
	/// overshoots the neighborhood it is pulled towards.
	pub max_attraction_gain: f64,
	/// Gap kept between a node's rim and the viewport edge.
	pub margin: f64,
	/// Seed circle radius as a fraction of the smaller viewport dimension.
	pub seed_radius_fraction: f64,
	pub company_strength: f64,
	pub category_strength: f64,
	pub city_strength: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			iterations: 50,
			centering: 0.01,
			repulsion: 0.3,
			padding: 10.0,
			attraction: 1.0,
			max_attraction_gain: 0.5,
			margin: 10.0,
			seed_radius_fraction: 0.3,
			company_strength: 0.08,
			category_strength: 0.04,
			city_strength: 0.02,
		}
	}
}

impl LayoutConfig {
	/// Spring strength for an edge of the given kind.
	pub fn strength(&self, kind: EdgeKind) -> f64 {
		match kind {
			EdgeKind::SharedCompany => self.company_strength,
			EdgeKind::SharedCategory => self.category_strength,
			EdgeKind::SharedCity => self.city_strength,
		}
	}
}

/// Node size range; radius grows linearly with pipeline value inside it.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RadiusConfig {
	pub min: f64,
	pub max: f64,
}

impl RadiusConfig {
	fn is_valid(&self) -> bool {
		self.min.is_finite() && self.max.is_finite() && self.min <= self.max
	}
}

impl Default for RadiusConfig {
	fn default() -> Self {
		Self { min: 8.0, max: 28.0 }
	}
}

/// Zoom bounds and step.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoomConfig {
	pub min: f64,
	pub max: f64,
	/// Factor applied by one zoom-in / zoom-out step.
	pub step: f64,
	/// Factor applied per wheel notch.
	pub wheel_step: f64,
	/// Pointer travel (screen px) under which a press-release counts as a click.
	pub click_tolerance: f64,
}

impl ZoomConfig {
	fn is_valid(&self) -> bool {
		self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
	}
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			min: 0.3,
			max: 3.0,
			step: 1.2,
			wheel_step: 1.1,
			click_tolerance: 4.0,
		}
	}
}

/// Presentation rules for the render adapter.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
	/// Node labels are drawn only at or above this zoom.
	pub label_zoom_threshold: f64,
	/// Opacity of nodes and edges outside the selection's neighborhood.
	pub dimmed_alpha: f64,
	/// Edge line width in screen pixels.
	pub edge_width: f64,
	pub label_font: String,
	pub legend_font: String,
	pub tooltip_font: String,
	pub show_legend: bool,
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self {
			label_zoom_threshold: 0.6,
			dimmed_alpha: 0.25,
			edge_width: 1.5,
			label_font: "11px sans-serif".into(),
			legend_font: "12px sans-serif".into(),
			tooltip_font: "12px sans-serif".into(),
			show_legend: true,
		}
	}
}

/// Complete configuration for the relationship graph.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
	pub layout: LayoutConfig,
	pub radius: RadiusConfig,
	pub zoom: ZoomConfig,
	pub render: RenderConfig,
}

impl GraphConfig {
	/// Replaces any range section whose bounds are inverted or not finite with its
	/// default. Overrides are merged field by field, so `{"radius": {"min": 40}}`
	/// alone ends up above the default maximum.
	pub fn sanitized(mut self) -> Self {
		if !self.radius.is_valid() {
			warn!(
				"investor-graph: radius range {}..{} is invalid; using defaults",
				self.radius.min, self.radius.max
			);
			self.radius = RadiusConfig::default();
		}
		if !self.zoom.is_valid() {
			warn!(
				"investor-graph: zoom range {}..{} is invalid; using defaults",
				self.zoom.min, self.zoom.max
			);
			self.zoom = ZoomConfig::default();
		}
		self
	}
}
