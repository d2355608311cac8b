//! Pan/zoom transform, background drag, hover, selection and edge filters.
//!
//! Nothing here touches node positions. Only [`Viewport::toggle_filter`] reports that
//! a relayout is needed; every other transition is purely presentational.
//!
//! Screen and world coordinates are related by
//! `screen = center + (world - center) * zoom + pan`, so zooming scales around the
//! middle of the canvas and the identity transform is `pan = (0, 0)`, `zoom = 1`.

use super::config::ZoomConfig;
use super::types::{EdgeFilters, EdgeKind};

/// Pan and zoom applied to the whole graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub pan_x: f64,
	pub pan_y: f64,
	/// Zoom factor, kept inside the configured bounds.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			pan_x: 0.0,
			pan_y: 0.0,
			k: 1.0,
		}
	}
}

/// Background drag state machine: `Idle -> Dragging -> Idle`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
	#[default]
	Idle,
	Dragging {
		start_x: f64,
		start_y: f64,
		pan_start_x: f64,
		pan_start_y: f64,
		/// Set once the pointer travelled further than the click tolerance.
		moved: bool,
	},
}

/// Viewer state layered over a fixed layout.
#[derive(Clone, Debug)]
pub struct Viewport {
	pub transform: ViewTransform,
	pub drag: DragState,
	hovered: Option<String>,
	selected: Option<String>,
	filters: EdgeFilters,
	center: (f64, f64),
	config: ZoomConfig,
}

impl Viewport {
	pub fn new(width: f64, height: f64, config: ZoomConfig) -> Self {
		Self {
			transform: ViewTransform::default(),
			drag: DragState::Idle,
			hovered: None,
			selected: None,
			filters: EdgeFilters::default(),
			center: (width / 2.0, height / 2.0),
			config,
		}
	}

	pub fn zoom(&self) -> f64 {
		self.transform.k
	}

	pub fn pan(&self) -> (f64, f64) {
		(self.transform.pan_x, self.transform.pan_y)
	}

	pub fn hovered(&self) -> Option<&str> {
		self.hovered.as_deref()
	}

	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	pub fn filters(&self) -> EdgeFilters {
		self.filters
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.drag, DragState::Dragging { .. })
	}

	/// Moves the zoom origin after the canvas was resized.
	pub fn set_size(&mut self, width: f64, height: f64) {
		self.center = (width / 2.0, height / 2.0);
	}

	fn clamp_zoom(&self, k: f64) -> f64 {
		k.clamp(self.config.min, self.config.max)
	}

	pub fn zoom_in(&mut self) {
		self.transform.k = self.clamp_zoom(self.transform.k * self.config.step);
	}

	pub fn zoom_out(&mut self) {
		self.transform.k = self.clamp_zoom(self.transform.k / self.config.step);
	}

	/// Wheel zoom: scales by `factor` keeping the world point under `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, factor: f64, sx: f64, sy: f64) {
		let (wx, wy) = self.screen_to_world(sx, sy);
		let new_k = self.clamp_zoom(self.transform.k * factor);
		let (cx, cy) = self.center;
		self.transform.k = new_k;
		self.transform.pan_x = sx - cx - (wx - cx) * new_k;
		self.transform.pan_y = sy - cy - (wy - cy) * new_k;
	}

	/// One wheel notch; negative `delta_y` (scrolling up) zooms in. A purely
	/// horizontal scroll (`delta_y == 0`) leaves the view alone.
	pub fn wheel(&mut self, delta_y: f64, sx: f64, sy: f64) {
		if delta_y == 0.0 {
			return;
		}
		let factor = if delta_y > 0.0 {
			1.0 / self.config.wheel_step
		} else {
			self.config.wheel_step
		};
		self.zoom_at(factor, sx, sy);
	}

	/// Pan back to the origin and zoom to 1.0. Filters, hover and selection stay.
	pub fn reset_view(&mut self) {
		self.transform = ViewTransform::default();
		self.drag = DragState::Idle;
	}

	pub fn begin_drag(&mut self, x: f64, y: f64) {
		self.drag = DragState::Dragging {
			start_x: x,
			start_y: y,
			pan_start_x: self.transform.pan_x,
			pan_start_y: self.transform.pan_y,
			moved: false,
		};
	}

	/// Pans by the pointer delta since [`begin_drag`](Self::begin_drag). Returns
	/// whether the drag has moved past the click tolerance. No-op while idle.
	pub fn update_drag(&mut self, x: f64, y: f64) -> bool {
		let tolerance = self.config.click_tolerance;
		let DragState::Dragging {
			start_x,
			start_y,
			pan_start_x,
			pan_start_y,
			ref mut moved,
		} = self.drag
		else {
			return false;
		};
		let (dx, dy) = (x - start_x, y - start_y);
		if dx.hypot(dy) > tolerance {
			*moved = true;
		}
		let moved = *moved;
		self.transform.pan_x = pan_start_x + dx;
		self.transform.pan_y = pan_start_y + dy;
		moved
	}

	/// Ends the drag. Returns `true` when the press never moved far enough to
	/// count as a drag, i.e. it was a click. No-op (returns `false`) while idle.
	pub fn end_drag(&mut self) -> bool {
		match std::mem::take(&mut self.drag) {
			DragState::Dragging { moved, .. } => !moved,
			DragState::Idle => false,
		}
	}

	/// Flips one edge-kind filter. Always returns `true`: the active edge set changed,
	/// so the layout must be relaxed again.
	pub fn toggle_filter(&mut self, kind: EdgeKind) -> bool {
		self.filters.toggle(kind);
		true
	}

	pub fn set_hovered(&mut self, id: Option<String>) {
		self.hovered = id;
	}

	/// Selects `id`, or clears the selection when `id` is already selected or `None`.
	pub fn set_selected(&mut self, id: Option<String>) {
		self.selected = match id {
			Some(id) if self.selected.as_deref() == Some(id.as_str()) => None,
			other => other,
		};
	}

	/// Drops hover/selection pointing at ids that no longer exist.
	pub fn retain_ids(&mut self, exists: impl Fn(&str) -> bool) {
		if self.hovered.as_deref().is_some_and(|id| !exists(id)) {
			self.hovered = None;
		}
		if self.selected.as_deref().is_some_and(|id| !exists(id)) {
			self.selected = None;
		}
	}

	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		let (cx, cy) = self.center;
		let k = self.transform.k;
		(
			cx + (wx - cx) * k + self.transform.pan_x,
			cy + (wy - cy) * k + self.transform.pan_y,
		)
	}

	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		let (cx, cy) = self.center;
		let k = self.transform.k;
		(
			cx + (sx - cx - self.transform.pan_x) / k,
			cy + (sy - cy - self.transform.pan_y) / k,
		)
	}
}
