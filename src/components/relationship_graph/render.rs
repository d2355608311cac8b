//! Drawing the graph onto a 2-D surface.
//!
//! Rendering uses several passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Active edges, then nodes, then labels (world space mapped through the viewport)
//! 3. Legend and tooltip (screen space, unaffected by pan/zoom)
//!
//! The adapter only needs circles, lines, rectangles and text, expressed by
//! [`DrawSurface`]; [`CanvasSurface`] implements it for an HTML canvas.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::builder::{Edge, Node};
use super::config::RenderConfig;
use super::state::Scene;
use super::theme::{Color, Theme};
use super::types::InvestorStatus;

/// Minimal immediate-mode drawing API. Coordinates are screen pixels.
pub trait DrawSurface {
	fn fill_background(&mut self, width: f64, height: f64, color: Color);
	fn line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Color, dash: Option<(f64, f64)>);
	fn circle(&mut self, center: (f64, f64), radius: f64, fill: Color, stroke: Option<(Color, f64)>);
	fn rect(&mut self, origin: (f64, f64), size: (f64, f64), fill: Color, stroke: Option<Color>);
	/// Draws `text` with its left end of the baseline at `at`.
	fn text(&mut self, text: &str, at: (f64, f64), font: &str, color: Color);

	/// Width of `text` in pixels. The default is a rough monospace estimate.
	fn measure_text(&self, text: &str, _font: &str) -> f64 {
		text.chars().count() as f64 * 7.0
	}
}

/// Formats a pipeline value with K/M suffixes: `$1.5M`, `$250K`, `$900`.
/// The suffix is picked after rounding, so `999_999` reads `$1.0M` rather than `$1000K`.
pub fn format_magnitude(value: f64) -> String {
	if value >= 1_000_000.0 || (value / 1_000.0).round() >= 1_000.0 {
		format!("${:.1}M", value / 1_000_000.0)
	} else if value.round() >= 1_000.0 {
		format!("${:.0}K", value / 1_000.0)
	} else {
		format!("${:.0}", value)
	}
}

/// Whether node labels are drawn at this zoom.
pub fn labels_visible(zoom: f64, config: &RenderConfig) -> bool {
	zoom >= config.label_zoom_threshold
}

/// The selected node plus every node adjacent to it through an active edge.
/// `None` when nothing (or a node not in the scene) is selected.
pub fn selection_focus<'a>(scene: &Scene<'a>) -> Option<HashSet<&'a str>> {
	let selected = scene.viewport.selected()?;
	let node = scene.nodes.iter().find(|n| n.id == selected)?;
	let mut focus: HashSet<&'a str> = HashSet::new();
	focus.insert(node.id.as_str());
	for &edge in &scene.edges {
		if let Some(other) = edge.other(&node.id) {
			focus.insert(other);
		}
	}
	Some(focus)
}

/// Opacity of a node given the current selection focus.
pub fn node_alpha(id: &str, focus: Option<&HashSet<&str>>, config: &RenderConfig) -> f64 {
	match focus {
		Some(focus) if !focus.contains(id) => config.dimmed_alpha,
		_ => 1.0,
	}
}

/// Tooltip rows for a node: name first, then whichever details are present.
pub fn tooltip_lines(node: &Node) -> Vec<String> {
	let mut lines = vec![node.name.clone()];
	let present = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned);
	if let Some(company) = present(&node.company) {
		lines.push(format!("Company: {company}"));
	}
	lines.push(format!("Status: {}", node.status.label()));
	lines.push(format!("Pipeline: {}", format_magnitude(node.magnitude)));
	if let Some(category) = present(&node.category) {
		lines.push(format!("Category: {category}"));
	}
	if let Some(city) = present(&node.city) {
		lines.push(format!("City: {city}"));
	}
	lines
}

/// Renders one complete frame.
pub fn render(scene: &Scene<'_>, surface: &mut impl DrawSurface, config: &RenderConfig, theme: &Theme) {
	let bounds = scene.bounds;
	surface.fill_background(bounds.width, bounds.height, theme.background);

	let focus = selection_focus(scene);
	let by_id: HashMap<&str, &Node> = scene.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

	draw_edges(scene, surface, &by_id, config, theme);
	draw_nodes(scene, surface, focus.as_ref(), config, theme);

	if config.show_legend {
		draw_legend(surface, config, theme);
	}
	if let Some(node) = scene.viewport.hovered().and_then(|id| by_id.get(id)) {
		draw_tooltip(scene, surface, node, config, theme);
	}
}

fn draw_edges(
	scene: &Scene<'_>,
	surface: &mut impl DrawSurface,
	by_id: &HashMap<&str, &Node>,
	config: &RenderConfig,
	theme: &Theme,
) {
	let selected = scene.viewport.selected().filter(|id| by_id.contains_key(id));
	for edge in &scene.edges {
		let (Some(a), Some(b)) = (by_id.get(edge.source.as_str()), by_id.get(edge.target.as_str())) else {
			continue;
		};
		let style = theme.edge_style(edge.kind);
		let alpha = edge_alpha(edge, selected, style.alpha, config);
		surface.line(
			scene.viewport.world_to_screen(a.x, a.y),
			scene.viewport.world_to_screen(b.x, b.y),
			config.edge_width,
			style.color.with_alpha(alpha),
			style.dash,
		);
	}
}

fn edge_alpha(edge: &Edge, selected: Option<&str>, base: f64, config: &RenderConfig) -> f64 {
	match selected {
		None => base,
		Some(id) if edge.touches(id) => 1.0,
		Some(_) => base * config.dimmed_alpha,
	}
}

fn draw_nodes(
	scene: &Scene<'_>,
	surface: &mut impl DrawSurface,
	focus: Option<&HashSet<&str>>,
	config: &RenderConfig,
	theme: &Theme,
) {
	let viewport = scene.viewport;
	let k = viewport.zoom();
	let show_labels = labels_visible(k, config);

	for node in scene.nodes {
		let alpha = node_alpha(&node.id, focus, config);
		let center = viewport.world_to_screen(node.x, node.y);
		let radius = node.radius * k;
		let hovered = viewport.hovered() == Some(node.id.as_str());
		let selected = viewport.selected() == Some(node.id.as_str());

		let mut fill = theme.status_color(node.status).with_alpha(alpha);
		if hovered {
			fill = fill.lighten(0.25);
		}
		let stroke = if selected {
			(theme.selection_ring, 3.0)
		} else if hovered {
			(theme.hover_ring, 2.0)
		} else {
			(theme.node_border.fade(alpha), 1.0)
		};
		surface.circle(center, radius, fill, Some(stroke));

		if show_labels {
			let width = surface.measure_text(&node.name, &config.label_font);
			surface.text(
				&node.name,
				(center.0 - width / 2.0, center.1 + radius + 13.0),
				&config.label_font,
				theme.label.fade(alpha),
			);
		}
	}
}

fn draw_legend(surface: &mut impl DrawSurface, config: &RenderConfig, theme: &Theme) {
	let panel = &theme.panel;
	let font = &config.legend_font;
	let origin = (12.0, 12.0);
	let swatch = 5.0;

	let text_width = InvestorStatus::ALL
		.iter()
		.map(|s| surface.measure_text(s.label(), font))
		.fold(surface.measure_text("Status", font), f64::max);
	let width = panel.padding * 2.0 + swatch * 2.0 + 8.0 + text_width;
	let height = panel.padding * 2.0 + panel.line_height * (InvestorStatus::ALL.len() + 1) as f64;
	surface.rect(origin, (width, height), panel.background, Some(panel.border));

	let left = origin.0 + panel.padding;
	let mut baseline = origin.1 + panel.padding + panel.line_height - 5.0;
	surface.text("Status", (left, baseline), font, panel.muted_text);

	for status in InvestorStatus::ALL {
		baseline += panel.line_height;
		surface.circle(
			(left + swatch, baseline - swatch + 1.0),
			swatch,
			theme.status_color(status),
			None,
		);
		surface.text(status.label(), (left + swatch * 2.0 + 8.0, baseline), font, panel.text);
	}
}

fn draw_tooltip(
	scene: &Scene<'_>,
	surface: &mut impl DrawSurface,
	node: &Node,
	config: &RenderConfig,
	theme: &Theme,
) {
	let panel = &theme.panel;
	let font = &config.tooltip_font;
	let lines = tooltip_lines(node);

	let text_width = lines
		.iter()
		.map(|l| surface.measure_text(l, font))
		.fold(0.0, f64::max);
	let width = text_width + panel.padding * 2.0;
	let height = panel.line_height * lines.len() as f64 + panel.padding * 2.0;

	let (sx, sy) = scene.viewport.world_to_screen(node.x, node.y);
	let offset = node.radius * scene.viewport.zoom() + 12.0;
	let bounds = scene.bounds;
	// Flip to the left side when the panel would leave the canvas.
	let mut x = sx + offset;
	if x + width > bounds.width - 4.0 {
		x = sx - offset - width;
	}
	let x = x.max(4.0);
	let y = (sy - height / 2.0).clamp(4.0, (bounds.height - height - 4.0).max(4.0));

	surface.rect((x, y), (width, height), panel.background, Some(panel.border));
	for (i, line) in lines.iter().enumerate() {
		let color = if i == 0 { panel.text } else { panel.muted_text };
		let baseline = y + panel.padding + panel.line_height * (i as f64 + 1.0) - 5.0;
		surface.text(line, (x + panel.padding, baseline), font, color);
	}
}

/// [`DrawSurface`] backed by a canvas 2d context.
pub struct CanvasSurface<'a> {
	ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasSurface<'a> {
	pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}

	fn set_dash(&self, dash: Option<(f64, f64)>) {
		let pattern = match dash {
			Some((on, off)) => js_sys::Array::of2(&JsValue::from_f64(on), &JsValue::from_f64(off)),
			None => js_sys::Array::new(),
		};
		let _ = self.ctx.set_line_dash(&pattern);
	}
}

impl DrawSurface for CanvasSurface<'_> {
	fn fill_background(&mut self, width: f64, height: f64, color: Color) {
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill_rect(0.0, 0.0, width, height);
	}

	fn line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Color, dash: Option<(f64, f64)>) {
		self.set_dash(dash);
		self.ctx.set_stroke_style_str(&color.to_css());
		self.ctx.set_line_width(width);
		self.ctx.begin_path();
		self.ctx.move_to(from.0, from.1);
		self.ctx.line_to(to.0, to.1);
		self.ctx.stroke();
		self.set_dash(None);
	}

	fn circle(&mut self, center: (f64, f64), radius: f64, fill: Color, stroke: Option<(Color, f64)>) {
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.0, center.1, radius, 0.0, 2.0 * PI);
		self.ctx.set_fill_style_str(&fill.to_css());
		self.ctx.fill();
		if let Some((color, width)) = stroke {
			self.ctx.set_stroke_style_str(&color.to_css());
			self.ctx.set_line_width(width);
			self.ctx.stroke();
		}
	}

	fn rect(&mut self, origin: (f64, f64), size: (f64, f64), fill: Color, stroke: Option<Color>) {
		self.ctx.set_fill_style_str(&fill.to_css());
		self.ctx.fill_rect(origin.0, origin.1, size.0, size.1);
		if let Some(color) = stroke {
			self.ctx.set_stroke_style_str(&color.to_css());
			self.ctx.set_line_width(1.0);
			self.ctx.stroke_rect(origin.0, origin.1, size.0, size.1);
		}
	}

	fn text(&mut self, text: &str, at: (f64, f64), font: &str, color: Color) {
		self.ctx.set_font(font);
		self.ctx.set_fill_style_str(&color.to_css());
		let _ = self.ctx.fill_text(text, at.0, at.1);
	}

	fn measure_text(&self, text: &str, font: &str) -> f64 {
		self.ctx.set_font(font);
		self.ctx
			.measure_text(text)
			.map(|m| m.width())
			.unwrap_or(text.chars().count() as f64 * 7.0)
	}
}
