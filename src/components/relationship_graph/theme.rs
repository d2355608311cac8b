//! Visual theming for the relationship graph.
//!
//! Status colors are fixed so the legend always means the same thing; edge kinds
//! get their own color, base opacity and dash pattern.

use super::types::{EdgeKind, InvestorStatus};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Multiplies the current alpha, e.g. to dim an already translucent color.
	pub fn fade(self, factor: f64) -> Self {
		Self {
			a: self.a * factor.clamp(0.0, 1.0),
			..self
		}
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// How one edge kind is stroked.
#[derive(Clone, Copy, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	/// Opacity with nothing selected.
	pub alpha: f64,
	/// `(dash, gap)` in screen pixels; `None` for a solid line.
	pub dash: Option<(f64, f64)>,
}

/// Panel style shared by the legend and the tooltip.
#[derive(Clone, Copy, Debug)]
pub struct PanelStyle {
	pub background: Color,
	pub border: Color,
	pub text: Color,
	pub muted_text: Color,
	pub padding: f64,
	pub line_height: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: Color,
	pub label: Color,
	pub node_border: Color,
	pub hover_ring: Color,
	pub selection_ring: Color,
	pub company_edge: EdgeStyle,
	pub category_edge: EdgeStyle,
	pub city_edge: EdgeStyle,
	pub panel: PanelStyle,
}

impl Theme {
	pub fn status_color(&self, status: InvestorStatus) -> Color {
		match status {
			InvestorStatus::Prospect => Color::rgb(148, 163, 184),  // Slate
			InvestorStatus::Contacted => Color::rgb(96, 165, 250),  // Blue
			InvestorStatus::Meeting => Color::rgb(167, 139, 250),   // Violet
			InvestorStatus::DueDiligence => Color::rgb(251, 191, 36), // Amber
			InvestorStatus::Committed => Color::rgb(52, 211, 153),  // Emerald
			InvestorStatus::Passed => Color::rgb(248, 113, 113),    // Red
		}
	}

	pub fn edge_style(&self, kind: EdgeKind) -> EdgeStyle {
		match kind {
			EdgeKind::SharedCompany => self.company_edge,
			EdgeKind::SharedCategory => self.category_edge,
			EdgeKind::SharedCity => self.city_edge,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(22, 27, 34),
			label: Color::rgba(226, 232, 240, 0.9),
			node_border: Color::rgba(255, 255, 255, 0.35),
			hover_ring: Color::rgba(255, 255, 255, 0.8),
			selection_ring: Color::rgb(250, 204, 21),
			company_edge: EdgeStyle {
				color: Color::rgb(96, 165, 250),
				alpha: 0.6,
				dash: None,
			},
			category_edge: EdgeStyle {
				color: Color::rgb(192, 132, 252),
				alpha: 0.4,
				dash: None,
			},
			city_edge: EdgeStyle {
				color: Color::rgb(45, 212, 191),
				alpha: 0.3,
				dash: Some((4.0, 4.0)),
			},
			panel: PanelStyle {
				background: Color::rgba(15, 23, 42, 0.92),
				border: Color::rgba(148, 163, 184, 0.4),
				text: Color::rgb(241, 245, 249),
				muted_text: Color::rgb(148, 163, 184),
				padding: 10.0,
				line_height: 18.0,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_uses_hex_for_opaque_colors() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}

	#[test]
	fn fade_multiplies_alpha() {
		let c = Color::rgba(0, 0, 0, 0.6).fade(0.5);
		assert!((c.a - 0.3).abs() < 1e-12);
	}

	#[test]
	fn every_status_has_a_distinct_color() {
		let theme = Theme::default();
		let colors: Vec<Color> = InvestorStatus::ALL.iter().map(|&s| theme.status_color(s)).collect();
		for (i, a) in colors.iter().enumerate() {
			for b in &colors[i + 1..] {
				assert_ne!(a, b);
			}
		}
	}
}
