//! Input records and small shared value types for the relationship graph.

use serde::Deserialize;

/// Pipeline stage of an investor. The closed set drives node colors and the legend.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InvestorStatus {
	#[default]
	Prospect,
	Contacted,
	Meeting,
	#[serde(alias = "due-diligence", alias = "dueDiligence")]
	DueDiligence,
	Committed,
	Passed,
}

impl InvestorStatus {
	/// Every status, in legend order.
	pub const ALL: [InvestorStatus; 6] = [
		InvestorStatus::Prospect,
		InvestorStatus::Contacted,
		InvestorStatus::Meeting,
		InvestorStatus::DueDiligence,
		InvestorStatus::Committed,
		InvestorStatus::Passed,
	];

	/// Human readable label used in the legend and tooltip.
	pub fn label(self) -> &'static str {
		match self {
			InvestorStatus::Prospect => "Prospect",
			InvestorStatus::Contacted => "Contacted",
			InvestorStatus::Meeting => "Meeting",
			InvestorStatus::DueDiligence => "Due Diligence",
			InvestorStatus::Committed => "Committed",
			InvestorStatus::Passed => "Passed",
		}
	}
}

/// Review state of an investor record. Rejected investors never become nodes.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
	#[default]
	Approved,
	Pending,
	Rejected,
}

impl ApprovalStatus {
	pub fn is_rejected(self) -> bool {
		self == ApprovalStatus::Rejected
	}
}

/// One investor as delivered by the console's data layer.
///
/// Only `id` and `name` are required; every categorical attribute may be absent or
/// empty, in which case it simply never links this investor to another.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Investor {
	pub id: String,
	pub name: String,
	/// Firm or affiliation.
	#[serde(default, alias = "affiliation")]
	pub company: Option<String>,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default)]
	pub city: Option<String>,
	#[serde(default)]
	pub status: InvestorStatus,
	/// Pipeline value in dollars.
	#[serde(default, alias = "pipeline_value")]
	pub pipeline_value: f64,
	#[serde(default)]
	pub approval: ApprovalStatus,
}

/// The three kinds of shared-attribute ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
	SharedCompany,
	SharedCategory,
	SharedCity,
}

impl EdgeKind {
	/// Every kind, strongest tie first.
	pub const ALL: [EdgeKind; 3] = [
		EdgeKind::SharedCompany,
		EdgeKind::SharedCategory,
		EdgeKind::SharedCity,
	];

	pub fn label(self) -> &'static str {
		match self {
			EdgeKind::SharedCompany => "Company",
			EdgeKind::SharedCategory => "Category",
			EdgeKind::SharedCity => "City",
		}
	}
}

/// Per-kind visibility toggles. All kinds start enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeFilters {
	pub company: bool,
	pub category: bool,
	pub city: bool,
}

impl Default for EdgeFilters {
	fn default() -> Self {
		Self {
			company: true,
			category: true,
			city: true,
		}
	}
}

impl EdgeFilters {
	pub fn enabled(&self, kind: EdgeKind) -> bool {
		match kind {
			EdgeKind::SharedCompany => self.company,
			EdgeKind::SharedCategory => self.category,
			EdgeKind::SharedCity => self.city,
		}
	}

	pub fn toggle(&mut self, kind: EdgeKind) {
		let flag = match kind {
			EdgeKind::SharedCompany => &mut self.company,
			EdgeKind::SharedCategory => &mut self.category,
			EdgeKind::SharedCity => &mut self.city,
		};
		*flag = !*flag;
	}
}

/// Size of the drawing area in screen pixels; the layout lives in the same space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
}

impl Bounds {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Centering target for the layout.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}
