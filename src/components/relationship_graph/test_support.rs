//! Fixtures shared by the unit tests of this component.

use super::types::Investor;

/// An approved investor; empty strings leave the attribute unset.
pub fn investor(id: &str, company: &str, category: &str, city: &str, value: f64) -> Investor {
	let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
	Investor {
		id: id.into(),
		name: format!("Investor {id}"),
		company: opt(company),
		category: opt(category),
		city: opt(city),
		pipeline_value: value,
		..Default::default()
	}
}
