//! investor-graph: interactive relationship graph for the investor console.
//!
//! This crate provides a WASM-based component that links investors by shared
//! company, category and city, lays them out with a deterministic force
//! relaxation and renders the result with pan/zoom, filtering, hover and
//! selection.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub mod components;
pub mod error;

pub use components::relationship_graph::{
	ApprovalStatus, EdgeKind, GraphConfig, Investor, InvestorStatus, RelationshipGraph,
};
pub use error::{GraphError, Result};

/// Element id of the JSON investor snapshot embedded in the page.
pub const INVESTOR_DATA_ID: &str = "investor-data";
/// Element id of the optional JSON configuration override.
pub const GRAPH_CONFIG_ID: &str = "graph-config";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("investor-graph: logging initialized");
}

/// Parses the JSON text of a `<script>` element.
fn load_json_script<T: DeserializeOwned>(id: &str) -> Result<T> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or(GraphError::NoDocument)?;
	let element = document
		.get_element_by_id(id)
		.ok_or_else(|| GraphError::MissingElement { id: id.to_string() })?;
	let script: HtmlScriptElement = element.dyn_into().map_err(|_| GraphError::WrongElement {
		id: id.to_string(),
		expected: "script",
	})?;
	let json_text = script.text().map_err(|_| GraphError::MissingElement { id: id.to_string() })?;
	parse_json(id, &json_text)
}

fn parse_json<T: DeserializeOwned>(id: &str, json_text: &str) -> Result<T> {
	serde_json::from_str(json_text).map_err(|source| GraphError::Parse {
		id: id.to_string(),
		source,
	})
}

/// Loads the investor snapshot from the element with id `investor-data`.
/// Expected format: JSON array of investor records.
pub fn load_investors() -> Result<Vec<Investor>> {
	let investors: Vec<Investor> = load_json_script(INVESTOR_DATA_ID)?;
	info!("investor-graph: loaded {} investors", investors.len());
	Ok(investors)
}

/// Loads configuration overrides from the element with id `graph-config`, falling
/// back to defaults when the element is absent or malformed. Sections with
/// inverted ranges are reset individually.
pub fn load_config() -> GraphConfig {
	match load_json_script::<GraphConfig>(GRAPH_CONFIG_ID) {
		Ok(config) => config.sanitized(),
		Err(GraphError::MissingElement { .. }) => GraphConfig::default(),
		Err(e) => {
			warn!("investor-graph: {}; using default configuration", e);
			GraphConfig::default()
		}
	}
}

/// Main application component.
/// Loads investors from the DOM and renders the relationship graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let investors = load_investors().unwrap_or_else(|e| {
		warn!("investor-graph: {}", e);
		Vec::new()
	});
	let config = load_config();
	let investors = Signal::derive(move || investors.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Investor Relationships" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<RelationshipGraph investors=investors config=config fullscreen=true />
			<div class="graph-overlay">
				<h1>"Investor Relationships"</h1>
				<p class="subtitle">"Click an investor to isolate its ties. Scroll to zoom. Drag to pan."</p>
			</div>
		</div>
	}
}
