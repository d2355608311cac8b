//! Boundary errors: loading data from the page and acquiring the drawing surface.
//!
//! The layout and viewport code is infallible; only the browser-facing edges of the
//! crate can fail, and callers log these and fall back to an empty graph.

/// Failures at the DOM / data-loading boundary.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	/// The browser window or its document is missing.
	#[error("no window or document available")]
	NoDocument,
	/// No element carries the requested id.
	#[error("element #{id} not found")]
	MissingElement {
		/// Element id looked up.
		id: String,
	},
	/// The element exists but has an unexpected tag.
	#[error("element #{id} is not a <{expected}> element")]
	WrongElement {
		/// Element id looked up.
		id: String,
		/// Tag name that was required.
		expected: &'static str,
	},
	/// The element text is not valid JSON for the target type.
	#[error("failed to parse JSON in #{id}: {source}")]
	Parse {
		/// Element id the text came from.
		id: String,
		/// Underlying decoder error.
		#[source]
		source: serde_json::Error,
	},
	/// The canvas refused to hand out a 2d context.
	#[error("2d canvas context unavailable")]
	NoCanvasContext,
}

/// Result alias for boundary operations.
pub type Result<T> = std::result::Result<T, GraphError>;
