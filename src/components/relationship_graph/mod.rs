//! Investor relationship graph.
//!
//! Renders approved investors as an interactive graph on an HTML canvas with:
//! - Edges derived from shared company, category and city
//! - A deterministic, fixed-iteration force layout
//! - Pan, zoom, hover tooltip and click-to-select isolation
//! - Per-kind edge filters and a status legend
//!
//! The layout is recomputed only when the investor list, the edge filters or the
//! canvas size change; navigation never moves nodes.
//!
//! # Example
//!
//! ```ignore
//! use investor_graph::{Investor, RelationshipGraph};
//!
//! let investors = vec![
//!     Investor { id: "a".into(), name: "Acme Ventures".into(), city: Some("Austin".into()), ..Default::default() },
//!     Investor { id: "b".into(), name: "Beta Capital".into(), city: Some("Austin".into()), ..Default::default() },
//! ];
//!
//! view! { <RelationshipGraph investors=Signal::derive(move || investors.clone()) fullscreen=true /> }
//! ```

pub mod builder;
mod component;
pub mod config;
pub mod layout;
pub mod render;
pub mod state;
pub mod theme;
mod types;
pub mod viewport;

#[cfg(test)]
mod test_support;

pub use component::RelationshipGraph;
pub use config::GraphConfig;
pub use state::{GraphCommand, GraphState};
pub use theme::Theme;
pub use types::{ApprovalStatus, Bounds, EdgeFilters, EdgeKind, Investor, InvestorStatus};
