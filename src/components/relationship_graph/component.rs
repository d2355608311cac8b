//! Leptos component wrapping the relationship graph canvas.
//!
//! The component creates an HTML canvas plus a small toolbar and translates
//! mouse, wheel, resize and button events into [`GraphCommand`]s. An animation
//! loop runs via `requestAnimationFrame` and redraws the current state each frame;
//! it never relaxes the layout, that only happens inside the commands that need it.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::builder::EdgeCounts;
use super::config::GraphConfig;
use super::render::{self, CanvasSurface};
use super::state::{GraphCommand, GraphState};
use super::theme::Theme;
use super::types::{EdgeFilters, EdgeKind, Investor};
use crate::error::{GraphError, Result};

/// Bundles graph state with its visual theme.
struct GraphContext {
	state: GraphState,
	theme: Theme,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into().ok())
		.ok_or(GraphError::NoCanvasContext)
}

/// Pointer position relative to the canvas' top-left corner.
fn canvas_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Applies a command if the graph is initialised. Returns whether it relaxed the layout.
fn dispatch(context: &SharedContext, command: GraphCommand) -> bool {
	match *context.borrow_mut() {
		Some(ref mut c) => c.state.apply(command),
		None => false,
	}
}

/// Renders investors as an interactive relationship graph on a canvas element.
///
/// Pass investors via the reactive `investors` signal; every change rebuilds the
/// graph. The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and follow window resizes. Explicit
/// `width`/`height` override automatic sizing.
#[component]
pub fn RelationshipGraph(
	#[prop(into)] investors: Signal<Vec<Investor>>,
	#[prop(optional)] config: GraphConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	let filters = RwSignal::new(EdgeFilters::default());
	let counts = RwSignal::new(EdgeCounts::default());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("investor-graph: {}", GraphError::NoDocument);
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = match context_2d(&canvas) {
			Ok(ctx) => ctx,
			Err(e) => {
				warn!("investor-graph: {}", e);
				return;
			}
		};

		let state = GraphState::new(investors.get_untracked(), w, h, config.clone());
		counts.set(state.edge_counts());
		filters.set(state.viewport.filters());
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			theme: Theme::default(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if dispatch(&context_resize, GraphCommand::Resize { width: nw, height: nh }) {
					debug!("investor-graph: resized to {}x{}", nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref c) = *context_anim.borrow() {
				let mut surface = CanvasSurface::new(&ctx);
				render::render(&c.state.scene(), &mut surface, &c.state.config().render, &c.theme);
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Later investor lists rebuild the graph; the first one is consumed above.
	let context_data = context.clone();
	Effect::new(move |prev: Option<()>| {
		let list = investors.get();
		if prev.is_some() {
			let mut guard = context_data.borrow_mut();
			if let Some(ref mut c) = *guard {
				c.state.apply(GraphCommand::SetInvestors(list));
				counts.set(c.state.edge_counts());
			}
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_position(canvas_ref, &ev) {
			dispatch(&context_md, GraphCommand::PointerDown { x, y });
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_position(canvas_ref, &ev) {
			dispatch(&context_mm, GraphCommand::PointerMove { x, y });
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		dispatch(&context_mu, GraphCommand::PointerUp);
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		dispatch(&context_ml, GraphCommand::PointerLeave);
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = canvas_position(canvas_ref, &ev) {
			dispatch(&context_wh, GraphCommand::Wheel {
				delta_y: ev.delta_y(),
				x,
				y,
			});
		}
	};

	let button = |command: GraphCommand| {
		let context = context.clone();
		move |_: MouseEvent| {
			dispatch(&context, command.clone());
		}
	};

	let (on_zoom_in, on_zoom_out, on_reset) = (
		button(GraphCommand::ZoomIn),
		button(GraphCommand::ZoomOut),
		button(GraphCommand::ResetView),
	);

	let filter_buttons = EdgeKind::ALL
		.into_iter()
		.map(|kind| {
			let context = context.clone();
			let on_click = move |_: MouseEvent| {
				if dispatch(&context, GraphCommand::ToggleFilter(kind)) {
					filters.update(|f| f.toggle(kind));
				}
			};
			view! {
				<button
					class=move || {
						if filters.get().enabled(kind) { "graph-filter active" } else { "graph-filter" }
					}
					on:click=on_click
				>
					{kind.label()}
					" ("
					{move || counts.get().get(kind)}
					")"
				</button>
			}
		})
		.collect_view();

	view! {
		<div class="relationship-graph">
			<canvas
				node_ref=canvas_ref
				class="relationship-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="graph-toolbar">
				<button title="Zoom in" on:click=on_zoom_in>"+"</button>
				<button title="Zoom out" on:click=on_zoom_out>"-"</button>
				<button title="Reset view" on:click=on_reset>"Reset"</button>
				{filter_buttons}
			</div>
		</div>
	}
}
