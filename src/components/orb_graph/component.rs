use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use leptos::prelude::*;
use log::info;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::camera::CameraSettings;
use super::graph::GraphModel;
use super::render;
use super::selection::SelectionEvent;
use super::state::OrbGraphState;
use super::types::{GraphData, Millis};

fn now() -> Millis {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or(0.0)
}

fn viewport(window: &Window) -> (f64, f64) {
	(
		window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0),
		window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0),
	)
}

fn node_names(graph: &GraphModel) -> HashMap<String, String> {
	graph
		.nodes()
		.iter()
		.map(|n| (n.id.clone(), n.name.clone()))
		.collect()
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// 3D node orb drawn on a 2D canvas. Click a node to focus it, click a
/// highlighted connection label to follow it, drag to orbit, scroll to zoom.
#[component]
pub fn OrbGraphCanvas(
	/// Graph to draw. A new value replaces the graph and resets the selection.
	#[prop(into)]
	data: Signal<GraphData>,
	/// First node whose name contains this text gets selected.
	#[prop(into)]
	search: Signal<String>,
	/// Every change of this counter steps back through the history.
	#[prop(into)]
	back: Signal<u32>,
	/// Receives the selected node's name, or `None` when the selection is cleared.
	#[prop(optional)]
	on_select: Option<Callback<Option<String>>>,
	/// Camera timing, offsets and zoom limits.
	#[prop(optional)]
	settings: CameraSettings,
	/// Size the canvas to the window and follow its resizes.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed width; defaults to the parent's width.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed height; defaults to the parent's height.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<OrbGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let names: Rc<RefCell<HashMap<String, String>>> = Rc::new(RefCell::new(HashMap::new()));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			viewport(&window)
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

		let Some(ctx) = context_2d(&canvas) else {
			log::error!("canvas has no 2d context");
			return;
		};

		let graph_data = data.get();
		{
			let mut slot = state_init.borrow_mut();
			match slot.as_mut() {
				// keep the store so its observer hears the reset
				Some(s) => {
					s.resize(w, h);
					s.reload(graph_data);
				}
				None => {
					let mut fresh = OrbGraphState::new(graph_data, settings, w, h);
					if let Some(cb) = on_select {
						let names = names.clone();
						fresh.selection.subscribe(move |event| match event {
							SelectionEvent::Selected { id, .. } => {
								cb.run(names.borrow().get(id).cloned())
							}
							SelectionEvent::Cleared | SelectionEvent::Reset => cb.run(None),
						});
					}
					info!("orb graph ready ({} nodes)", fresh.graph.nodes().len());
					*slot = Some(fresh);
				}
			}
			if let Some(s) = slot.as_ref() {
				*names.borrow_mut() = node_names(&s.graph);
			}
		}

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = viewport(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		// one frame loop per canvas; reloads only swap the state it draws
		if animate_init.borrow().is_some() {
			return;
		}
		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(now());
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_search = state.clone();
	Effect::new(move |_| {
		let query = search.get();
		if let Some(ref mut s) = *state_search.borrow_mut() {
			s.search(&query, now());
		}
	});

	let state_back = state.clone();
	Effect::new(move |prev: Option<u32>| {
		let requested = back.get();
		if prev.is_some_and(|p| p != requested) {
			if let Some(ref mut s) = *state_back.borrow_mut() {
				s.back(now());
			}
		}
		requested
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.drag_start(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.drag_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			let was_drag = s.drag_end();
			if !was_drag {
				s.click_at(x, y, now());
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag_end();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom(ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="orb-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
