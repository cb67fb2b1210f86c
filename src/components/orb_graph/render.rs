use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::{CURVE_SEGMENTS, curve};
use super::projection::{Projector, ScreenPoint};
use super::scale::node_scale;
use super::selection::NavDirection;
use super::state::{LABEL_HEIGHT, LABEL_WIDTH, NAV_LABEL_WIDTH, OrbGraphState};
use super::types::{ConnectionKind, GraphNode};

const BACKGROUND: &str = "#000020";
const SELECTED_COLOR: &str = "#ff9900";
const MIN_FONT_PX: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub color: String,
	pub opacity: f64,
	pub label_color: &'static str,
}

pub fn node_style(
	node: &GraphNode,
	any_selected: bool,
	selected: bool,
	highlighted: bool,
) -> NodeStyle {
	let emphasized = !any_selected || highlighted;
	NodeStyle {
		color: if selected {
			SELECTED_COLOR.into()
		} else {
			node.color.clone()
		},
		opacity: if emphasized { 0.9 } else { 0.2 },
		label_color: if emphasized { "#ffffff" } else { "#aaaaaa" },
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectionStyle {
	pub color: &'static str,
	pub opacity: f64,
	/// Tube radius in world units.
	pub radius: f64,
}

pub fn connection_style(
	kind: ConnectionKind,
	any_selected: bool,
	highlighted: bool,
	direction: NavDirection,
) -> ConnectionStyle {
	let strong = kind == ConnectionKind::Strong;
	let navigable = direction != NavDirection::None;
	let color = match direction {
		NavDirection::Upstream => "#ffaa00",
		NavDirection::Downstream => "#00ffaa",
		NavDirection::None if highlighted => {
			if strong {
				"#60c0ff"
			} else {
				"#60ffa0"
			}
		}
		NavDirection::None => {
			if strong {
				"#4080ff"
			} else {
				"#40ff80"
			}
		}
	};
	let (opacity, radius) = match (any_selected, highlighted || navigable, strong) {
		(false, _, true) => (0.8, 0.04),
		(false, _, false) => (0.6, 0.025),
		(true, true, true) => (0.9, 0.08),
		(true, true, false) => (0.8, 0.05),
		(true, false, _) => (0.05, 0.01),
	};
	ConnectionStyle {
		color,
		opacity,
		radius,
	}
}

/// Label text for a connection, pointing the way a click would go.
pub fn label_text(direction: NavDirection, source: Option<&str>, target: Option<&str>) -> String {
	match (direction, source, target) {
		(NavDirection::Upstream, s, _) => format!("⬅ {}", s.unwrap_or("upstream")),
		(NavDirection::Downstream, _, t) => format!("{} ➡", t.unwrap_or("downstream")),
		(NavDirection::None, Some(s), Some(t)) => format!("{s} → {t}"),
		_ => String::new(),
	}
}

pub fn label_background(direction: NavDirection) -> &'static str {
	match direction {
		NavDirection::Upstream => "rgba(255, 170, 0, 0.7)",
		NavDirection::Downstream => "rgba(0, 255, 170, 0.7)",
		NavDirection::None => "rgba(0, 0, 0, 0.7)",
	}
}

pub fn render(state: &OrbGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	if state.graph.is_empty() {
		return;
	}
	let proj = state.projector();
	draw_connections(state, &proj, ctx);
	draw_nodes(state, &proj, ctx);
}

fn draw_connections(state: &OrbGraphState, proj: &Projector, ctx: &CanvasRenderingContext2d) {
	let sel = state.selection.state();
	let any_selected = sel.selected().is_some();
	let mut labels = Vec::new();

	for c in state.graph.connections() {
		if !state.is_connection_visible(&c.source, &c.target) {
			continue;
		}
		let (Some(start), Some(end)) = (
			state.graph.position(&c.source),
			state.graph.position(&c.target),
		) else {
			continue;
		};
		let direction = sel.navigable_direction(&c.source, &c.target);
		let style = connection_style(
			c.kind,
			any_selected,
			sel.is_connection_highlighted(&c.source, &c.target),
			direction,
		);
		let shape = curve(start, end);
		let points: Vec<ScreenPoint> = shape
			.path
			.sample(CURVE_SEGMENTS)
			.into_iter()
			.filter_map(|p| proj.project(p))
			.collect();
		if points.len() < 2 {
			continue;
		}
		let mean_scale = points.iter().map(|p| p.scale).sum::<f64>() / points.len() as f64;

		ctx.set_global_alpha(style.opacity);
		ctx.set_stroke_style_str(style.color);
		ctx.set_line_width((style.radius * 2.0 * mean_scale).max(0.5));
		if c.kind == ConnectionKind::Weak {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(6.0),
				&JsValue::from_f64(4.0),
			));
		}
		ctx.begin_path();
		ctx.move_to(points[0].x, points[0].y);
		for p in &points[1..] {
			ctx.line_to(p.x, p.y);
		}
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		if let Some(anchor) = proj.project(shape.label_anchor) {
			let text = label_text(
				direction,
				state.graph.node(&c.source).ok().map(|n| n.name.as_str()),
				state.graph.node(&c.target).ok().map(|n| n.name.as_str()),
			);
			labels.push((anchor, direction, text));
		}
	}
	ctx.set_global_alpha(1.0);

	// far labels first so near ones stay readable
	labels.sort_by(|a, b| b.0.depth.total_cmp(&a.0.depth));
	for (anchor, direction, text) in labels {
		let width = if direction == NavDirection::None {
			LABEL_WIDTH
		} else {
			NAV_LABEL_WIDTH
		};
		let (w, h) = (width * anchor.scale, LABEL_HEIGHT * anchor.scale);
		ctx.set_global_alpha(0.8);
		ctx.set_fill_style_str(label_background(direction));
		ctx.fill_rect(anchor.x - w * 0.5, anchor.y - h * 0.5, w, h);
		ctx.set_global_alpha(1.0);

		ctx.set_fill_style_str("white");
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.set_font(&format!("{}px sans-serif", (0.2 * anchor.scale).max(MIN_FONT_PX)));
		let _ = ctx.fill_text(&text, anchor.x, anchor.y);
	}
}

fn draw_nodes(state: &OrbGraphState, proj: &Projector, ctx: &CanvasRenderingContext2d) {
	let sel = state.selection.state();
	let any_selected = sel.selected().is_some();

	let mut visible: Vec<(&GraphNode, ScreenPoint)> = state
		.graph
		.nodes()
		.iter()
		.filter_map(|n| Some((n, proj.project(n.position?)?)))
		.collect();
	visible.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

	for (node, p) in visible {
		let style = node_style(
			node,
			any_selected,
			sel.selected() == Some(node.id.as_str()),
			sel.is_highlighted(&state.graph, &node.id),
		);
		let radius = state.node_radius(&node.id) * p.scale;
		let distance_scale = node.position.map(node_scale).unwrap_or(1.0);

		ctx.set_global_alpha(style.opacity);
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&style.color);
		ctx.fill();
		ctx.set_global_alpha(1.0);

		ctx.set_fill_style_str(style.label_color);
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.set_font(&format!(
			"{}px sans-serif",
			(0.3 * distance_scale * p.scale).max(MIN_FONT_PX)
		));
		let _ = ctx.fill_text(&node.name, p.x, p.y + 1.5 * distance_scale * p.scale);
	}
}
