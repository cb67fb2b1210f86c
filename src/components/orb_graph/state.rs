use log::{debug, error, info, warn};

use super::camera::{CameraController, CameraSettings};
use super::geometry::curve;
use super::graph::GraphModel;
use super::navigation::{Click, Navigation, resolve};
use super::projection::Projector;
use super::scale::node_scale;
use super::selection::{NavDirection, SelectionStore};
use super::types::{GraphData, Millis, NodeId};

/// Node sphere radius in world units.
pub const NODE_RADIUS: f64 = 1.0;
/// Minimum clickable radius around a node, in canvas pixels.
pub const HIT_RADIUS: f64 = 12.0;
pub const SELECTED_SCALE: f64 = 1.5;
pub const RESTING_SCALE: f64 = 1.2;
/// Connection label plate size in world units.
pub const LABEL_WIDTH: f64 = 2.0;
pub const NAV_LABEL_WIDTH: f64 = 2.5;
pub const LABEL_HEIGHT: f64 = 0.4;

const ORBIT_SPEED: f64 = 0.005;
// pointer travel, in pixels, that turns a click into a drag
const DRAG_THRESHOLD: f64 = 3.0;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub last_x: f64,
	pub last_y: f64,
}

/// Everything the canvas needs between frames: the graph, who is selected
/// and where the camera is.
pub struct OrbGraphState {
	pub graph: GraphModel,
	pub selection: SelectionStore,
	pub camera: CameraController,
	pub drag: DragState,
	pub width: f64,
	pub height: f64,
}

impl OrbGraphState {
	pub fn new(data: GraphData, settings: CameraSettings, width: f64, height: f64) -> Self {
		Self {
			graph: load(data),
			selection: SelectionStore::new(),
			camera: CameraController::new(settings),
			drag: DragState::default(),
			width,
			height,
		}
	}

	/// Swap in a new graph. Selection and history are reset, which observers
	/// hear about, and the camera returns home.
	pub fn reload(&mut self, data: GraphData) {
		self.graph = load(data);
		self.selection.reset();
		self.camera = CameraController::new(*self.camera.settings());
		self.drag = DragState::default();
		info!("graph reloaded ({} nodes)", self.graph.nodes().len());
	}

	pub fn projector(&self) -> Projector {
		Projector::new(
			self.camera.pose(),
			self.width,
			self.height,
			self.camera.settings().fov_degrees,
		)
	}

	/// Whether a connection is drawn at all under the current selection.
	pub fn is_connection_visible(&self, source: &str, target: &str) -> bool {
		let sel = self.selection.state();
		sel.selected().is_none()
			|| sel.is_connection_highlighted(source, target)
			|| sel.navigable_direction(source, target) != NavDirection::None
	}

	/// Radius of a node sphere in world units, as drawn.
	pub fn node_radius(&self, id: &str) -> f64 {
		let factor = if self.selection.selected() == Some(id) {
			SELECTED_SCALE
		} else {
			RESTING_SCALE
		};
		let distance_scale = self.graph.position(id).map(node_scale).unwrap_or(1.0);
		NODE_RADIUS * factor * distance_scale
	}

	/// Front-most node under the canvas point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let proj = self.projector();
		self.graph
			.nodes()
			.iter()
			.filter_map(|n| {
				let p = proj.project(n.position?)?;
				let radius = (self.node_radius(&n.id) * p.scale).max(HIT_RADIUS);
				let (dx, dy) = (p.x - sx, p.y - sy);
				((dx * dx + dy * dy).sqrt() < radius).then_some((p.depth, &n.id))
			})
			.min_by(|a, b| a.0.total_cmp(&b.0))
			.map(|(_, id)| id.clone())
	}

	/// Front-most visible connection whose label plate covers the canvas point.
	pub fn connection_at_position(&self, sx: f64, sy: f64) -> Option<(NodeId, NodeId)> {
		let proj = self.projector();
		let sel = self.selection.state();
		self.graph
			.connections()
			.iter()
			.filter(|c| self.is_connection_visible(&c.source, &c.target))
			.filter_map(|c| {
				let start = self.graph.position(&c.source)?;
				let end = self.graph.position(&c.target)?;
				let p = proj.project(curve(start, end).label_anchor)?;
				let width = match sel.navigable_direction(&c.source, &c.target) {
					NavDirection::None => LABEL_WIDTH,
					_ => NAV_LABEL_WIDTH,
				};
				let half_w = (width * 0.5 * p.scale).max(HIT_RADIUS);
				let half_h = (LABEL_HEIGHT * 0.5 * p.scale).max(HIT_RADIUS * 0.5);
				((p.x - sx).abs() <= half_w && (p.y - sy).abs() <= half_h).then_some((p.depth, c))
			})
			.min_by(|a, b| a.0.total_cmp(&b.0))
			.map(|(_, c)| (c.source.clone(), c.target.clone()))
	}

	/// Hit-test a click and act on it. Nodes win over connection labels.
	pub fn click_at(&mut self, sx: f64, sy: f64, now: Millis) -> Navigation {
		if let Some(id) = self.node_at_position(sx, sy) {
			return self.handle_click(Click::Node(&id), now);
		}
		if let Some((source, target)) = self.connection_at_position(sx, sy) {
			return self.handle_click(
				Click::Connection {
					source: &source,
					target: &target,
				},
				now,
			);
		}
		self.handle_click(Click::Background, now)
	}

	pub fn handle_click(&mut self, click: Click<'_>, now: Millis) -> Navigation {
		let nav = resolve(self.selection.state(), click);
		match &nav {
			Navigation::Select(id) => {
				self.select_and_focus(id, now);
			}
			Navigation::Clear => self.selection.clear(),
			Navigation::Inspect => debug!("inspecting {click:?}"),
			Navigation::Ignore => {}
		}
		nav
	}

	/// Select `id` and start the camera toward it. Stale ids are logged and dropped.
	pub fn select_and_focus(&mut self, id: &str, now: Millis) -> bool {
		if let Err(e) = self.selection.select(&self.graph, id) {
			warn!("ignoring stale selection: {e}");
			return false;
		}
		self.camera.focus_node(&self.graph, id, now);
		true
	}

	/// Select and focus the first node whose name matches `query`.
	pub fn search(&mut self, query: &str, now: Millis) -> Option<NodeId> {
		let id = self.graph.find_by_name(query)?.id.clone();
		self.select_and_focus(&id, now).then_some(id)
	}

	/// Return to the previously visited node.
	pub fn back(&mut self, now: Millis) -> Option<NodeId> {
		match self.selection.back(&self.graph) {
			Ok(Some(id)) => {
				self.camera.focus_node(&self.graph, &id, now);
				Some(id)
			}
			Ok(None) => None,
			Err(e) => {
				warn!("ignoring stale history entry: {e}");
				None
			}
		}
	}

	/// Advance the camera. Returns whether anything moved.
	pub fn tick(&mut self, now: Millis) -> bool {
		self.camera.tick(now)
	}

	pub fn drag_start(&mut self, x: f64, y: f64) {
		self.drag = DragState {
			active: true,
			moved: false,
			start_x: x,
			start_y: y,
			last_x: x,
			last_y: y,
		};
	}

	pub fn drag_move(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			return;
		}
		let (dx, dy) = (x - self.drag.last_x, y - self.drag.last_y);
		if (x - self.drag.start_x).hypot(y - self.drag.start_y) > DRAG_THRESHOLD {
			self.drag.moved = true;
		}
		if self.drag.moved {
			self.camera.orbit(dx * ORBIT_SPEED, dy * ORBIT_SPEED);
		}
		self.drag.last_x = x;
		self.drag.last_y = y;
	}

	/// End a drag. Returns true when the pointer travelled far enough to not count as a click.
	pub fn drag_end(&mut self) -> bool {
		let moved = self.drag.active && self.drag.moved;
		self.drag = DragState::default();
		moved
	}

	/// Dolly out for positive wheel deltas, in for negative ones. Horizontal
	/// scrolls carry no vertical delta and leave the camera alone.
	pub fn zoom(&mut self, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			1.1
		} else if delta_y < 0.0 {
			0.9
		} else {
			return;
		};
		self.camera.dolly(factor);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

fn load(data: GraphData) -> GraphModel {
	let graph = GraphModel::new(data).unwrap_or_else(|e| {
		error!("failed to load graph: {e}");
		GraphModel::default()
	});
	debug!(
		"loaded {} nodes and {} connections",
		graph.nodes().len(),
		graph.connections().len()
	);
	graph
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;
	use crate::components::orb_graph::camera::{CameraState, focus_direction, pose_for};
	use crate::components::orb_graph::selection::SelectionEvent;
	use crate::components::orb_graph::types::{
		ConnectionKind, GraphConnection, GraphNode, SEED_GRAPH,
	};

	fn seeded() -> OrbGraphState {
		let data: GraphData = serde_json::from_str(SEED_GRAPH).unwrap();
		OrbGraphState::new(data, CameraSettings::default(), 800.0, 600.0)
	}

	#[test]
	fn clicking_a_node_selects_then_animates() {
		let mut state = seeded();
		// node1 sits at the origin, which the home pose looks at
		let nav = state.click_at(400.0, 300.0, 0.0);
		assert_eq!(nav, Navigation::Select("node1".into()));
		assert_eq!(state.selection.selected(), Some("node1"));
		assert_eq!(state.camera.state(), CameraState::Animating);

		assert!(state.tick(800.0));
		let expected = pose_for(
			glam::DVec3::ZERO,
			focus_direction(&state.graph, "node1"),
			state.camera.settings(),
		);
		assert_eq!(state.camera.pose(), expected);
		assert!(!state.tick(900.0));
	}

	#[test]
	fn empty_space_clears_the_selection() {
		let mut state = seeded();
		assert_eq!(state.click_at(5.0, 5.0, 0.0), Navigation::Ignore);
		state.handle_click(Click::Node("node2"), 0.0);
		// camera has not ticked yet, so the corner is still empty
		assert_eq!(state.click_at(5.0, 5.0, 10.0), Navigation::Clear);
		assert_eq!(state.selection.selected(), None);
		assert_eq!(state.selection.state().history().len(), 1);
	}

	#[test]
	fn connection_clicks_walk_the_graph() {
		let mut state = seeded();
		state.handle_click(Click::Node("node1"), 0.0);
		let nav = state.handle_click(
			Click::Connection {
				source: "node1",
				target: "node3",
			},
			100.0,
		);
		assert_eq!(nav, Navigation::Select("node3".into()));
		assert_eq!(state.camera.job().unwrap().start_time, 100.0);

		let nav = state.handle_click(
			Click::Connection {
				source: "node1",
				target: "node3",
			},
			200.0,
		);
		assert_eq!(nav, Navigation::Select("node1".into()));

		let nav = state.handle_click(
			Click::Connection {
				source: "node5",
				target: "node6",
			},
			300.0,
		);
		assert_eq!(nav, Navigation::Inspect);
		assert_eq!(state.selection.selected(), Some("node1"));
	}

	#[test]
	fn connection_label_hit_test_finds_the_anchor() {
		let mut state = seeded();
		let proj = state.projector();
		let start = state.graph.position("node3").unwrap();
		let end = state.graph.position("node5").unwrap();
		let p = proj.project(curve(start, end).label_anchor).unwrap();
		assert_eq!(
			state.connection_at_position(p.x, p.y),
			Some(("node3".into(), "node5".into()))
		);

		// hidden once the selection moves away from it
		state.handle_click(Click::Node("node2"), 0.0);
		assert_eq!(state.connection_at_position(p.x, p.y), None);
	}

	#[test]
	fn stale_clicks_are_ignored() {
		let mut state = seeded();
		state.handle_click(Click::Node("node4"), 0.0);
		state.tick(1000.0);
		let pose = state.camera.pose();

		state.handle_click(Click::Node("ghost"), 1000.0);
		assert_eq!(state.selection.selected(), Some("node4"));
		assert_eq!(state.camera.state(), CameraState::Idle);
		assert_eq!(state.camera.pose(), pose);
	}

	#[test]
	fn search_and_back_navigate() {
		let mut state = seeded();
		assert_eq!(state.search("future", 0.0).as_deref(), Some("node6"));
		assert_eq!(state.search("implementation", 50.0).as_deref(), Some("node5"));
		assert_eq!(state.search("no such node", 60.0), None);
		assert_eq!(state.selection.selected(), Some("node5"));

		assert_eq!(state.back(100.0).as_deref(), Some("node6"));
		assert_eq!(state.selection.selected(), Some("node6"));
		assert_eq!(state.camera.job().unwrap().start_time, 100.0);
	}

	#[test]
	fn bad_documents_render_nothing() {
		let data = GraphData {
			nodes: vec![],
			connections: vec![GraphConnection::new("a", "b", ConnectionKind::Weak)],
		};
		let mut state = OrbGraphState::new(data, CameraSettings::default(), 100.0, 100.0);
		assert!(state.graph.is_empty());
		assert_eq!(state.click_at(50.0, 50.0, 0.0), Navigation::Ignore);
	}

	#[test]
	fn small_pointer_jitter_is_still_a_click() {
		let mut state = seeded();
		let before = state.camera.pose();
		state.drag_start(100.0, 100.0);
		state.drag_move(101.0, 101.0);
		assert!(!state.drag_end());
		assert_eq!(state.camera.pose(), before);

		state.drag_start(100.0, 100.0);
		state.drag_move(160.0, 120.0);
		assert!(state.drag_end());
		assert_ne!(state.camera.pose(), before);
	}

	#[test]
	fn reload_resets_selection_and_tells_observers() {
		let mut state = seeded();
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = seen.clone();
		state.selection.subscribe(move |e| sink.borrow_mut().push(e.clone()));

		state.handle_click(Click::Node("node2"), 0.0);
		state.handle_click(Click::Node("node4"), 10.0);
		state.drag_start(10.0, 10.0);

		state.reload(GraphData {
			nodes: vec![GraphNode {
				id: "solo".into(),
				name: "Solo".into(),
				position: Some(glam::DVec3::new(3.0, 0.0, 0.0)),
				color: "#ffffff".into(),
			}],
			connections: vec![],
		});

		assert_eq!(seen.borrow().last(), Some(&SelectionEvent::Reset));
		assert_eq!(state.selection.selected(), None);
		assert_eq!(state.selection.state().history().len(), 0);
		assert_eq!(state.graph.nodes().len(), 1);
		assert!(!state.graph.contains("node2"));
		assert_eq!(state.camera.pose(), CameraSettings::default().home_pose);
		assert_eq!(state.camera.state(), CameraState::Idle);
		assert!(!state.drag_end());
		assert_eq!(state.back(20.0), None);
	}

	#[test]
	fn only_vertical_wheel_motion_zooms() {
		let mut state = seeded();
		let home = state.camera.pose().distance();

		state.zoom(0.0);
		assert_eq!(state.camera.pose().distance(), home);

		state.zoom(120.0);
		assert!(state.camera.pose().distance() > home);
		state.zoom(-120.0);
		state.zoom(-120.0);
		assert!(state.camera.pose().distance() < home);
	}
}
