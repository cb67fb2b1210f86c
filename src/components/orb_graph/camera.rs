//! Camera pose and the eased, cancellable transition between poses.
//!
//! [`CameraController::tick`] is a pure function of the timestamp it is given,
//! so the render loop, a fixed-step loop or a test can all drive it.

use std::f64::consts::PI;

use glam::DVec3;
use log::debug;

use super::graph::GraphModel;
use super::types::Millis;

// keeps orbiting away from the poles
const POLAR_MARGIN: f64 = 0.05;

/// Where the camera is and what it looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
	/// Eye position.
	pub position: DVec3,
	/// Point the camera faces.
	pub look_at: DVec3,
}

impl CameraPose {
	/// Pose at `position` facing `look_at`.
	pub fn new(position: DVec3, look_at: DVec3) -> Self {
		Self { position, look_at }
	}

	/// Distance from the camera to its look-at point.
	pub fn distance(&self) -> f64 {
		(self.look_at - self.position).length()
	}
}

/// Tunables for focusing, animating and orbiting the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSettings {
	/// Length of a focus transition.
	pub duration_ms: Millis,
	/// How far behind the focused node the camera sits.
	pub offset_behind: f64,
	/// How far past the focused node the camera looks.
	pub offset_ahead: f64,
	/// Vertical field of view.
	pub fov_degrees: f64,
	/// Closest the wheel can dolly in.
	pub min_distance: f64,
	/// Farthest the wheel can dolly out.
	pub max_distance: f64,
	/// Pose before anything is selected.
	pub home_pose: CameraPose,
}

impl Default for CameraSettings {
	fn default() -> Self {
		Self {
			duration_ms: 800.0,
			offset_behind: 8.0,
			offset_ahead: 10.0,
			fov_degrees: 75.0,
			min_distance: 8.0,
			max_distance: 150.0,
			home_pose: CameraPose::new(DVec3::new(0.0, 20.0, 60.0), DVec3::ZERO),
		}
	}
}

/// A transition in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationJob {
	/// Pose when the transition started.
	pub start_pose: CameraPose,
	/// Pose reached at the end.
	pub target_pose: CameraPose,
	/// Timestamp of the `move_to` call.
	pub start_time: Millis,
	/// Positive length of the transition.
	pub duration: Millis,
}

impl AnimationJob {
	/// Linear progress in `[0, 1]` at `now`.
	pub fn progress(&self, now: Millis) -> f64 {
		((now - self.start_time) / self.duration).clamp(0.0, 1.0)
	}
}

/// Quadratic ease-out: fast start, slow finish.
pub fn ease_out_quad(progress: f64) -> f64 {
	progress * (2.0 - progress)
}

/// Whether a transition is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraState {
	/// At rest; orbit and dolly apply.
	Idle,
	/// Moving toward a target pose.
	Animating,
}

/// Unit vector from `id` toward the centroid of its placed downstream
/// neighbors, or toward the origin when it has none.
pub fn focus_direction(graph: &GraphModel, id: &str) -> DVec3 {
	let Some(p) = graph.position(id) else {
		return DVec3::Z;
	};
	let downstream: Vec<DVec3> = graph
		.outgoing(id)
		.unwrap_or_default()
		.iter()
		.filter_map(|c| graph.position(&c.target))
		.collect();

	let toward = if downstream.is_empty() {
		DVec3::ZERO
	} else {
		downstream.iter().copied().sum::<DVec3>() / downstream.len() as f64
	};
	(toward - p).try_normalize().unwrap_or(DVec3::Z)
}

/// Pose that keeps `position` near the front of the frame, looking along `dir`.
pub fn pose_for(position: DVec3, dir: DVec3, settings: &CameraSettings) -> CameraPose {
	CameraPose {
		position: position - dir * settings.offset_behind,
		look_at: position + dir * settings.offset_ahead,
	}
}

/// Single writer of the camera pose.
#[derive(Clone, Debug)]
pub struct CameraController {
	pose: CameraPose,
	job: Option<AnimationJob>,
	settings: CameraSettings,
}

impl Default for CameraController {
	fn default() -> Self {
		Self::new(CameraSettings::default())
	}
}

impl CameraController {
	/// Controller resting at the home pose.
	pub fn new(settings: CameraSettings) -> Self {
		Self {
			pose: settings.home_pose,
			job: None,
			settings,
		}
	}

	/// Current pose.
	pub fn pose(&self) -> CameraPose {
		self.pose
	}

	/// Settings it was built with.
	pub fn settings(&self) -> &CameraSettings {
		&self.settings
	}

	/// Transition in flight, if any.
	pub fn job(&self) -> Option<&AnimationJob> {
		self.job.as_ref()
	}

	/// Idle or Animating.
	pub fn state(&self) -> CameraState {
		if self.job.is_some() {
			CameraState::Animating
		} else {
			CameraState::Idle
		}
	}

	/// Shorthand for `state() == CameraState::Animating`.
	pub fn is_animating(&self) -> bool {
		self.job.is_some()
	}

	/// Start a transition from the current pose, replacing any transition in flight.
	pub fn move_to(&mut self, target: CameraPose, duration: Millis, now: Millis) {
		if duration <= 0.0 || !duration.is_finite() {
			self.pose = target;
			self.job = None;
			return;
		}
		if self.job.is_some() {
			debug!("camera retargeted mid-flight");
		}
		self.job = Some(AnimationJob {
			start_pose: self.pose,
			target_pose: target,
			start_time: now,
			duration,
		});
	}

	/// Animate toward node `id`. Unknown or unplaced nodes are ignored.
	pub fn focus_node(&mut self, graph: &GraphModel, id: &str, now: Millis) -> bool {
		let Some(position) = graph.position(id) else {
			return false;
		};
		let target = pose_for(position, focus_direction(graph, id), &self.settings);
		debug!("camera focusing {id}");
		self.move_to(target, self.settings.duration_ms, now);
		true
	}

	/// Advance the transition to `now`. Returns whether the pose changed.
	pub fn tick(&mut self, now: Millis) -> bool {
		let Some(job) = self.job else {
			return false;
		};
		let progress = job.progress(now);
		let t = ease_out_quad(progress);
		let before = self.pose;

		self.pose = CameraPose {
			position: job.start_pose.position.lerp(job.target_pose.position, t),
			look_at: job.target_pose.look_at,
		};
		if progress >= 1.0 {
			self.pose = job.target_pose;
			self.job = None;
		}
		self.pose != before
	}

	/// Rotate the resting camera around its look-at point.
	pub fn orbit(&mut self, yaw: f64, pitch: f64) {
		if self.is_animating() {
			return;
		}
		let offset = self.pose.position - self.pose.look_at;
		let radius = offset.length();
		if radius == 0.0 {
			return;
		}
		let azimuth = offset.x.atan2(offset.z) - yaw;
		let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos() - pitch)
			.clamp(POLAR_MARGIN, PI - POLAR_MARGIN);
		let offset = DVec3::new(
			radius * polar.sin() * azimuth.sin(),
			radius * polar.cos(),
			radius * polar.sin() * azimuth.cos(),
		);
		self.pose.position = self.pose.look_at + offset;
	}

	/// Scale the resting camera's distance to its look-at point.
	pub fn dolly(&mut self, factor: f64) {
		if self.is_animating() || factor <= 0.0 {
			return;
		}
		let offset = self.pose.position - self.pose.look_at;
		let Some(dir) = offset.try_normalize() else {
			return;
		};
		let distance = (offset.length() * factor)
			.clamp(self.settings.min_distance, self.settings.max_distance);
		self.pose.position = self.pose.look_at + dir * distance;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::orb_graph::types::{
		ConnectionKind, GraphConnection, GraphData, GraphNode, SEED_GRAPH,
	};

	const EPS: f64 = 1e-9;

	fn close(a: DVec3, b: DVec3) -> bool {
		(a - b).length() < EPS
	}

	fn target() -> CameraPose {
		CameraPose::new(DVec3::new(10.0, 0.0, 0.0), DVec3::new(20.0, 0.0, 0.0))
	}

	fn controller() -> CameraController {
		CameraController::new(CameraSettings {
			home_pose: CameraPose::new(DVec3::ZERO, DVec3::NEG_Z),
			..CameraSettings::default()
		})
	}

	#[test]
	fn ease_out_hits_its_endpoints() {
		assert_eq!(ease_out_quad(0.0), 0.0);
		assert_eq!(ease_out_quad(1.0), 1.0);
		assert_eq!(ease_out_quad(0.5), 0.75);
	}

	#[test]
	fn tick_at_start_time_stays_at_start() {
		let mut cam = controller();
		cam.move_to(target(), 800.0, 1000.0);
		assert_eq!(cam.state(), CameraState::Animating);

		cam.tick(1000.0);
		assert!(close(cam.pose().position, DVec3::ZERO));
		assert!(close(cam.pose().look_at, target().look_at));
		assert!(cam.is_animating());
	}

	#[test]
	fn midway_position_follows_the_ease() {
		let mut cam = controller();
		cam.move_to(target(), 800.0, 0.0);
		cam.tick(400.0);
		assert!(close(cam.pose().position, DVec3::new(7.5, 0.0, 0.0)));
	}

	#[test]
	fn finishing_lands_exactly_and_goes_idle() {
		let mut cam = controller();
		cam.move_to(target(), 800.0, 0.0);
		assert!(cam.tick(900.0));
		assert_eq!(cam.pose(), target());
		assert_eq!(cam.state(), CameraState::Idle);

		assert!(!cam.tick(2000.0));
		assert_eq!(cam.pose(), target());
	}

	#[test]
	fn retarget_starts_from_the_current_pose() {
		let mut cam = controller();
		cam.move_to(target(), 800.0, 0.0);
		cam.tick(400.0);
		let mid = cam.pose();

		let next = CameraPose::new(DVec3::new(0.0, 10.0, 0.0), DVec3::ZERO);
		cam.move_to(next, 800.0, 400.0);
		let job = cam.job().copied().unwrap();
		assert_eq!(job.start_pose, mid);
		assert_eq!(job.target_pose, next);

		cam.tick(400.0);
		assert!(close(cam.pose().position, mid.position));
		cam.tick(1200.0);
		assert_eq!(cam.pose(), next);
	}

	#[test]
	fn zero_duration_snaps() {
		let mut cam = controller();
		cam.move_to(target(), 0.0, 5.0);
		assert_eq!(cam.pose(), target());
		assert_eq!(cam.state(), CameraState::Idle);
	}

	#[test]
	fn focus_direction_points_at_downstream_centroid() {
		let graph = GraphModel::from_json(SEED_GRAPH).unwrap();
		// node1 -> node2, node3, node4: centroid (-1, -2, -1/3)
		let expected = DVec3::new(-1.0, -2.0, -1.0 / 3.0).normalize();
		assert!(close(focus_direction(&graph, "node1"), expected));
		// node6 has no outgoing connections: toward the origin
		assert!(close(focus_direction(&graph, "node6"), -DVec3::new(5.0, 12.0, 5.0).normalize()));
	}

	#[test]
	fn focus_direction_falls_back_to_z() {
		let graph = GraphModel::new(GraphData {
			nodes: vec![
				GraphNode {
					id: "origin".into(),
					name: "Origin".into(),
					position: Some(DVec3::ZERO),
					color: "#fff".into(),
				},
				GraphNode {
					id: "nowhere".into(),
					name: "Nowhere".into(),
					position: None,
					color: "#fff".into(),
				},
			],
			connections: vec![GraphConnection::new("origin", "nowhere", ConnectionKind::Weak)],
		})
		.unwrap();
		assert_eq!(focus_direction(&graph, "origin"), DVec3::Z);
		assert_eq!(focus_direction(&graph, "nowhere"), DVec3::Z);
	}

	#[test]
	fn pose_sits_behind_and_looks_ahead() {
		let settings = CameraSettings::default();
		let pose = pose_for(DVec3::new(10.0, 0.0, 0.0), DVec3::X, &settings);
		assert!(close(pose.position, DVec3::new(2.0, 0.0, 0.0)));
		assert!(close(pose.look_at, DVec3::new(20.0, 0.0, 0.0)));
	}

	#[test]
	fn focusing_an_unplaced_node_is_ignored() {
		let graph = GraphModel::from_json(
			r#"{"nodes":[{"id":"a","name":"A"}],"connections":[]}"#,
		)
		.unwrap();
		let mut cam = CameraController::default();
		assert!(!cam.focus_node(&graph, "a", 0.0));
		assert!(!cam.focus_node(&graph, "missing", 0.0));
		assert_eq!(cam.state(), CameraState::Idle);
		assert_eq!(cam.pose(), CameraSettings::default().home_pose);
	}

	#[test]
	fn focus_node_animates_with_configured_duration() {
		let graph = GraphModel::from_json(SEED_GRAPH).unwrap();
		let mut cam = CameraController::default();
		assert!(cam.focus_node(&graph, "node6", 100.0));
		let job = cam.job().copied().unwrap();
		assert_eq!(job.duration, 800.0);
		assert_eq!(job.start_time, 100.0);
		cam.tick(900.0);
		let dir = focus_direction(&graph, "node6");
		let p = DVec3::new(5.0, 12.0, 5.0);
		assert!(close(cam.pose().position, p - dir * 8.0));
		assert!(close(cam.pose().look_at, p + dir * 10.0));
	}

	#[test]
	fn rest_controls_wait_for_the_animation() {
		let mut cam = CameraController::default();
		let home = cam.pose();
		cam.move_to(target(), 800.0, 0.0);
		cam.orbit(0.5, 0.1);
		cam.dolly(0.5);
		cam.tick(0.0);
		assert_eq!(cam.pose().position, home.position);

		cam.tick(800.0);
		cam.dolly(100.0);
		assert!((cam.pose().distance() - 150.0).abs() < 1e-6);
		cam.dolly(0.0001);
		assert!((cam.pose().distance() - 8.0).abs() < 1e-6);

		let before = cam.pose().distance();
		cam.orbit(0.7, -0.2);
		assert!((cam.pose().distance() - before).abs() < 1e-6);
		assert_eq!(cam.pose().look_at, target().look_at);
	}
}
