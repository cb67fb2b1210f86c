//! Perspective projection of world points onto the canvas.

use glam::DVec3;

use super::camera::CameraPose;

const NEAR: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
	pub x: f64,
	pub y: f64,
	/// Distance along the view direction; larger is further away.
	pub depth: f64,
	/// Canvas pixels per world unit at this depth.
	pub scale: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct Projector {
	eye: DVec3,
	forward: DVec3,
	right: DVec3,
	up: DVec3,
	focal: f64,
	cx: f64,
	cy: f64,
}

impl Projector {
	pub fn new(pose: CameraPose, width: f64, height: f64, fov_degrees: f64) -> Self {
		let forward = (pose.look_at - pose.position)
			.try_normalize()
			.unwrap_or(DVec3::NEG_Z);
		let right = forward.cross(DVec3::Y).try_normalize().unwrap_or(DVec3::X);
		let up = right.cross(forward);
		let half_fov = (fov_degrees.to_radians() * 0.5).max(f64::EPSILON);
		Self {
			eye: pose.position,
			forward,
			right,
			up,
			focal: height * 0.5 / half_fov.tan(),
			cx: width * 0.5,
			cy: height * 0.5,
		}
	}

	/// Canvas position of `point`, `None` when it is behind the camera.
	pub fn project(&self, point: DVec3) -> Option<ScreenPoint> {
		let rel = point - self.eye;
		let depth = rel.dot(self.forward);
		if depth <= NEAR {
			return None;
		}
		let scale = self.focal / depth;
		Some(ScreenPoint {
			x: self.cx + rel.dot(self.right) * scale,
			y: self.cy - rel.dot(self.up) * scale,
			depth,
			scale,
		})
	}
}
