//! Curved connection paths.
//!
//! Connections bend sideways so that opposite edges between the same pair
//! stay distinguishable, and the label sits on the bent path rather than on
//! the straight chord.

use glam::DVec3;

/// Segments used when the renderer samples a connection path.
pub const CURVE_SEGMENTS: usize = 20;

const BEND_PER_UNIT: f64 = 0.15;
const MAX_BEND: f64 = 1.0;
const DEGENERATE_LIFT: f64 = 0.5;

/// Quadratic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadraticBezier {
	/// Point at `t = 0`.
	pub start: DVec3,
	/// Control point pulling the curve sideways.
	pub control: DVec3,
	/// Point at `t = 1`.
	pub end: DVec3,
}

impl QuadraticBezier {
	/// Point at parameter `t` in `[0, 1]`.
	pub fn point_at(&self, t: f64) -> DVec3 {
		let u = 1.0 - t;
		self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
	}

	/// `segments + 1` evenly spaced points from start to end.
	pub fn sample(&self, segments: usize) -> Vec<DVec3> {
		let segments = segments.max(1);
		(0..=segments)
			.map(|i| self.point_at(i as f64 / segments as f64))
			.collect()
	}
}

/// Drawn shape of one connection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectionCurve {
	/// Bent path from source to target.
	pub path: QuadraticBezier,
	/// Point halfway along the curve where the connection label goes.
	pub label_anchor: DVec3,
}

/// Curve from `start` to `end`, bent perpendicular to both the chord and up.
pub fn curve(start: DVec3, end: DVec3) -> ConnectionCurve {
	let d = end - start;
	let mid = (start + end) * 0.5;
	let perp = d.cross(DVec3::Y);
	let perp_len = perp.length();

	let control = if perp_len == 0.0 {
		// parallel to up, or a zero-length edge
		mid + DVec3::Y * DEGENERATE_LIFT
	} else {
		let bend = (d.length() * BEND_PER_UNIT).min(MAX_BEND);
		mid + perp / perp_len * bend
	};

	let path = QuadraticBezier {
		start,
		control,
		end,
	};
	ConnectionCurve {
		path,
		label_anchor: path.point_at(0.5),
	}
}
