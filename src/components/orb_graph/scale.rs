//! Node sizing by distance from the centre of the orb.

use glam::DVec3;

const MIN_SCALE: f64 = 0.6;
const FALLOFF: f64 = 0.03;

/// 1.0 at the origin, shrinking with distance down to 0.6.
pub fn node_scale(position: DVec3) -> f64 {
	(1.0 - position.length() * FALLOFF).max(MIN_SCALE)
}
