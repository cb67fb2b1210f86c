//! Navigable 3D node orb: the graph snapshot, selection and history, camera
//! transitions, and the canvas component that draws them.

mod camera;
mod component;
mod error;
mod geometry;
mod graph;
mod navigation;
mod projection;
mod render;
pub mod scale;
mod selection;
mod state;
mod types;

pub use camera::{
	AnimationJob, CameraController, CameraPose, CameraSettings, CameraState, ease_out_quad,
	focus_direction, pose_for,
};
pub use component::OrbGraphCanvas;
pub use error::{OrbError, Result};
pub use geometry::{CURVE_SEGMENTS, ConnectionCurve, QuadraticBezier, curve};
pub use graph::GraphModel;
pub use navigation::{Click, Navigation, resolve};
pub use selection::{
	HISTORY_LIMIT, NavDirection, SelectionEvent, SelectionState, SelectionStore, SubscriptionId,
};
pub use types::{ConnectionKind, GraphConnection, GraphData, GraphNode, Millis, NodeId, SEED_GRAPH};
