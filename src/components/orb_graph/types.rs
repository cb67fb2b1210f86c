use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Node identifier as it appears in the graph document.
pub type NodeId = String;

/// Monotonic timestamp in milliseconds.
pub type Millis = f64;

/// Seed graph shipped with the app.
pub const SEED_GRAPH: &str = include_str!("../../../assets/seed_graph.json");

fn default_color() -> String {
	"#ffffff".into()
}

/// One node of the orb.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	/// Unique id, referenced by connections.
	pub id: NodeId,
	/// Display name, also matched by search.
	pub name: String,
	/// World position. Unplaced nodes are neither drawn nor focused.
	#[serde(default)]
	pub position: Option<DVec3>,
	/// CSS color of the sphere.
	#[serde(default = "default_color")]
	pub color: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Strength of a connection, drawn solid or dashed.
pub enum ConnectionKind {
	/// Solid, thicker line.
	#[default]
	Strong,
	/// Dashed, thinner line.
	Weak,
}

/// Directed connection from `source` to `target`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphConnection {
	/// Id of the node the connection starts at.
	pub source: NodeId,
	/// Id of the node the connection ends at.
	pub target: NodeId,
	/// Stored as `type` in the document.
	#[serde(rename = "type", default)]
	pub kind: ConnectionKind,
}

impl GraphConnection {
	/// Connection of `kind` from `source` to `target`.
	pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, kind: ConnectionKind) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			kind,
		}
	}

	/// Whether either end is `id`.
	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}
}

/// Graph document as loaded from JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// All nodes, ids unique.
	pub nodes: Vec<GraphNode>,
	/// Connections between loaded nodes.
	#[serde(default)]
	pub connections: Vec<GraphConnection>,
}
