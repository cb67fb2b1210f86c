//! Read-only graph snapshot and the neighborhood queries derived from it.

use std::collections::{HashMap, HashSet};

use glam::DVec3;

use super::error::{OrbError, Result};
use super::types::{GraphConnection, GraphData, GraphNode, NodeId};

/// Immutable nodes and connections of one graph load.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	nodes: Vec<GraphNode>,
	connections: Vec<GraphConnection>,
	index: HashMap<NodeId, usize>,
}

impl GraphModel {
	/// Index `data`, rejecting duplicate ids and connections to unknown nodes.
	pub fn new(data: GraphData) -> Result<Self> {
		let GraphData { nodes, connections } = data;
		let mut index = HashMap::with_capacity(nodes.len());

		for (i, node) in nodes.iter().enumerate() {
			if index.insert(node.id.clone(), i).is_some() {
				return Err(OrbError::DuplicateNode(node.id.clone()));
			}
		}

		if let Some(bad) = connections
			.iter()
			.find(|c| !index.contains_key(&c.source) || !index.contains_key(&c.target))
		{
			return Err(OrbError::DanglingConnection {
				from: bad.source.clone(),
				to: bad.target.clone(),
			});
		}

		Ok(Self {
			nodes,
			connections,
			index,
		})
	}

	/// Parse a graph document and index it.
	pub fn from_json(json: &str) -> Result<Self> {
		Self::new(serde_json::from_str(json)?)
	}

	/// Nodes in document order.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// Connections in document order.
	pub fn connections(&self) -> &[GraphConnection] {
		&self.connections
	}

	/// True when no nodes were loaded.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Whether `id` names a loaded node.
	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// Node `id`, or [`OrbError::NotFound`].
	pub fn node(&self, id: &str) -> Result<&GraphNode> {
		self.index
			.get(id)
			.map(|&i| &self.nodes[i])
			.ok_or_else(|| OrbError::NotFound(id.to_owned()))
	}

	/// Position of `id`, `None` when the node is unknown or unplaced.
	pub fn position(&self, id: &str) -> Option<DVec3> {
		self.node(id).ok().and_then(|n| n.position)
	}

	/// Ids adjacent to `id` in either direction.
	pub fn neighbors(&self, id: &str) -> Result<HashSet<NodeId>> {
		self.node(id)?;
		let mut out = HashSet::new();
		for c in &self.connections {
			if c.source == id {
				out.insert(c.target.clone());
			}
			if c.target == id {
				out.insert(c.source.clone());
			}
		}
		Ok(out)
	}

	/// Connections starting at `id`.
	pub fn outgoing(&self, id: &str) -> Result<Vec<&GraphConnection>> {
		self.node(id)?;
		Ok(self.connections.iter().filter(|c| c.source == id).collect())
	}

	/// Connections ending at `id`.
	pub fn incoming(&self, id: &str) -> Result<Vec<&GraphConnection>> {
		self.node(id)?;
		Ok(self.connections.iter().filter(|c| c.target == id).collect())
	}

	/// Whether any connection joins `a` and `b`, in either direction.
	pub fn connected(&self, a: &str, b: &str) -> bool {
		self.connections
			.iter()
			.any(|c| (c.source == a && c.target == b) || (c.source == b && c.target == a))
	}

	/// First node whose name contains `query`, ignoring case.
	pub fn find_by_name(&self, query: &str) -> Option<&GraphNode> {
		let query = query.trim().to_lowercase();
		if query.is_empty() {
			return None;
		}
		self.nodes
			.iter()
			.find(|n| n.name.to_lowercase().contains(&query))
	}
}
