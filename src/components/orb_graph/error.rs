//! Error type shared by the graph, selection and loading code.

use thiserror::Error;

use super::types::NodeId;

/// Errors raised by graph queries, selection and graph loading.
#[derive(Error, Debug)]
pub enum OrbError {
	/// A referenced node id is not part of the loaded graph.
	#[error("node not found: {0}")]
	NotFound(NodeId),

	/// Two nodes in the loaded data share an id.
	#[error("duplicate node id: {0}")]
	DuplicateNode(NodeId),

	/// A connection references a node id that was never loaded.
	#[error("connection {from} -> {to} references an unknown node")]
	DanglingConnection {
		/// Source id of the offending connection.
		from: NodeId,
		/// Target id of the offending connection.
		to: NodeId,
	},

	/// The graph document could not be parsed.
	#[error("invalid graph document: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Result alias used across the orb graph modules.
pub type Result<T> = std::result::Result<T, OrbError>;
