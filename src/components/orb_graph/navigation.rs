//! Turns clicks into selection changes.

use super::selection::{NavDirection, SelectionState};
use super::types::NodeId;

/// What the user clicked on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Click<'a> {
	/// A node sphere.
	Node(&'a str),
	/// A connection label.
	Connection {
		/// Source id of the connection.
		source: &'a str,
		/// Target id of the connection.
		target: &'a str,
	},
	/// Empty canvas.
	Background,
}

/// Outcome of a click once the current selection is taken into account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
	/// Select this node and focus the camera on it.
	Select(NodeId),
	/// The connection does not touch the selection; its label is only informative.
	Inspect,
	/// Drop the selection.
	Clear,
	/// Nothing to do.
	Ignore,
}

/// Decide what a click does given the current selection.
pub fn resolve(selection: &SelectionState, click: Click<'_>) -> Navigation {
	match click {
		Click::Node(id) => Navigation::Select(id.to_owned()),
		Click::Connection { source, target } => {
			match selection.navigable_direction(source, target) {
				NavDirection::Upstream => Navigation::Select(source.to_owned()),
				NavDirection::Downstream => Navigation::Select(target.to_owned()),
				NavDirection::None => Navigation::Inspect,
			}
		}
		Click::Background if selection.selected().is_some() => Navigation::Clear,
		Click::Background => Navigation::Ignore,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::orb_graph::graph::GraphModel;
	use crate::components::orb_graph::selection::SelectionStore;
	use crate::components::orb_graph::types::SEED_GRAPH;

	fn store_with(selected: Option<&str>) -> (GraphModel, SelectionStore) {
		let graph = GraphModel::from_json(SEED_GRAPH).unwrap();
		let mut store = SelectionStore::new();
		if let Some(id) = selected {
			store.select(&graph, id).unwrap();
		}
		(graph, store)
	}

	#[test]
	fn node_clicks_always_select() {
		let (_, store) = store_with(Some("node1"));
		let nav = resolve(store.state(), Click::Node("node6"));
		assert_eq!(nav, Navigation::Select("node6".into()));
		let (_, empty) = store_with(None);
		let nav = resolve(empty.state(), Click::Node("node1"));
		assert_eq!(nav, Navigation::Select("node1".into()));
	}

	#[test]
	fn connection_clicks_follow_the_direction() {
		let (_, store) = store_with(Some("node3"));
		let upstream = Click::Connection { source: "node1", target: "node3" };
		let downstream = Click::Connection { source: "node3", target: "node5" };
		let elsewhere = Click::Connection { source: "node2", target: "node6" };

		assert_eq!(resolve(store.state(), upstream), Navigation::Select("node1".into()));
		assert_eq!(resolve(store.state(), downstream), Navigation::Select("node5".into()));
		assert_eq!(resolve(store.state(), elsewhere), Navigation::Inspect);
	}

	#[test]
	fn connection_clicks_without_selection_only_inspect() {
		let (graph, store) = store_with(None);
		for c in graph.connections() {
			let click = Click::Connection { source: &c.source, target: &c.target };
			assert_eq!(resolve(store.state(), click), Navigation::Inspect);
		}
	}

	#[test]
	fn background_clears_only_a_selection() {
		let (_, store) = store_with(Some("node2"));
		assert_eq!(resolve(store.state(), Click::Background), Navigation::Clear);
		let (_, empty) = store_with(None);
		assert_eq!(resolve(empty.state(), Click::Background), Navigation::Ignore);
	}
}
