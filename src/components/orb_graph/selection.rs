//! Selection state, bounded navigation history and the highlight predicates the
//! renderer styles nodes and connections with.
//!
//! The predicates are plain functions of a [`SelectionState`] (plus the
//! [`GraphModel`] where adjacency matters). [`SelectionStore`] is the single
//! writer of that state and tells subscribers about every change.

use std::collections::VecDeque;

use log::debug;

use super::error::Result;
use super::graph::GraphModel;
use super::types::NodeId;

/// Most recent selections kept for back navigation.
pub const HISTORY_LIMIT: usize = 10;

/// Where clicking a connection would take the user from the current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavDirection {
	/// The connection ends at the selection; clicking goes back to its source.
	Upstream,
	/// The connection starts at the selection; clicking goes on to its target.
	Downstream,
	/// The connection does not touch the selection.
	None,
}

/// Current selection and the visited ids, read by the highlight predicates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
	selected: Option<NodeId>,
	history: VecDeque<NodeId>,
}

impl SelectionState {
	/// Selected node id, if any.
	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Visited ids, oldest first.
	pub fn history(&self) -> impl ExactSizeIterator<Item = &str> {
		self.history.iter().map(String::as_str)
	}

	/// The entry visited before the latest one.
	pub fn previous(&self) -> Option<&str> {
		let len = self.history.len();
		(len > 1).then(|| self.history[len - 2].as_str())
	}

	fn is_selected(&self, id: &str) -> bool {
		self.selected.as_deref() == Some(id)
	}

	/// The selection itself or any node connected to it.
	pub fn is_highlighted(&self, graph: &GraphModel, id: &str) -> bool {
		match self.selected.as_deref() {
			Some(sel) => sel == id || graph.connected(sel, id),
			None => false,
		}
	}

	/// Whether either end of the connection is selected.
	pub fn is_connection_highlighted(&self, source: &str, target: &str) -> bool {
		self.is_selected(source) || self.is_selected(target)
	}

	/// True when the connection points away from the selection.
	pub fn is_downstream(&self, source: &str, _target: &str) -> bool {
		self.is_selected(source)
	}

	/// Which way a click on the connection would move the selection.
	pub fn navigable_direction(&self, source: &str, target: &str) -> NavDirection {
		match (self.is_selected(source), self.is_selected(target)) {
			(false, true) => NavDirection::Upstream,
			(true, false) => NavDirection::Downstream,
			// a self-loop on the selection leads nowhere new
			_ => NavDirection::None,
		}
	}

	fn push_history(&mut self, id: &str) {
		if self.history.back().map(String::as_str) != Some(id) {
			self.history.push_back(id.to_owned());
		}
		while self.history.len() > HISTORY_LIMIT {
			self.history.pop_front();
		}
	}
}

/// Change notifications delivered to [`SelectionStore`] subscribers.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionEvent {
	/// A node became the selection.
	Selected {
		/// The selected node.
		id: NodeId,
		/// History length after the selection was recorded.
		history_len: usize,
	},
	/// The selection was dropped, history kept.
	Cleared,
	/// Selection and history were both forgotten.
	Reset,
}

/// Handle returned by [`SelectionStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&SelectionEvent)>;

/// Owns the [`SelectionState`] and notifies observers after each write.
#[derive(Default)]
pub struct SelectionStore {
	state: SelectionState,
	observers: Vec<(SubscriptionId, Observer)>,
	next_id: u64,
}

impl SelectionStore {
	/// Empty store without observers.
	pub fn new() -> Self {
		Self::default()
	}

	/// Read-only view for the predicates.
	pub fn state(&self) -> &SelectionState {
		&self.state
	}

	/// Selected node id, if any.
	pub fn selected(&self) -> Option<&str> {
		self.state.selected()
	}

	/// Select `id`, recording it in the history unless it is already the latest entry.
	pub fn select(&mut self, graph: &GraphModel, id: &str) -> Result<()> {
		graph.node(id)?;
		self.state.selected = Some(id.to_owned());
		self.state.push_history(id);
		debug!("selected {id} (history {})", self.state.history.len());
		self.emit(SelectionEvent::Selected {
			id: id.to_owned(),
			history_len: self.state.history.len(),
		});
		Ok(())
	}

	/// Drop the selection but keep the history for back navigation.
	pub fn clear(&mut self) {
		self.state.selected = None;
		self.emit(SelectionEvent::Cleared);
	}

	/// Forget both the selection and the history.
	pub fn reset(&mut self) {
		self.state = SelectionState::default();
		self.emit(SelectionEvent::Reset);
	}

	/// Re-select the previously visited node, if any.
	pub fn back(&mut self, graph: &GraphModel) -> Result<Option<NodeId>> {
		let Some(prev) = self.state.previous().map(str::to_owned) else {
			return Ok(None);
		};
		self.select(graph, &prev)?;
		Ok(Some(prev))
	}

	/// See [`SelectionState::is_highlighted`].
	pub fn is_highlighted(&self, graph: &GraphModel, id: &str) -> bool {
		self.state.is_highlighted(graph, id)
	}

	/// See [`SelectionState::is_connection_highlighted`].
	pub fn is_connection_highlighted(&self, source: &str, target: &str) -> bool {
		self.state.is_connection_highlighted(source, target)
	}

	/// See [`SelectionState::is_downstream`].
	pub fn is_downstream(&self, source: &str, target: &str) -> bool {
		self.state.is_downstream(source, target)
	}

	/// See [`SelectionState::navigable_direction`].
	pub fn navigable_direction(&self, source: &str, target: &str) -> NavDirection {
		self.state.navigable_direction(source, target)
	}

	/// Call `observer` after every change until unsubscribed.
	pub fn subscribe(&mut self, observer: impl FnMut(&SelectionEvent) + 'static) -> SubscriptionId {
		let id = SubscriptionId(self.next_id);
		self.next_id += 1;
		self.observers.push((id, Box::new(observer)));
		id
	}

	/// Stop notifying `id`. Returns false if it was not subscribed.
	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		let before = self.observers.len();
		self.observers.retain(|(sid, _)| *sid != id);
		self.observers.len() != before
	}

	fn emit(&mut self, event: SelectionEvent) {
		for (_, observer) in &mut self.observers {
			observer(&event);
		}
	}
}
