//! Reactive handle that issues graph fetches and owns the view state.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info};

use super::fetch::{describe_query, fetch_graph, query_pairs};
use super::state::{GraphViewState, Settlement};
use super::types::FilterCriteria;
use crate::components::notice::{NoticeLevel, Notices, notify};

pub const LOAD_FAILED: &str = "Failed to load dependency graph";

/// Toast to raise for a settled fetch, as (level, title, description).
/// Only a failure of the most recent fetch is reported.
pub fn settlement_notice(settlement: &Settlement) -> Option<(NoticeLevel, &'static str, &'static str)> {
	match settlement {
		Settlement::Failed(_) => Some((NoticeLevel::Error, "Error", LOAD_FAILED)),
		Settlement::Applied | Settlement::Superseded | Settlement::Retired => None,
	}
}

/// Copyable handle shared by the graph page and anything that needs to ask
/// for a refetch (it is also provided as context).
#[derive(Clone, Copy)]
pub struct GraphController {
	state: RwSignal<GraphViewState>,
	notices: RwSignal<Notices>,
	endpoint: StoredValue<String>,
}

impl GraphController {
	/// Create the view state for the current reactive owner. The state is
	/// retired when that owner is cleaned up.
	pub fn new(endpoint: String, notices: RwSignal<Notices>) -> Self {
		let state = RwSignal::new(GraphViewState::new());
		on_cleanup(move || {
			state.try_update(GraphViewState::retire);
		});
		Self {
			state,
			notices,
			endpoint: StoredValue::new(endpoint),
		}
	}

	pub fn state(&self) -> RwSignal<GraphViewState> {
		self.state
	}

	/// Query the service with the active filter. Responses to anything but
	/// the most recent call are dropped when they arrive.
	pub fn refresh(&self) {
		let Some((ticket, criteria)) = self
			.state
			.try_update(|s| (s.begin_fetch(), s.filter().clone()))
		else {
			return;
		};
		let Some(endpoint) = self.endpoint.try_get_value() else {
			return;
		};
		info!(
			"clause-graph: fetch #{} {}",
			ticket.seq(),
			describe_query(&query_pairs(&criteria))
		);

		let (state, notices) = (self.state, self.notices);
		spawn_local(async move {
			let result = fetch_graph(&endpoint, &criteria).await;
			let settlement = match state.try_update(|s| s.settle(ticket, result)) {
				None | Some(Settlement::Retired) => {
					debug!("clause-graph: view gone, ignoring fetch #{}", ticket.seq());
					return;
				}
				Some(settlement) => settlement,
			};
			if let Some((level, title, description)) = settlement_notice(&settlement) {
				notify(notices, level, title, description);
			}
		});
	}

	/// Replace the filter and refetch.
	pub fn set_filter(&self, criteria: FilterCriteria) {
		if self.state.try_update(|s| s.set_filter(criteria)).is_some() {
			self.refresh();
		}
	}

	/// Edit one dimension of the active filter and refetch if it changed.
	pub fn update_filter(&self, edit: impl FnOnce(&mut FilterCriteria)) {
		let Some(mut criteria) = self.state.try_with_untracked(|s| s.filter().clone()) else {
			return;
		};
		let before = criteria.clone();
		edit(&mut criteria);
		if criteria != before {
			self.set_filter(criteria);
		}
	}

	pub fn select(&self, id: String) {
		self.state.update(|s| s.select(id));
	}

	pub fn clear_selection(&self) {
		self.state.update(GraphViewState::clear_selection);
	}
}

/// The controller of the enclosing graph page, if any.
pub fn use_graph_controller() -> Option<GraphController> {
	use_context::<GraphController>()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::clause_graph::fetch::FetchError;
	use crate::components::clause_graph::state::GraphViewState;

	fn raise(notices: &mut Notices, settlement: &Settlement) {
		if let Some((level, title, description)) = settlement_notice(settlement) {
			notices.push(level, title, description);
		}
	}

	#[test]
	fn one_failure_one_notice() {
		let mut state = GraphViewState::new();
		let mut notices = Notices::default();
		let ticket = state.begin_fetch();
		let settlement = state.settle(ticket, Err(FetchError::Transport("connection refused".into())));
		raise(&mut notices, &settlement);

		assert_eq!(notices.items().len(), 1);
		assert_eq!(notices.items()[0].level, NoticeLevel::Error);
		assert_eq!(notices.items()[0].description, LOAD_FAILED);
	}

	#[test]
	fn superseded_and_retired_failures_stay_quiet() {
		let mut state = GraphViewState::new();
		let mut notices = Notices::default();
		let stale = state.begin_fetch();
		let latest = state.begin_fetch();

		let settlement = state.settle(stale, Err(FetchError::Transport("timeout".into())));
		assert!(matches!(settlement, Settlement::Superseded));
		raise(&mut notices, &settlement);
		assert!(notices.items().is_empty());

		state.retire();
		let settlement = state.settle(latest, Err(FetchError::Transport("timeout".into())));
		assert!(matches!(settlement, Settlement::Retired));
		raise(&mut notices, &settlement);
		assert!(notices.items().is_empty());

		raise(&mut notices, &Settlement::Applied);
		assert!(notices.items().is_empty());
	}
}
