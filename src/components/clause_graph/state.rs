use log::{debug, info, warn};

use super::fetch::FetchError;
use super::layout::apply_layout;
use super::types::{FilterCriteria, GraphData, GraphEdge, GraphNode, GraphStats};

/// Identifies one issued graph fetch. Later fetches carry larger numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
	pub fn seq(self) -> u64 {
		self.0
	}
}

/// What happened when a fetch settled against the view.
#[derive(Debug)]
pub enum Settlement {
	/// The response became the displayed graph.
	Applied,
	/// The fetch failed; the previous graph is still displayed.
	Failed(FetchError),
	/// A newer fetch was issued meanwhile; the response was dropped.
	Superseded,
	/// The view has been torn down.
	Retired,
}

/// Everything the dependency graph view displays.
///
/// Nodes, edges and stats are only ever replaced together so a render can
/// never pair one response's nodes with another's stats.
#[derive(Clone, Debug, Default)]
pub struct GraphViewState {
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
	/// `None` until the first response has been applied.
	stats: Option<GraphStats>,
	filter: FilterCriteria,
	loading: bool,
	selected: Option<String>,
	issued: u64,
	/// Bumped on every swap so the canvas knows to rebuild its scene.
	revision: u64,
	retired: bool,
}

impl GraphViewState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	pub fn stats(&self) -> Option<GraphStats> {
		self.stats
	}

	pub fn filter(&self) -> &FilterCriteria {
		&self.filter
	}

	pub fn is_loading(&self) -> bool {
		self.loading
	}

	pub fn revision(&self) -> u64 {
		self.revision
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Replace the active filter. The displayed graph is left alone until
	/// the refetch this calls for settles.
	pub fn set_filter(&mut self, criteria: FilterCriteria) {
		self.filter = criteria;
	}

	/// Record a new fetch as the latest one and raise the loading flag.
	pub fn begin_fetch(&mut self) -> FetchTicket {
		self.issued += 1;
		self.loading = true;
		FetchTicket(self.issued)
	}

	/// Settle a fetch. Only the most recently issued fetch may touch the
	/// displayed graph or the loading flag.
	pub fn settle(&mut self, ticket: FetchTicket, result: Result<GraphData, FetchError>) -> Settlement {
		if self.retired {
			return Settlement::Retired;
		}
		if ticket.0 < self.issued {
			debug!(
				"clause-graph: dropping response #{} (latest is #{})",
				ticket.0, self.issued
			);
			return Settlement::Superseded;
		}
		self.loading = false;
		match result {
			Ok(mut data) => {
				apply_layout(&mut data.nodes, &data.edges);
				info!(
					"clause-graph: response #{} has {} nodes, {} edges",
					ticket.0,
					data.nodes.len(),
					data.edges.len()
				);
				self.replace_data(data.nodes, data.edges, data.stats);
				Settlement::Applied
			}
			Err(err) => {
				warn!("clause-graph: fetch #{} failed: {}", ticket.0, err);
				Settlement::Failed(err)
			}
		}
	}

	/// Swap in a new graph in one step.
	///
	/// A selection whose node is still present keeps pointing at it (and so
	/// shows the new attributes); one whose node vanished is cleared.
	pub fn replace_data(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>, stats: GraphStats) {
		self.nodes = nodes;
		self.edges = edges;
		self.stats = Some(stats);
		self.revision += 1;
		if let Some(id) = &self.selected {
			if self.node(id).is_none() {
				debug!("clause-graph: selected node {} is gone, clearing", id);
				self.selected = None;
			}
		}
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Select a node by id, replacing any previous selection.
	pub fn select(&mut self, id: impl Into<String>) {
		self.selected = Some(id.into());
	}

	pub fn clear_selection(&mut self) {
		self.selected = None;
	}

	pub fn selected_id(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// The selected node, resolved against the live node set.
	pub fn selected_node(&self) -> Option<&GraphNode> {
		self.selected.as_deref().and_then(|id| self.node(id))
	}

	/// Stop accepting responses. Called when the view unmounts.
	pub fn retire(&mut self) {
		self.retired = true;
		self.loading = false;
	}
}
