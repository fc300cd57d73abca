mod component;
mod controller;
mod fetch;
mod inspect;
mod layout;
mod panel;
mod render;
mod scene;
mod state;
mod types;

pub use component::ClauseGraphCanvas;
pub use controller::{GraphController, LOAD_FAILED, use_graph_controller};
pub use fetch::FetchError;
pub use layout::apply_layout;
pub use panel::NodeInspector;
pub use scene::{ACTOR_COLOR, ARTICLE_COLOR};
pub use state::{GraphViewState, Settlement};
pub use types::{FilterCriteria, GraphEdge, GraphNode, GraphStats, Modality, NodeKind};
