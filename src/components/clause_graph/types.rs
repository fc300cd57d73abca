//! Node/edge model for the clause dependency graph.
//!
//! The graph service is trusted for shape but not for completeness: every
//! record is decoded leniently and anything that cannot be placed on the
//! canvas is dropped instead of failing the whole response.

use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::Deserialize;

/// Deontic category of a clause.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Modality {
	Obligation,
	Prohibition,
	Permission,
	Exemption,
	Recommendation,
	#[default]
	Unknown,
}

impl Modality {
	/// Modalities a user can filter on, in menu order.
	pub const FILTERABLE: [Modality; 5] = [
		Modality::Obligation,
		Modality::Prohibition,
		Modality::Permission,
		Modality::Exemption,
		Modality::Recommendation,
	];

	/// Wire name, as sent to and received from the graph service.
	pub fn as_str(self) -> &'static str {
		match self {
			Modality::Obligation => "OBLIGATION",
			Modality::Prohibition => "PROHIBITION",
			Modality::Permission => "PERMISSION",
			Modality::Exemption => "EXEMPTION",
			Modality::Recommendation => "RECOMMENDATION",
			Modality::Unknown => "UNKNOWN",
		}
	}

	/// Human readable name for menus and legends.
	pub fn title(self) -> &'static str {
		match self {
			Modality::Obligation => "Obligation",
			Modality::Prohibition => "Prohibition",
			Modality::Permission => "Permission",
			Modality::Exemption => "Exemption",
			Modality::Recommendation => "Recommendation",
			Modality::Unknown => "Unknown",
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			Modality::Obligation => "#3b82f6",
			Modality::Prohibition => "#ef4444",
			Modality::Permission => "#10b981",
			Modality::Exemption => "#f59e0b",
			Modality::Recommendation => "#6366f1",
			Modality::Unknown => "#6b7280",
		}
	}
}

impl fmt::Display for Modality {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Modality {
	type Err = ();

	/// Case-insensitive; anything unrecognised is an error so callers can
	/// decide between `Unknown` and "no constraint".
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_uppercase().as_str() {
			"OBLIGATION" => Ok(Modality::Obligation),
			"PROHIBITION" => Ok(Modality::Prohibition),
			"PERMISSION" => Ok(Modality::Permission),
			"EXEMPTION" => Ok(Modality::Exemption),
			"RECOMMENDATION" => Ok(Modality::Recommendation),
			"UNKNOWN" => Ok(Modality::Unknown),
			_ => Err(()),
		}
	}
}

/// Attributes carried by a clause node. Every field except the modality and
/// label may be absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClauseInfo {
	pub modality: Modality,
	pub label: String,
	pub actor: Option<String>,
	pub object: Option<String>,
	pub condition: Option<String>,
	pub formula: Option<String>,
	pub article_id: Option<String>,
	pub text: Option<String>,
}

/// Kind-specific payload of a node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
	Clause(ClauseInfo),
	Actor { label: String },
	Article { label: String },
	/// A kind tag this client does not know. Still laid out and drawn as a
	/// plain box so one odd record does not hide the rest of the graph.
	Other { tag: String, label: Option<String> },
}

impl NodeKind {
	/// Lower-case kind tag, as used on the wire.
	pub fn tag(&self) -> &str {
		match self {
			NodeKind::Clause(_) => "clause",
			NodeKind::Actor { .. } => "actor",
			NodeKind::Article { .. } => "article",
			NodeKind::Other { tag, .. } => tag,
		}
	}

	pub fn label(&self) -> Option<&str> {
		match self {
			NodeKind::Clause(info) => Some(&info.label),
			NodeKind::Actor { label } | NodeKind::Article { label } => Some(label),
			NodeKind::Other { label, .. } => label.as_deref(),
		}
	}
}

/// Canvas position in graph space. Presentation only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub kind: NodeKind,
	pub position: Position,
}

/// A directed edge. Duplicates are kept as received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
}

/// Counters reported by the service alongside a graph. Advisory only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
	pub total_clauses: u64,
	pub total_actors: u64,
	pub total_articles: u64,
	pub total_edges: u64,
}

/// One decoded graph response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	pub stats: GraphStats,
}

/// Constraints forwarded to the graph service. `None` or an empty string
/// means "no constraint on this dimension"; the service ANDs the rest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
	pub modality: Option<Modality>,
	pub article: String,
	pub actor: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNodeData {
	label: Option<serde_json::Value>,
	modality: Option<serde_json::Value>,
	actor: Option<serde_json::Value>,
	object: Option<serde_json::Value>,
	condition: Option<serde_json::Value>,
	formula: Option<serde_json::Value>,
	article_id: Option<serde_json::Value>,
	text: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNode {
	id: Option<serde_json::Value>,
	#[serde(rename = "type")]
	kind: Option<serde_json::Value>,
	data: Option<RawNodeData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEdge {
	source: Option<serde_json::Value>,
	target: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStats {
	total_clauses: Option<u64>,
	total_actors: Option<u64>,
	total_articles: Option<u64>,
	total_edges: Option<u64>,
}

/// Top level of a response. Records stay untyped here so each one can be
/// decoded, and rejected, on its own.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGraph {
	nodes: Option<Vec<serde_json::Value>>,
	edges: Option<Vec<serde_json::Value>>,
	stats: Option<serde_json::Value>,
}

/// Empty and whitespace-only strings count as absent.
fn present(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.trim().is_empty())
}

/// Identifiers and labels may arrive as strings or numbers.
fn scalar_text(value: serde_json::Value) -> Option<String> {
	match value {
		serde_json::Value::String(s) => present(Some(s)),
		serde_json::Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

/// Decode one record, logging and dropping it if it has the wrong shape.
fn record<T: serde::de::DeserializeOwned>(what: &str, value: serde_json::Value) -> Option<T> {
	serde_json::from_value(value)
		.map_err(|err| warn!("clause-graph: skipping malformed {}: {}", what, err))
		.ok()
}

impl From<RawStats> for GraphStats {
	fn from(raw: RawStats) -> Self {
		Self {
			total_clauses: raw.total_clauses.unwrap_or_default(),
			total_actors: raw.total_actors.unwrap_or_default(),
			total_articles: raw.total_articles.unwrap_or_default(),
			total_edges: raw.total_edges.unwrap_or_default(),
		}
	}
}

impl RawNode {
	fn into_node(self) -> Option<GraphNode> {
		let Some(id) = self.id.and_then(scalar_text) else {
			warn!("clause-graph: skipping node without an id");
			return None;
		};
		let data = self.data.unwrap_or_default();
		let label = data.label.and_then(scalar_text);
		let kind_tag = self.kind.and_then(scalar_text);
		let kind = match kind_tag.as_deref().map(str::trim) {
			Some("clause") => NodeKind::Clause(ClauseInfo {
				modality: data
					.modality
					.and_then(scalar_text)
					.and_then(|m| m.parse().ok())
					.unwrap_or_default(),
				label: label.unwrap_or_else(|| id.clone()),
				actor: data.actor.and_then(scalar_text),
				object: data.object.and_then(scalar_text),
				condition: data.condition.and_then(scalar_text),
				formula: data.formula.and_then(scalar_text),
				article_id: data.article_id.and_then(scalar_text),
				text: data.text.and_then(scalar_text),
			}),
			Some("actor") => NodeKind::Actor {
				label: label.unwrap_or_else(|| id.clone()),
			},
			Some("article") => NodeKind::Article {
				label: label.unwrap_or_else(|| id.clone()),
			},
			other => {
				let tag = other.unwrap_or_default().to_string();
				warn!("clause-graph: node {} has unknown kind {:?}", id, tag);
				NodeKind::Other { tag, label }
			}
		};
		Some(GraphNode {
			id,
			kind,
			position: Position::default(),
		})
	}
}

impl GraphData {
	/// Decode a graph response body, skipping records that cannot be shown.
	pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
		let raw: RawGraph = serde_json::from_str(body)?;
		let nodes = raw
			.nodes
			.unwrap_or_default()
			.into_iter()
			.filter_map(|value| record::<RawNode>("node", value))
			.filter_map(RawNode::into_node)
			.collect();
		let edges = raw
			.edges
			.unwrap_or_default()
			.into_iter()
			.filter_map(|value| record::<RawEdge>("edge", value))
			.filter_map(|edge| {
				match (
					edge.source.and_then(scalar_text),
					edge.target.and_then(scalar_text),
				) {
					(Some(source), Some(target)) => Some(GraphEdge { source, target }),
					_ => {
						warn!("clause-graph: skipping edge with a missing endpoint");
						None
					}
				}
			})
			.collect();
		let stats = raw
			.stats
			.and_then(|value| record::<RawStats>("stats", value))
			.map(GraphStats::from)
			.unwrap_or_default();
		Ok(Self {
			nodes,
			edges,
			stats,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_service_payload() {
		let body = r#"{
			"nodes": [
				{"id": "c1", "type": "clause", "data": {
					"label": "4: controller", "modality": "OBLIGATION",
					"actor": "controller", "object": "", "article_id": "4",
					"condition": null, "formula": "O(notify)", "text": ""
				}, "position": {"x": 0, "y": 0}},
				{"id": "actor_0", "type": "actor", "data": {"label": "controller", "type": "actor"}},
				{"id": "article_4", "type": "article", "data": {"label": "Article 4", "article_id": 4}}
			],
			"edges": [
				{"id": "e1", "source": "c1", "target": "actor_0", "type": "actor_edge", "label": "binds"}
			],
			"stats": {"total_clauses": 1, "total_actors": 1, "total_articles": 1, "total_edges": 1}
		}"#;

		let data = GraphData::from_json(body).unwrap();
		assert_eq!(data.nodes.len(), 3);
		assert_eq!(data.edges.len(), 1);
		assert_eq!(data.stats.total_edges, 1);

		let NodeKind::Clause(info) = &data.nodes[0].kind else {
			panic!("expected a clause node");
		};
		assert_eq!(info.modality, Modality::Obligation);
		assert_eq!(info.actor.as_deref(), Some("controller"));
		assert_eq!(info.object, None);
		assert_eq!(info.condition, None);
		assert_eq!(info.formula.as_deref(), Some("O(notify)"));
		assert_eq!(info.article_id.as_deref(), Some("4"));
		assert_eq!(info.text, None);
		assert_eq!(data.nodes[1].kind.label(), Some("controller"));
	}

	#[test]
	fn tolerates_malformed_records() {
		let body = r#"{
			"nodes": [
				{"type": "clause", "data": {"label": "no id"}},
				{"id": "x", "type": "footnote", "data": {"label": "odd"}},
				{"id": "c", "type": "clause", "data": {"modality": "MAYBE"}}
			],
			"edges": [{"source": "x"}, {"source": "x", "target": "c"}, {"source": "x", "target": "c"}]
		}"#;

		let data = GraphData::from_json(body).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(
			data.nodes[0].kind,
			NodeKind::Other {
				tag: "footnote".into(),
				label: Some("odd".into())
			}
		);
		let NodeKind::Clause(info) = &data.nodes[1].kind else {
			panic!("expected a clause node");
		};
		assert_eq!(info.modality, Modality::Unknown);
		assert_eq!(info.label, "c");
		// duplicates are kept
		assert_eq!(data.edges.len(), 2);
		assert_eq!(data.stats, GraphStats::default());
	}

	#[test]
	fn null_node_data_keeps_the_rest() {
		let body = r#"{
			"nodes": [
				{"id": "actor_0", "type": "actor", "data": {"label": "controller"}},
				{"id": "actor_1", "type": "actor", "data": null},
				"not a node",
				{"id": 7, "type": "article", "data": {"label": 7}}
			]
		}"#;

		let data = GraphData::from_json(body).unwrap();
		assert_eq!(data.nodes.len(), 3);
		assert_eq!(data.nodes[0].kind.label(), Some("controller"));
		assert_eq!(data.nodes[1].id, "actor_1");
		assert_eq!(data.nodes[1].kind.label(), Some("actor_1"));
		assert_eq!(data.nodes[2].id, "7");
		assert_eq!(data.nodes[2].kind.label(), Some("7"));
	}

	#[test]
	fn numeric_edge_endpoints() {
		let body = r#"{
			"nodes": [
				{"id": 1, "type": "article", "data": {"label": "Article 1"}},
				{"id": "c1", "type": "clause", "data": {"label": "1: controller"}}
			],
			"edges": [
				{"source": 1, "target": "c1"},
				{"source": null, "target": "c1"},
				{"source": {"id": 1}, "target": "c1"},
				42
			]
		}"#;

		let data = GraphData::from_json(body).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(
			data.edges,
			vec![GraphEdge {
				source: "1".into(),
				target: "c1".into()
			}]
		);
	}

	#[test]
	fn null_stats_counters_read_as_zero() {
		let body = r#"{
			"nodes": [{"id": "c1", "type": "clause", "data": {"label": "x"}}],
			"stats": {"total_clauses": null, "total_actors": 2, "total_edges": null}
		}"#;
		let data = GraphData::from_json(body).unwrap();
		assert_eq!(data.nodes.len(), 1);
		assert_eq!(
			data.stats,
			GraphStats {
				total_clauses: 0,
				total_actors: 2,
				total_articles: 0,
				total_edges: 0,
			}
		);

		let body = r#"{"nodes": [{"id": "c1", "type": "clause"}], "edges": null, "stats": "n/a"}"#;
		let data = GraphData::from_json(body).unwrap();
		assert_eq!(data.nodes.len(), 1);
		assert!(data.edges.is_empty());
		assert_eq!(data.stats, GraphStats::default());
	}

	#[test]
	fn rejects_non_graph_body() {
		assert!(GraphData::from_json("<html>502</html>").is_err());
	}

	#[test]
	fn modality_parsing() {
		assert_eq!("permission".parse::<Modality>(), Ok(Modality::Permission));
		assert_eq!(" EXEMPTION ".parse::<Modality>(), Ok(Modality::Exemption));
		assert!("all".parse::<Modality>().is_err());
		assert_eq!(Modality::Recommendation.to_string(), "RECOMMENDATION");
	}
}
