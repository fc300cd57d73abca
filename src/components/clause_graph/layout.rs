//! Column layout: articles on the left, clauses tiled in the middle, actors on
//! the right. Topology-independent and recomputed in full for every dataset.

use super::types::{GraphEdge, GraphNode, NodeKind, Position};

pub const ARTICLE_X: f64 = 50.0;
pub const ACTOR_X: f64 = 1200.0;
/// Nodes of unrecognised kinds get a column of their own past the actors.
pub const OTHER_X: f64 = 1550.0;
pub const CLAUSE_X: f64 = 400.0;
pub const CLAUSE_COLUMN_WIDTH: f64 = 350.0;
pub const CLAUSE_ROW_HEIGHT: f64 = 200.0;
pub const CLAUSE_ROWS: usize = 5;
pub const ROW_HEIGHT: f64 = 150.0;
pub const TOP: f64 = 50.0;

fn stacked(x: f64, index: usize) -> Position {
	Position {
		x,
		y: index as f64 * ROW_HEIGHT + TOP,
	}
}

fn tiled(index: usize) -> Position {
	let (row, column) = (index % CLAUSE_ROWS, index / CLAUSE_ROWS);
	Position {
		x: CLAUSE_X + column as f64 * CLAUSE_COLUMN_WIDTH,
		y: row as f64 * CLAUSE_ROW_HEIGHT + TOP,
	}
}

/// Assign a position to every node in place. Node order is untouched; the
/// index used for each node is its rank among nodes of the same kind.
///
/// Edges are accepted so the signature does not change if the layout ever
/// becomes topology-aware; they are not read.
pub fn apply_layout(nodes: &mut [GraphNode], _edges: &[GraphEdge]) {
	let (mut articles, mut clauses, mut actors, mut others) = (0, 0, 0, 0);
	for node in nodes.iter_mut() {
		node.position = match node.kind {
			NodeKind::Article { .. } => {
				articles += 1;
				stacked(ARTICLE_X, articles - 1)
			}
			NodeKind::Clause(_) => {
				clauses += 1;
				tiled(clauses - 1)
			}
			NodeKind::Actor { .. } => {
				actors += 1;
				stacked(ACTOR_X, actors - 1)
			}
			NodeKind::Other { .. } => {
				others += 1;
				stacked(OTHER_X, others - 1)
			}
		};
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::clause_graph::types::ClauseInfo;

	fn node(id: &str, kind: &str) -> GraphNode {
		let kind = match kind {
			"clause" => NodeKind::Clause(ClauseInfo::default()),
			"actor" => NodeKind::Actor { label: id.into() },
			"article" => NodeKind::Article { label: id.into() },
			tag => NodeKind::Other {
				tag: tag.into(),
				label: None,
			},
		};
		GraphNode {
			id: id.into(),
			kind,
			position: Position::default(),
		}
	}

	fn positions(nodes: &[GraphNode], prefix: &str) -> Vec<(f64, f64)> {
		nodes
			.iter()
			.filter(|n| n.id.starts_with(prefix))
			.map(|n| (n.position.x, n.position.y))
			.collect()
	}

	/// Interleaved input so that per-kind ranks differ from array indices.
	fn mixed() -> Vec<GraphNode> {
		let mut nodes = Vec::new();
		for i in 0..7 {
			nodes.push(node(&format!("clause{i}"), "clause"));
			if i < 3 {
				nodes.push(node(&format!("actor{i}"), "actor"));
			}
			if i < 2 {
				nodes.push(node(&format!("article{i}"), "article"));
			}
		}
		nodes
	}

	#[test]
	fn two_articles_seven_clauses_three_actors() {
		let mut nodes = mixed();
		apply_layout(&mut nodes, &[]);

		assert_eq!(positions(&nodes, "article"), vec![(50.0, 50.0), (50.0, 200.0)]);
		assert_eq!(
			positions(&nodes, "clause"),
			vec![
				(400.0, 50.0),
				(400.0, 250.0),
				(400.0, 450.0),
				(400.0, 650.0),
				(400.0, 850.0),
				(750.0, 50.0),
				(750.0, 250.0),
			]
		);
		assert_eq!(
			positions(&nodes, "actor"),
			vec![(1200.0, 50.0), (1200.0, 200.0), (1200.0, 350.0)]
		);
	}

	#[test]
	fn keeps_input_order_and_is_deterministic() {
		let mut first = mixed();
		let ids: Vec<String> = first.iter().map(|n| n.id.clone()).collect();
		apply_layout(&mut first, &[]);
		assert_eq!(first.iter().map(|n| n.id.clone()).collect::<Vec<_>>(), ids);

		let mut second = first.clone();
		apply_layout(&mut second, &[]);
		assert_eq!(first, second);
	}

	#[test]
	fn clause_columns_are_multiples_of_the_column_width() {
		let mut nodes: Vec<GraphNode> = (0..23).map(|i| node(&format!("c{i}"), "clause")).collect();
		apply_layout(&mut nodes, &[]);
		for (i, n) in nodes.iter().enumerate() {
			let k = ((n.position.x - CLAUSE_X) / CLAUSE_COLUMN_WIDTH).round();
			assert_eq!(n.position.x, CLAUSE_X + k * CLAUSE_COLUMN_WIDTH);
			assert_eq!(k as usize, i / 5);
		}
		assert_eq!(nodes[22].position, Position { x: 1800.0, y: 450.0 });
	}

	#[test]
	fn unknown_kinds_get_their_own_column() {
		let mut nodes = vec![node("a", "footnote"), node("b", "clause"), node("c", "recital")];
		apply_layout(&mut nodes, &[]);
		assert_eq!(nodes[0].position, Position { x: OTHER_X, y: 50.0 });
		assert_eq!(nodes[1].position, Position { x: 400.0, y: 50.0 });
		assert_eq!(nodes[2].position, Position { x: OTHER_X, y: 200.0 });
	}
}
