//! Projection of a selected node onto the rows of the detail panel.

use super::types::{GraphNode, Modality, NodeKind};

/// Which attribute a detail row shows. Also decides how the row is styled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailField {
	Label,
	Modality,
	Actor,
	Object,
	Article,
	Condition,
	Formula,
	Text,
}

impl DetailField {
	pub fn title(self) -> &'static str {
		match self {
			DetailField::Label => "Label",
			DetailField::Modality => "Modality",
			DetailField::Actor => "Actor",
			DetailField::Object => "Object",
			DetailField::Article => "Article",
			DetailField::Condition => "Condition",
			DetailField::Formula => "Formula",
			DetailField::Text => "Text",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct DetailRow {
	pub field: DetailField,
	pub value: String,
}

/// Detail block for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDetail {
	pub id: String,
	/// Kind tag shown as the panel's badge.
	pub kind: String,
	/// Set for clauses so the modality badge can be coloured.
	pub modality: Option<Modality>,
	pub rows: Vec<DetailRow>,
}

impl NodeDetail {
	pub fn has(&self, field: DetailField) -> bool {
		self.rows.iter().any(|r| r.field == field)
	}
}

fn row(rows: &mut Vec<DetailRow>, field: DetailField, value: Option<&str>) {
	if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
		rows.push(DetailRow {
			field,
			value: value.to_string(),
		});
	}
}

/// Rows for `node`, omitting every attribute it does not carry.
pub fn node_detail(node: &GraphNode) -> NodeDetail {
	let mut rows = Vec::new();
	let modality = match &node.kind {
		NodeKind::Clause(info) => {
			row(&mut rows, DetailField::Label, Some(&info.label));
			row(&mut rows, DetailField::Modality, Some(info.modality.as_str()));
			row(&mut rows, DetailField::Actor, info.actor.as_deref());
			row(&mut rows, DetailField::Object, info.object.as_deref());
			row(&mut rows, DetailField::Article, info.article_id.as_deref());
			row(&mut rows, DetailField::Condition, info.condition.as_deref());
			row(&mut rows, DetailField::Formula, info.formula.as_deref());
			row(&mut rows, DetailField::Text, info.text.as_deref());
			Some(info.modality)
		}
		kind => {
			row(&mut rows, DetailField::Label, kind.label());
			None
		}
	};
	NodeDetail {
		id: node.id.clone(),
		kind: node.kind.tag().to_string(),
		modality,
		rows,
	}
}
