use leptos::prelude::*;

use super::controller::GraphController;
use super::inspect::{DetailField, DetailRow, NodeDetail, node_detail};

fn detail_row(row: DetailRow, detail: &NodeDetail) -> AnyView {
	let title = row.field.title();
	match row.field {
		DetailField::Modality => {
			let color = detail.modality.map(|m| m.color()).unwrap_or("#6b7280");
			view! {
				<div class="detail-row">
					<p class="detail-title">{title}</p>
					<span
						class="badge"
						style=format!("color: {color}; border-color: {color};")
					>
						{row.value}
					</span>
				</div>
			}
			.into_any()
		}
		DetailField::Formula => view! {
			<div class="detail-row">
				<p class="detail-title">{title}</p>
				<code class="detail-formula">{row.value}</code>
			</div>
		}
		.into_any(),
		DetailField::Condition => view! {
			<div class="detail-row">
				<p class="detail-title">{title}</p>
				<p class="detail-condition">{row.value}</p>
			</div>
		}
		.into_any(),
		DetailField::Label => view! {
			<div class="detail-row">
				<p class="detail-title">{title}</p>
				<p class="detail-label">{row.value}</p>
			</div>
		}
		.into_any(),
		DetailField::Actor | DetailField::Object | DetailField::Article | DetailField::Text => view! {
			<div class="detail-row">
				<p class="detail-title">{title}</p>
				<p>{row.value}</p>
			</div>
		}
		.into_any(),
	}
}

/// Side card describing the selected node. Renders nothing when the
/// selection does not resolve against the displayed graph.
#[component]
pub fn NodeInspector(controller: GraphController) -> impl IntoView {
	let view_state = controller.state();
	let detail = Memo::new(move |_| view_state.with(|s| s.selected_node().map(node_detail)));

	move || {
		detail.get().map(|detail| {
			let kind = detail.kind.clone();
			let rows = detail.rows.clone();
			view! {
				<aside class="node-inspector">
					<div class="inspector-header">
						<span class="badge badge-kind">{kind}</span>
						<button
							class="inspector-close"
							title="Close"
							on:click=move |_| controller.clear_selection()
						>
							"✕"
						</button>
					</div>
					<div class="inspector-rows">
						{rows.into_iter().map(|row| detail_row(row, &detail)).collect_view()}
					</div>
				</aside>
			}
		})
	}
}
