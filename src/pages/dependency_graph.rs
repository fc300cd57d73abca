use leptos::prelude::*;
use web_sys::Event;

use crate::components::clause_graph::{
	ACTOR_COLOR, ARTICLE_COLOR, ClauseGraphCanvas, GraphController, GraphStats, Modality,
	NodeInspector,
};
use crate::components::notice::{NoticeStack, Notices};
use crate::config::ApiConfig;

const ALL_MODALITIES: &str = "all";

#[component]
fn StatsBadges(stats: GraphStats) -> impl IntoView {
	view! {
		<div class="stats">
			<span class="badge">{format!("{} clauses", stats.total_clauses)}</span>
			<span class="badge">{format!("{} actors", stats.total_actors)}</span>
			<span class="badge">{format!("{} articles", stats.total_articles)}</span>
			<span class="badge">{format!("{} edges", stats.total_edges)}</span>
		</div>
	}
}

#[component]
fn FilterBar(controller: GraphController) -> impl IntoView {
	let view_state = controller.state();
	let loading = Memo::new(move |_| view_state.with(|s| s.is_loading()));
	let filter = move || view_state.with(|s| s.filter().clone());

	let on_modality = move |ev: Event| {
		let value = event_target_value(&ev);
		let modality = if value == ALL_MODALITIES {
			None
		} else {
			value.parse::<Modality>().ok()
		};
		controller.update_filter(|f| f.modality = modality);
	};
	let on_article = move |ev: Event| {
		let value = event_target_value(&ev);
		controller.update_filter(|f| f.article = value);
	};
	let on_actor = move |ev: Event| {
		let value = event_target_value(&ev);
		controller.update_filter(|f| f.actor = value);
	};

	view! {
		<div class="filter-bar">
			<span class="filter-icon" aria-hidden="true">"⏷"</span>
			<select
				class="filter-select"
				on:change=on_modality
				prop:value=move || {
					filter().modality.map(|m| m.as_str()).unwrap_or(ALL_MODALITIES)
				}
			>
				<option value=ALL_MODALITIES>"All Modalities"</option>
				{Modality::FILTERABLE
					.into_iter()
					.map(|m| view! { <option value=m.as_str()>{m.title()}</option> })
					.collect_view()}
			</select>
			<input
				class="filter-input"
				type="text"
				placeholder="Article"
				prop:value=move || filter().article
				on:change=on_article
			/>
			<input
				class="filter-input"
				type="text"
				placeholder="Actor"
				prop:value=move || filter().actor
				on:change=on_actor
			/>
			<button
				class="button"
				disabled=move || loading.get()
				on:click=move |_| controller.refresh()
			>
				<Show when=move || loading.get()>
					<span class="spinner" aria-hidden="true"></span>
				</Show>
				"Refresh"
			</button>
		</div>
	}
}

#[component]
fn Legend() -> impl IntoView {
	let entries = [
		(Modality::Obligation.title(), Modality::Obligation.color()),
		(Modality::Prohibition.title(), Modality::Prohibition.color()),
		(Modality::Permission.title(), Modality::Permission.color()),
		(Modality::Exemption.title(), Modality::Exemption.color()),
		(Modality::Recommendation.title(), Modality::Recommendation.color()),
		("Actor", ACTOR_COLOR),
		("Article", ARTICLE_COLOR),
	];
	view! {
		<div class="graph-legend">
			<p class="legend-title">"Legend"</p>
			{entries
				.into_iter()
				.map(|(name, color)| {
					view! {
						<div class="legend-item">
							<span class="legend-swatch" style=format!("background-color: {color}")></span>
							<span>{name}</span>
						</div>
					}
				})
				.collect_view()}
		</div>
	}
}

/// Dependency graph page: filters, canvas, legend and the detail panel.
#[component]
pub fn DependencyGraph(
	/// Overrides the graph endpoint derived from [`ApiConfig`].
	#[prop(optional, into)]
	endpoint: Option<String>,
) -> impl IntoView {
	let notices = RwSignal::new(Notices::default());
	let controller = GraphController::new(
		endpoint.unwrap_or_else(|| ApiConfig::default().graph()),
		notices,
	);
	provide_context(controller);

	// initial load
	Effect::new(move |_| controller.refresh());

	let view_state = controller.state();
	let stats = Memo::new(move |_| view_state.with(|s| s.stats()));
	let loading = Memo::new(move |_| view_state.with(|s| s.is_loading()));
	let blank = Memo::new(move |_| view_state.with(|s| s.is_empty()));

	view! {
		<div class="graph-page">
			<header class="graph-header">
				<h1>"Dependency Graph"</h1>
				{move || stats.get().map(|stats| view! { <StatsBadges stats=stats /> })}
			</header>

			<FilterBar controller=controller />

			<main class="graph-main">
				<Show
					when=move || !(loading.get() && blank.get())
					fallback=|| {
						view! {
							<div class="graph-loading">
								<span class="spinner spinner-large" aria-hidden="true"></span>
								<p>"Loading graph..."</p>
							</div>
						}
					}
				>
					<ClauseGraphCanvas controller=controller />
					<Legend />
					<Show when=move || loading.get()>
						<div class="graph-refreshing">
							<span class="spinner" aria-hidden="true"></span>
						</div>
					</Show>
				</Show>
				<NodeInspector controller=controller />
			</main>

			<NoticeStack notices=notices />
		</div>
	}
}
