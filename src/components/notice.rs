//! Toast notifications.

use std::time::Duration;

use leptos::prelude::*;

/// How long a toast stays up unless dismissed.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
	Info,
	Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
	pub id: u64,
	pub level: NoticeLevel,
	pub title: String,
	pub description: String,
}

/// Visible toasts, oldest first.
#[derive(Clone, Debug, Default)]
pub struct Notices {
	items: Vec<Notice>,
	next_id: u64,
}

impl Notices {
	pub fn push(&mut self, level: NoticeLevel, title: &str, description: &str) -> u64 {
		self.next_id += 1;
		self.items.push(Notice {
			id: self.next_id,
			level,
			title: title.into(),
			description: description.into(),
		});
		self.next_id
	}

	pub fn dismiss(&mut self, id: u64) {
		self.items.retain(|n| n.id != id);
	}

	pub fn items(&self) -> &[Notice] {
		&self.items
	}
}

/// Show a toast and take it down again after [`NOTICE_TTL`].
pub fn notify(notices: RwSignal<Notices>, level: NoticeLevel, title: &str, description: &str) {
	let Some(id) = notices.try_update(|n| n.push(level, title, description)) else {
		return;
	};
	set_timeout(
		move || {
			notices.try_update(|n| n.dismiss(id));
		},
		NOTICE_TTL,
	);
}

#[component]
pub fn NoticeStack(notices: RwSignal<Notices>) -> impl IntoView {
	view! {
		<div class="notice-stack">
			{move || {
				notices.with(|n| n.items().to_vec())
					.into_iter()
					.map(|notice| {
						let id = notice.id;
						let class = match notice.level {
							NoticeLevel::Info => "notice",
							NoticeLevel::Error => "notice notice-error",
						};
						view! {
							<div class=class role="alert">
								<div class="notice-body">
									<p class="notice-title">{notice.title}</p>
									<p class="notice-description">{notice.description}</p>
								</div>
								<button
									class="notice-close"
									title="Dismiss"
									on:click=move |_| notices.update(|n| n.dismiss(id))
								>
									"✕"
								</button>
							</div>
						}
					})
					.collect_view()
			}}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn push_and_dismiss() {
		let mut notices = Notices::default();
		let a = notices.push(NoticeLevel::Error, "Error", "first");
		let b = notices.push(NoticeLevel::Info, "Info", "second");
		assert_ne!(a, b);
		assert_eq!(notices.items().len(), 2);

		notices.dismiss(a);
		assert_eq!(notices.items().len(), 1);
		assert_eq!(notices.items()[0].description, "second");

		notices.dismiss(a);
		assert_eq!(notices.items().len(), 1);
	}
}
