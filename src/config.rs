//! Where the analysis service lives.

/// Used when `CLAUSE_GRAPH_API_URL` was not set at build time.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
	base_url: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self::new(option_env!("CLAUSE_GRAPH_API_URL").unwrap_or(DEFAULT_API_URL))
	}
}

impl ApiConfig {
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.trim().trim_end_matches('/').to_string(),
		}
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Dependency graph query.
	pub fn graph(&self) -> String {
		format!("{}/api/graph", self.base_url)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoints_ignore_trailing_slash() {
		let config = ApiConfig::new("https://clauses.example.org/ ");
		assert_eq!(config.base_url(), "https://clauses.example.org");
		assert_eq!(config.graph(), "https://clauses.example.org/api/graph");
	}

	#[test]
	fn default_is_usable() {
		assert!(ApiConfig::default().graph().ends_with("/api/graph"));
	}
}
