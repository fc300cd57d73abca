//! Graph query building and the HTTP round trip to the graph service.

use gloo_net::http::Request;
use thiserror::Error;

use super::types::{FilterCriteria, GraphData};

#[derive(Debug, Error)]
pub enum FetchError {
	#[error("graph service unreachable: {0}")]
	Transport(String),
	#[error("graph service answered {status} {status_text}")]
	Status { status: u16, status_text: String },
	#[error("graph response was not understood: {0}")]
	Payload(String),
}

impl From<gloo_net::Error> for FetchError {
	fn from(err: gloo_net::Error) -> Self {
		match err {
			gloo_net::Error::SerdeError(e) => FetchError::Payload(e.to_string()),
			other => FetchError::Transport(other.to_string()),
		}
	}
}

impl From<serde_json::Error> for FetchError {
	fn from(err: serde_json::Error) -> Self {
		FetchError::Payload(err.to_string())
	}
}

/// Query parameters for `criteria`. Unconstrained dimensions are left out
/// entirely rather than sent empty.
pub fn query_pairs(criteria: &FilterCriteria) -> Vec<(&'static str, String)> {
	let mut pairs = Vec::with_capacity(3);
	if let Some(modality) = criteria.modality {
		pairs.push(("modality", modality.as_str().to_string()));
	}
	for (key, value) in [("article", &criteria.article), ("actor", &criteria.actor)] {
		let value = value.trim();
		if !value.is_empty() {
			pairs.push((key, value.to_string()));
		}
	}
	pairs
}

/// Readable form of a query for log lines.
pub fn describe_query(pairs: &[(&'static str, String)]) -> String {
	if pairs.is_empty() {
		return "<unfiltered>".into();
	}
	pairs
		.iter()
		.map(|(k, v)| format!("{k}={v}"))
		.collect::<Vec<_>>()
		.join("&")
}

/// Issue one graph query. Nodes come back without positions.
pub async fn fetch_graph(
	endpoint: &str,
	criteria: &FilterCriteria,
) -> Result<GraphData, FetchError> {
	let pairs = query_pairs(criteria);
	let response = Request::get(endpoint)
		.query(pairs.iter().map(|(k, v)| (*k, v.as_str())))
		.header("Accept", "application/json")
		.send()
		.await?;

	if !response.ok() {
		return Err(FetchError::Status {
			status: response.status(),
			status_text: response.status_text(),
		});
	}

	let body = response.text().await?;
	Ok(GraphData::from_json(&body)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::clause_graph::types::Modality;

	#[test]
	fn empty_criteria_send_no_constraints() {
		assert!(query_pairs(&FilterCriteria::default()).is_empty());

		let blank = FilterCriteria {
			modality: None,
			article: "  ".into(),
			actor: String::new(),
		};
		assert!(query_pairs(&blank).is_empty());
		assert_eq!(describe_query(&query_pairs(&blank)), "<unfiltered>");
	}

	#[test]
	fn present_fields_are_forwarded() {
		let criteria = FilterCriteria {
			modality: Some(Modality::Prohibition),
			article: " 17 ".into(),
			actor: "processor".into(),
		};
		assert_eq!(
			query_pairs(&criteria),
			vec![
				("modality", "PROHIBITION".to_string()),
				("article", "17".to_string()),
				("actor", "processor".to_string()),
			]
		);
		assert_eq!(
			describe_query(&query_pairs(&criteria)),
			"modality=PROHIBITION&article=17&actor=processor"
		);
	}

	#[test]
	fn only_actor() {
		let criteria = FilterCriteria {
			actor: "controller".into(),
			..Default::default()
		};
		assert_eq!(query_pairs(&criteria), vec![("actor", "controller".to_string())]);
	}

	#[test]
	fn error_messages() {
		let err = FetchError::Status {
			status: 503,
			status_text: "Service Unavailable".into(),
		};
		assert_eq!(err.to_string(), "graph service answered 503 Service Unavailable");
		let err: FetchError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
		assert!(matches!(err, FetchError::Payload(_)));
	}
}
