//! Fetches the graph document over HTTP.

use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::document::GraphDocument;

/// Anything that keeps a document from loading. All of them are fatal.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LoadError {
	#[error("no browser window available")]
	NoWindow,
	#[error("failed to fetch {file}: {reason}")]
	Fetch { file: String, reason: String },
	#[error("failed to fetch {file}: HTTP {status}")]
	Status { file: String, status: u16 },
	#[error("failed to parse {file}: {reason}")]
	Parse { file: String, reason: String },
}

/// Fetch and parse `file`, relative to the current page.
pub async fn fetch_document(file: String) -> Result<GraphDocument, LoadError> {
	let window = web_sys::window().ok_or(LoadError::NoWindow)?;
	let fetch_failed = |err: JsValue| LoadError::Fetch {
		file: file.clone(),
		reason: js_reason(&err),
	};

	let promise: js_sys::Promise = window.fetch_with_str(&file);
	let response: Response = JsFuture::from(promise)
		.await
		.and_then(|value| value.dyn_into())
		.map_err(fetch_failed)?;

	if !response.ok() {
		return Err(LoadError::Status {
			file: file.clone(),
			status: response.status(),
		});
	}

	let text = JsFuture::from(response.text().map_err(fetch_failed)?)
		.await
		.map_err(fetch_failed)?
		.as_string()
		.unwrap_or_default();

	parse_document(&file, &text)
}

/// Parse the body of `file`.
pub fn parse_document(file: &str, text: &str) -> Result<GraphDocument, LoadError> {
	serde_json::from_str(text).map_err(|err| LoadError::Parse {
		file: file.to_owned(),
		reason: err.to_string(),
	})
}

fn js_reason(err: &JsValue) -> String {
	err.as_string()
		.or_else(|| {
			err.dyn_ref::<js_sys::Error>()
				.map(|e| String::from(e.message()))
		})
		.unwrap_or_else(|| format!("{err:?}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_valid_body() {
		let doc = parse_document("x.json", r#"{"nodes": [{"name": "a"}], "links": []}"#).unwrap();
		assert_eq!(doc.nodes[0].name(), "a");
	}

	#[test]
	fn reports_parse_errors_with_file_name() {
		let err = parse_document("broken.json", "{ nodes: ").unwrap_err();
		assert!(matches!(err, LoadError::Parse { ref file, .. } if file == "broken.json"));
		assert!(err.to_string().starts_with("failed to parse broken.json"));
	}

	#[test]
	fn status_error_message() {
		let err = LoadError::Status {
			file: "gone.json".into(),
			status: 404,
		};
		assert_eq!(err.to_string(), "failed to fetch gone.json: HTTP 404");
	}
}
