//! Query-string handling: `?other.json` or `?data=other.json` selects
//! the document to load.

use std::collections::BTreeMap;

/// Data file loaded when the query string names none.
pub const DEFAULT_DATA_FILE: &str = "Beatles.json";

const DATA_FILE_SUFFIX: &str = ".json";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams {
	pub params: BTreeMap<String, String>,
	/// Last key or value that looked like a data file.
	pub data_file: Option<String>,
}

impl QueryParams {
	/// Parse a raw query string. Never fails: anything malformed is
	/// treated as absent.
	pub fn parse(query: &str) -> Self {
		let query = query.strip_prefix('?').unwrap_or(query);
		let mut parsed = Self::default();

		for segment in query.split('&').filter(|s| !s.is_empty()) {
			let mut pieces = segment.split('=');
			let key = decode(pieces.next().unwrap_or_default());
			let value = decode(pieces.next().unwrap_or_default());

			for token in [&key, &value] {
				if token.ends_with(DATA_FILE_SUFFIX) {
					parsed.data_file = Some(token.clone());
				}
			}
			parsed.params.insert(key, value);
		}
		parsed
	}

	pub fn resolve_data_file<'a>(&'a self, default: &'a str) -> &'a str {
		self.data_file.as_deref().unwrap_or(default)
	}
}

fn decode(token: &str) -> String {
	urlencoding::decode(token)
		.map(|s| s.into_owned())
		.unwrap_or_else(|_| token.to_owned())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key_naming_a_json_file_selects_it() {
		let q = QueryParams::parse("?foo=bar&alt.json=1");
		assert_eq!(q.resolve_data_file(DEFAULT_DATA_FILE), "alt.json");
		assert_eq!(q.params["foo"], "bar");
	}

	#[test]
	fn value_naming_a_json_file_selects_it() {
		let q = QueryParams::parse("data=Stones.json");
		assert_eq!(q.resolve_data_file(DEFAULT_DATA_FILE), "Stones.json");
	}

	#[test]
	fn empty_query_keeps_default() {
		let q = QueryParams::parse("");
		assert!(q.params.is_empty());
		assert_eq!(q.resolve_data_file(DEFAULT_DATA_FILE), DEFAULT_DATA_FILE);
	}

	#[test]
	fn plain_params_keep_default() {
		let q = QueryParams::parse("?a=1&b=2");
		let expected: BTreeMap<String, String> =
			[("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())].into();
		assert_eq!(q.params, expected);
		assert_eq!(q.data_file, None);
	}

	#[test]
	fn last_json_token_wins() {
		let q = QueryParams::parse("first.json&x=second.json");
		assert_eq!(q.data_file.as_deref(), Some("second.json"));
	}

	#[test]
	fn tolerates_malformed_segments() {
		let q = QueryParams::parse("?&&flag&=orphan&a=1=2");
		assert_eq!(q.params["flag"], "");
		assert_eq!(q.params[""], "orphan");
		assert_eq!(q.params["a"], "1");
		assert_eq!(q.data_file, None);
	}

	#[test]
	fn percent_encoded_tokens_are_decoded() {
		let q = QueryParams::parse("?file=My%20Band.json");
		assert_eq!(q.data_file.as_deref(), Some("My Band.json"));
	}
}
