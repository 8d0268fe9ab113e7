//! Hover text for graph nodes.

use std::fmt;

use serde_json::Value;

use crate::document::{NodeRecord, TooltipConfig};

/// Longest field value shown before the middle is elided.
pub const MAX_VALUE_LEN: usize = 80;

const GLUE: &str = " ... ";

/// Shorten `s` to fit `maxlen` by cutting out its middle.
pub fn trim_long_str(s: &str, maxlen: usize) -> String {
	let len = s.chars().count();
	if len <= maxlen {
		return s.to_owned();
	}
	let sublen = (maxlen / 2).saturating_sub(GLUE.len()).max(1);
	let head: String = s.chars().take(sublen).collect();
	let tail: String = s.chars().skip(len - sublen).collect();
	format!("{head}{GLUE}{tail}")
}

/// One line of a tooltip.
#[derive(Clone, Debug, PartialEq)]
pub enum TooltipLine {
	/// Hub title, `:` separated parts spaced out.
	Title(String),
	/// `(n unit)` count.
	Count { value: String, unit: String },
	/// Node name, shown in the configured color.
	Name { text: String, color: String },
	Field { label: String, value: String },
}

/// Formatted tooltip for one node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
	pub lines: Vec<TooltipLine>,
}

impl Tooltip {
	/// Markup for the tooltip element. Record text is escaped.
	pub fn to_html(&self) -> String {
		let mut out = String::new();
		for line in &self.lines {
			match line {
				TooltipLine::Title(text) => {
					out.push_str(&format!("<b>{}</b><br/>", escape(text)));
				}
				TooltipLine::Count { value, unit } => {
					out.push_str(&format!("({} {})<br/>", escape(value), escape(unit)));
				}
				TooltipLine::Name { text, color } => {
					out.push_str(&format!(
						"<div style=\"color:{}\"><b>{}</b></div>",
						escape(color),
						escape(text)
					));
				}
				TooltipLine::Field { label, value } => {
					out.push_str(&format!("<b>{}:</b> {}<br/>", escape(label), escape(value)));
				}
			}
		}
		out
	}
}

impl fmt::Display for Tooltip {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for line in &self.lines {
			match line {
				TooltipLine::Title(text) => writeln!(f, "{text}")?,
				TooltipLine::Count { value, unit } => writeln!(f, "({value} {unit})")?,
				TooltipLine::Name { text, .. } => writeln!(f, "{text}")?,
				TooltipLine::Field { label, value } => writeln!(f, "{label}: {value}")?,
			}
		}
		Ok(())
	}
}

/// Builds tooltips from node records using a fixed [`TooltipConfig`].
#[derive(Clone, Debug, Default)]
pub struct TooltipFormatter {
	config: TooltipConfig,
}

impl TooltipFormatter {
	pub fn new(config: TooltipConfig) -> Self {
		Self { config }
	}

	pub fn format(&self, node: &NodeRecord) -> Tooltip {
		if node.is_hub() {
			return self.format_hub(node);
		}

		let blacklist = &self.config.blacklist;
		let lines = node
			.fields()
			.filter(|(field, _)| !blacklist.keys.iter().any(|k| k == field))
			.filter(|(_, value)| !(blacklist.hidenulls && is_falsy(value)))
			.map(|(field, value)| match field {
				"name" => TooltipLine::Name {
					text: display_value(value),
					color: self.config.namecolor.clone(),
				},
				"weight" => TooltipLine::Count {
					value: display_value(value),
					unit: self.config.unit.plural.clone(),
				},
				_ => {
					let value = match value {
						Value::String(s) => trim_long_str(s, MAX_VALUE_LEN),
						other => display_value(other),
					};
					// multi-word field names use dots in place of spaces
					TooltipLine::Field {
						label: field.replace('.', " "),
						value,
					}
				}
			})
			.collect();
		Tooltip { lines }
	}

	fn format_hub(&self, node: &NodeRecord) -> Tooltip {
		let weight = node.weight().unwrap_or(0.0);
		let unit = if weight == 1.0 {
			&self.config.unit.singular
		} else {
			&self.config.unit.plural
		};
		let value = node
			.get("weight")
			.map(display_value)
			.unwrap_or_else(|| "0".into());
		Tooltip {
			lines: vec![
				TooltipLine::Title(node.name().replacen(':', ": ", 1)),
				TooltipLine::Count {
					value,
					unit: unit.clone(),
				},
			],
		}
	}
}

fn is_falsy(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(b) => !b,
		Value::Number(n) => n.as_f64() == Some(0.0),
		Value::String(s) => s.is_empty(),
		Value::Array(_) | Value::Object(_) => false,
	}
}

fn display_value(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

fn escape(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			c => out.push(c),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::document::Blacklist;
	use serde_json::json;

	fn node(value: Value) -> NodeRecord {
		serde_json::from_value(value).unwrap()
	}

	fn formatter(keys: &[&str], hidenulls: bool) -> TooltipFormatter {
		TooltipFormatter::new(TooltipConfig {
			blacklist: Blacklist {
				keys: keys.iter().map(|k| k.to_string()).collect(),
				hidenulls,
			},
			..TooltipConfig::default()
		})
	}

	#[test]
	fn short_strings_are_untouched() {
		let s = "x".repeat(MAX_VALUE_LEN);
		assert_eq!(trim_long_str(&s, MAX_VALUE_LEN), s);
		assert_eq!(trim_long_str("", MAX_VALUE_LEN), "");
	}

	#[test]
	fn long_strings_keep_head_and_tail() {
		let s: String = (0..200).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
		let trimmed = trim_long_str(&s, MAX_VALUE_LEN);
		assert_eq!(trimmed.chars().count(), 2 * 35 + 5);
		assert!(trimmed.starts_with(&s[..35]));
		assert!(trimmed.ends_with(&s[165..]));
		assert_eq!(&trimmed[35..40], " ... ");
	}

	#[test]
	fn tiny_limits_keep_one_char_each_side() {
		assert_eq!(trim_long_str("abcdefgh", 4), "a ... h");
	}

	#[test]
	fn trimming_counts_chars_not_bytes() {
		let s = "é".repeat(81);
		let trimmed = trim_long_str(&s, MAX_VALUE_LEN);
		assert_eq!(trimmed.chars().count(), 75);
	}

	#[test]
	fn hub_weight_picks_unit() {
		let f = TooltipFormatter::default();
		let one = f.format(&node(json!({"_type": "hub", "name": "1963:Please", "weight": 1})));
		assert_eq!(one.to_string(), "1963: Please\n(1 song)\n");
		let two = f.format(&node(json!({"_type": "hub", "name": "1963:Please", "weight": 2})));
		assert_eq!(two.to_string(), "1963: Please\n(2 songs)\n");
		assert_eq!(two.to_html(), "<b>1963: Please</b><br/>(2 songs)<br/>");
	}

	#[test]
	fn hub_title_only_spaces_first_colon() {
		let t = TooltipFormatter::default().format(&node(json!({"_type": "hub", "name": "a:b:c"})));
		assert_eq!(t.lines[0], TooltipLine::Title("a: b:c".into()));
		assert_eq!(
			t.lines[1],
			TooltipLine::Count {
				value: "0".into(),
				unit: "songs".into()
			}
		);
	}

	#[test]
	fn blacklisted_fields_are_omitted() {
		let t = formatter(&["id", "group"], true).format(&node(json!({"id": 3, "group": 1, "album": "Help!"})));
		assert_eq!(t.to_string(), "album: Help!\n");
	}

	#[test]
	fn falsy_values_follow_hidenulls() {
		let record = node(json!({"name": "X", "note": null, "count": 0, "flag": false, "empty": ""}));
		assert_eq!(formatter(&[], true).format(&record).to_string(), "X\n");

		let shown = formatter(&[], false).format(&record).to_string();
		assert!(shown.contains("note: null\n"));
		assert!(shown.contains("count: 0\n"));
		assert!(shown.contains("flag: false\n"));
		assert!(shown.contains("empty: \n"));
	}

	#[test]
	fn regular_node_end_to_end() {
		let t = formatter(&["id"], true).format(&node(json!({
			"name": "X", "id": 7, "note": null, "multi.word": "ok"
		})));
		let text = t.to_string();
		assert!(text.lines().any(|l| l == "X"));
		assert!(text.lines().any(|l| l == "multi word: ok"));
		assert!(!text.contains("id"));
		assert!(!text.contains("note"));
		assert_eq!(
			t.to_html(),
			"<b>multi word:</b> ok<br/><div style=\"color:#ffff00\"><b>X</b></div>"
		);
	}

	#[test]
	fn weight_line_uses_plural_unit() {
		let t = TooltipFormatter::default().format(&node(json!({"weight": 1})));
		assert_eq!(t.to_html(), "(1 songs)<br/>");
	}

	#[test]
	fn long_field_values_are_trimmed() {
		let long = "z".repeat(120);
		let t = TooltipFormatter::default().format(&node(json!({ "lyrics": long })));
		match &t.lines[0] {
			TooltipLine::Field { value, .. } => assert_eq!(value.chars().count(), 75),
			other => panic!("unexpected line {other:?}"),
		}
	}

	#[test]
	fn markup_is_escaped() {
		let t = TooltipFormatter::default().format(&node(json!({"name": "<i>Rock & Roll</i>"})));
		assert_eq!(
			t.to_html(),
			"<div style=\"color:#ffff00\"><b>&lt;i&gt;Rock &amp; Roll&lt;/i&gt;</b></div>"
		);
	}
}
