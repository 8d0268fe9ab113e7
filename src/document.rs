//! The JSON document a graph session is loaded from.
//!
//! One file carries everything: visual styles per group, the simulation
//! parameters, and the node and link records.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::Value;

/// Key naming a shared node or link style.
pub type StyleGroupKey = String;

/// Top-level document: `styles`, `fdg`, `nodes` and `links`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GraphDocument {
	/// Visual configuration.
	pub styles: StyleConfig,
	/// Force simulation parameters.
	pub fdg: SimulationParams,
	/// Node records, in document order.
	pub nodes: Vec<NodeRecord>,
	/// Link records referring into `nodes`.
	pub links: Vec<LinkRecord>,
}

/// A node is an open set of fields. Entries are kept sorted by field name.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct NodeRecord(BTreeMap<String, Value>);

impl NodeRecord {
	/// Display label, empty when absent.
	pub fn name(&self) -> &str {
		self.0.get("name").and_then(Value::as_str).unwrap_or_default()
	}

	/// Style group key in its string form (`3` and `"3"` are the same group).
	pub fn group(&self) -> Option<StyleGroupKey> {
		self.0.get("group").and_then(group_key)
	}

	/// Optional numeric count.
	pub fn weight(&self) -> Option<f64> {
		self.0.get("weight").and_then(Value::as_f64)
	}

	/// Hubs are aggregate nodes tagged with `_type: "hub"`.
	pub fn is_hub(&self) -> bool {
		self.0.get("_type").and_then(Value::as_str) == Some("hub")
	}

	pub fn get(&self, field: &str) -> Option<&Value> {
		self.0.get(field)
	}

	/// Fields in sorted order.
	pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}
}

/// Reference to a node: an index into `nodes`, or a node's `id`/`name`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
	Index(usize),
	Key(String),
}

/// An undirected link between two nodes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LinkRecord {
	pub source: NodeRef,
	pub target: NodeRef,
	#[serde(default, deserialize_with = "deserialize_group")]
	pub group: Option<StyleGroupKey>,
}

fn group_key(value: &Value) -> Option<StyleGroupKey> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

fn deserialize_group<'de, D>(deserializer: D) -> Result<Option<StyleGroupKey>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;
	Ok(value.as_ref().and_then(group_key))
}

impl GraphDocument {
	/// Resolve a link endpoint to a position in `nodes`.
	///
	/// String references match a node's `id` first, then its `name`.
	pub fn resolve(&self, node: &NodeRef) -> Option<usize> {
		match node {
			NodeRef::Index(i) => (*i < self.nodes.len()).then_some(*i),
			NodeRef::Key(key) => {
				let matches = |field: &str| {
					self.nodes.iter().position(|n| match n.get(field) {
						Some(Value::String(s)) => s == key,
						Some(Value::Number(num)) => num.to_string() == *key,
						_ => false,
					})
				};
				matches("id").or_else(|| matches("name"))
			}
		}
	}
}

/// Visual configuration of the whole session.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
	pub node: GroupStyles<NodeStyle>,
	pub link: GroupStyles<LinkStyle>,
	pub tooltip: TooltipConfig,
}

/// Styles keyed by group.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GroupStyles<S> {
	pub group: HashMap<StyleGroupKey, S>,
}

impl<S> Default for GroupStyles<S> {
	fn default() -> Self {
		Self {
			group: HashMap::new(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
	pub r: f64,
	pub fill: String,
	pub stroke: String,
	#[serde(rename = "stroke-width", alias = "strokeWidth")]
	pub stroke_width: f64,
}

impl Default for NodeStyle {
	fn default() -> Self {
		Self {
			r: 5.0,
			fill: "#7f7f7f".into(),
			stroke: "#ffffff".into(),
			stroke_width: 1.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinkStyle {
	pub stroke: String,
	#[serde(rename = "stroke-width", alias = "strokeWidth")]
	pub stroke_width: f64,
	#[serde(rename = "stroke-opacity", alias = "strokeOpacity")]
	pub stroke_opacity: f64,
	pub fill: String,
}

impl Default for LinkStyle {
	fn default() -> Self {
		Self {
			stroke: "black".into(),
			stroke_width: 1.0,
			stroke_opacity: 1.0,
			fill: "black".into(),
		}
	}
}

/// Tooltip settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
	pub namecolor: String,
	pub blacklist: Blacklist,
	pub unit: WeightUnit,
}

impl Default for TooltipConfig {
	fn default() -> Self {
		Self {
			namecolor: "#ffff00".into(),
			blacklist: Blacklist::default(),
			unit: WeightUnit::default(),
		}
	}
}

/// Fields never shown in a tooltip, and whether falsy values are hidden.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Blacklist {
	pub keys: Vec<String>,
	pub hidenulls: bool,
}

impl Default for Blacklist {
	fn default() -> Self {
		Self {
			keys: Vec::new(),
			hidenulls: true,
		}
	}
}

/// What a node weight counts.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WeightUnit {
	pub singular: String,
	pub plural: String,
}

impl Default for WeightUnit {
	fn default() -> Self {
		Self {
			singular: "song".into(),
			plural: "songs".into(),
		}
	}
}

/// d3 v3 force layout parameters, defaults included.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationParams {
	pub gravity: f64,
	pub charge: f64,
	/// `None` means unbounded.
	pub charge_distance: Option<f64>,
	pub link_distance: f64,
	pub link_strength: f64,
	pub friction: f64,
	pub theta: f64,
}

impl Default for SimulationParams {
	fn default() -> Self {
		Self {
			gravity: 0.1,
			charge: -30.0,
			charge_distance: None,
			link_distance: 20.0,
			link_strength: 1.0,
			friction: 0.9,
			theta: 0.8,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn sample() -> GraphDocument {
		serde_json::from_value(json!({
			"styles": {
				"node": { "group": { "1": { "r": 8, "fill": "red", "stroke": "white", "stroke-width": 2 } } },
				"link": { "group": { "2": { "stroke": "#ccc", "strokeWidth": 0.5, "stroke-opacity": 0.4, "fill": "none" } } },
				"tooltip": { "namecolor": "#0ff", "blacklist": { "keys": ["id"], "hidenulls": false } }
			},
			"fdg": { "gravity": 0.05, "charge": -120, "linkStrength": 0.1 },
			"nodes": [
				{ "name": "1965:Help!", "group": 1, "_type": "hub", "weight": 14 },
				{ "name": "Yesterday", "id": "s1", "group": "2" }
			],
			"links": [
				{ "source": 1, "target": 0, "group": 2 },
				{ "source": "s1", "target": "1965:Help!" }
			]
		}))
		.unwrap()
	}

	#[test]
	fn parses_full_document() {
		let doc = sample();
		assert_eq!(doc.nodes.len(), 2);
		assert_eq!(doc.styles.node.group["1"].stroke_width, 2.0);
		assert_eq!(doc.styles.link.group["2"].stroke_width, 0.5);
		assert_eq!(doc.styles.tooltip.namecolor, "#0ff");
		assert!(!doc.styles.tooltip.blacklist.hidenulls);
		assert_eq!(doc.fdg.charge, -120.0);
		assert_eq!(doc.fdg.friction, 0.9);
		assert_eq!(doc.links[0].group.as_deref(), Some("2"));
		assert_eq!(doc.links[1].group, None);
	}

	#[test]
	fn node_accessors() {
		let doc = sample();
		let hub = &doc.nodes[0];
		assert!(hub.is_hub());
		assert_eq!(hub.group().as_deref(), Some("1"));
		assert_eq!(hub.weight(), Some(14.0));
		assert!(!doc.nodes[1].is_hub());
		assert_eq!(doc.nodes[1].group().as_deref(), Some("2"));
	}

	#[test]
	fn resolves_links_by_index_id_and_name() {
		let doc = sample();
		assert_eq!(doc.resolve(&doc.links[0].source), Some(1));
		assert_eq!(doc.resolve(&doc.links[1].source), Some(1));
		assert_eq!(doc.resolve(&doc.links[1].target), Some(0));
		assert_eq!(doc.resolve(&NodeRef::Index(9)), None);
		assert_eq!(doc.resolve(&NodeRef::Key("nope".into())), None);
	}

	#[test]
	fn empty_document_uses_defaults() {
		let doc: GraphDocument = serde_json::from_str("{}").unwrap();
		assert!(doc.nodes.is_empty());
		assert!(doc.styles.tooltip.blacklist.hidenulls);
		assert_eq!(doc.styles.tooltip.namecolor, "#ffff00");
		assert_eq!(doc.fdg, SimulationParams::default());
	}
}
