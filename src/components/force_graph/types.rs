use force_graph::DefaultNodeIdx;

use crate::document::{LinkStyle, NodeRecord, NodeStyle};

/// Per-node data carried through the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub record: NodeRecord,
	pub style: NodeStyle,
	/// Text drawn next to hub nodes.
	pub label: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Edge {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub style: LinkStyle,
}

/// Hub labels drop everything up to the first `:` ("1965:Help!" -> "Help!").
pub fn hub_label(name: &str) -> String {
	name.split_once(':')
		.map(|(_, rest)| rest)
		.unwrap_or(name)
		.to_owned()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hub_label_strips_prefix() {
		assert_eq!(hub_label("1965:Help!"), "Help!");
		assert_eq!(hub_label("a:b:c"), "b:c");
		assert_eq!(hub_label("Abbey Road"), "Abbey Road");
	}
}
