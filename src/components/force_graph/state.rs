use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, warn};

use super::types::{Edge, NodeInfo, hub_label};
use crate::document::{GraphDocument, LinkStyle, NodeRecord, NodeStyle, SimulationParams, StyleConfig};
use crate::labels::LabelVisibility;
use crate::tooltip::{Tooltip, TooltipFormatter};

pub const MIN_HIT_RADIUS: f64 = 6.0;
pub const LABEL_FONT_SIZE: f64 = 12.0;
/// Hub labels sit left of the node and slightly below its center.
pub const LABEL_DX: f64 = -16.0;
pub const LABEL_DY_EM: f64 = 0.34;

// force_graph works in different units than d3's layout
const CHARGE_SCALE: f64 = 5.0;
const SPRING_SCALE: f64 = 0.05;
const DEFAULT_FORCE_MAX: f32 = 100.0;
const NODE_SPEED: f32 = 3000.0;
const GRAVITY_SCALE: f64 = 10.0;
const INITIAL_SPREAD: f64 = 100.0;

/// Translate the document's layout parameters into the simulator's.
pub fn simulation_parameters(fdg: &SimulationParams) -> SimulationParameters {
	SimulationParameters {
		force_charge: (-fdg.charge * CHARGE_SCALE) as f32,
		force_spring: (fdg.link_strength * SPRING_SCALE) as f32,
		force_max: fdg
			.charge_distance
			.filter(|d| d.is_finite())
			.map(|d| d as f32)
			.unwrap_or(DEFAULT_FORCE_MAX),
		node_speed: NODE_SPEED,
		damping_factor: fdg.friction as f32,
	}
}

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl ViewTransform {
	/// Zoom by one wheel notch, keeping the point under the cursor fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let k = (self.k * factor).clamp(0.1, 10.0);
		let ratio = k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = k;
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<DefaultNodeIdx>,
	/// Cursor offset from the node center, in graph space.
	pub offset: (f64, f64),
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start: (f64, f64),
	pub transform_start: (f64, f64),
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<Edge>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub labels: LabelVisibility,
	pub dataset: String,
	pub width: f64,
	pub height: f64,
	formatter: TooltipFormatter,
	gravity: f64,
}

/// Looks up group styles, falling back to defaults and warning once per key.
#[derive(Default)]
struct StyleLookup {
	warned: HashSet<String>,
}

impl StyleLookup {
	fn node(&mut self, styles: &StyleConfig, record: &NodeRecord) -> NodeStyle {
		let Some(group) = record.group() else {
			self.warn_once("node", "<none>");
			return NodeStyle::default();
		};
		match styles.node.group.get(&group) {
			Some(style) => style.clone(),
			None => {
				self.warn_once("node", &group);
				NodeStyle::default()
			}
		}
	}

	fn link(&mut self, styles: &StyleConfig, group: Option<&String>) -> LinkStyle {
		let Some(group) = group else {
			return LinkStyle::default();
		};
		match styles.link.group.get(group) {
			Some(style) => style.clone(),
			None => {
				self.warn_once("link", group);
				LinkStyle::default()
			}
		}
	}

	fn warn_once(&mut self, kind: &str, group: &str) {
		if self.warned.insert(format!("{kind}/{group}")) {
			warn!("no {kind} style for group {group:?}, using default");
		}
	}
}

impl ForceGraphState {
	pub fn new(doc: &GraphDocument, dataset: &str, width: f64, height: f64) -> Self {
		debug!(
			"linkDistance={} theta={} have no simulator counterpart",
			doc.fdg.link_distance, doc.fdg.theta
		);
		let mut graph = ForceGraph::new(simulation_parameters(&doc.fdg));
		let mut lookup = StyleLookup::default();
		let mut indices = Vec::with_capacity(doc.nodes.len());

		for (i, record) in doc.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / doc.nodes.len() as f64;
			let style = lookup.node(&doc.styles, record);
			let label = record.is_hub().then(|| hub_label(record.name()));
			let idx = graph.add_node(NodeData {
				x: (INITIAL_SPREAD * angle.cos()) as f32,
				y: (INITIAL_SPREAD * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					record: record.clone(),
					style,
					label,
				},
			});
			indices.push(idx);
		}

		let mut edges = Vec::new();
		for link in &doc.links {
			let (Some(src), Some(tgt)) = (doc.resolve(&link.source), doc.resolve(&link.target))
			else {
				warn!("skipping link {:?} -> {:?}: unknown node", link.source, link.target);
				continue;
			};
			let (source, target) = (indices[src], indices[tgt]);
			graph.add_edge(source, target, EdgeData::default());
			edges.push(Edge {
				source,
				target,
				style: lookup.link(&doc.styles, link.group.as_ref()),
			});
		}

		Self {
			graph,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			labels: LabelVisibility::default(),
			dataset: dataset.to_owned(),
			width,
			height,
			formatter: TooltipFormatter::new(doc.styles.tooltip.clone()),
			gravity: doc.fdg.gravity,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// The node under a screen point, either its circle or its visible label.
	/// Labels are drawn on top, so they win.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let (mut on_circle, mut on_label) = (None, None);
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			let info = &node.data.user_data;
			let (dx, dy) = (x - gx, y - gy);
			if (dx * dx + dy * dy).sqrt() < info.style.r.max(MIN_HIT_RADIUS) {
				on_circle = Some(node.index());
			}
			if let Some(label) = &info.label {
				if self.labels.is_visible() && label_contains(label, x, y, gx, gy) {
					on_label = Some(node.index());
				}
			}
		});
		on_label.or(on_circle)
	}

	pub fn record(&self, idx: DefaultNodeIdx) -> Option<NodeRecord> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.record.clone());
			}
		});
		found
	}

	pub fn hover_tooltip(&self) -> Option<Tooltip> {
		let record = self.record(self.hover.node?)?;
		Some(self.formatter.format(&record))
	}

	/// Returns true when the hovered node changed.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) -> bool {
		if self.hover.node == node {
			return false;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();
		if let Some(idx) = node {
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
		true
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx)
	}

	/// Grab the node under the cursor; otherwise start panning.
	pub fn press(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.node_at_position(sx, sy) {
			let (gx, gy) = self.screen_to_graph(sx, sy);
			let mut offset = (0.0, 0.0);
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					offset = (gx - node.x() as f64, gy - node.y() as f64);
				}
			});
			self.drag = DragState {
				node: Some(idx),
				offset,
			};
		} else {
			self.pan = PanState {
				active: true,
				start: (sx, sy),
				transform_start: (self.transform.x, self.transform.y),
			};
		}
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.drag.node {
			let (gx, gy) = self.screen_to_graph(sx, sy);
			let (nx, ny) = ((gx - self.drag.offset.0) as f32, (gy - self.drag.offset.1) as f32);
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = nx;
					node.data.y = ny;
					node.data.is_anchor = true;
				}
			});
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start.0 + (sx - self.pan.start.0);
			self.transform.y = self.pan.transform_start.1 + (sy - self.pan.start.1);
		}
	}

	pub fn is_dragging(&self) -> bool {
		self.drag.node.is_some()
	}

	/// Stop dragging or panning. Dragged nodes stay pinned where dropped.
	pub fn release(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.apply_gravity(dt as f64);
	}

	/// Pull free nodes towards the center of the layout.
	fn apply_gravity(&mut self, dt: f64) {
		let pull = (self.gravity * dt * GRAVITY_SCALE).clamp(0.0, 1.0) as f32;
		if pull == 0.0 {
			return;
		}
		self.graph.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				node.data.x -= node.data.x * pull;
				node.data.y -= node.data.y * pull;
			}
		});
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}
}

/// Approximate box of a label drawn for a node at (`x`, `y`).
fn label_contains(label: &str, x: f64, y: f64, gx: f64, gy: f64) -> bool {
	let left = x + LABEL_DX;
	let right = left + label.chars().count() as f64 * LABEL_FONT_SIZE * 0.6;
	let baseline = y + LABEL_DY_EM * LABEL_FONT_SIZE;
	(left..=right).contains(&gx) && (baseline - LABEL_FONT_SIZE..=baseline).contains(&gy)
}
