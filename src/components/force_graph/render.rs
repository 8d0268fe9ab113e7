use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, LABEL_DX, LABEL_DY_EM, LABEL_FONT_SIZE};

const BACKGROUND: &str = "#1a1a2e";
/// Opacity of everything outside the hovered neighborhood.
const DIMMED: f64 = 0.3;

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	draw_labels(state, ctx);
	ctx.restore();
	draw_dataset_name(state, ctx);
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let positions = state.positions();
	let hovering = state.hover.node.is_some();

	for edge in &state.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let touches_hover =
			state.hover.node == Some(edge.source) || state.hover.node == Some(edge.target);
		let dim = if hovering && !touches_hover { DIMMED } else { 1.0 };

		ctx.set_global_alpha(edge.style.stroke_opacity * dim);
		ctx.set_stroke_style_str(&edge.style.stroke);
		ctx.set_line_width(edge.style.stroke_width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let hovering = state.hover.node.is_some();
	let k = state.transform.k;

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let style = &node.data.user_data.style;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let highlighted = state.is_highlighted(idx);

		ctx.set_global_alpha(if hovering && !highlighted { DIMMED } else { 1.0 });
		ctx.begin_path();
		let _ = ctx.arc(x, y, style.r, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&style.fill);
		ctx.fill();
		if style.stroke_width > 0.0 {
			ctx.set_stroke_style_str(&style.stroke);
			ctx.set_line_width(style.stroke_width);
			ctx.stroke();
		}

		if state.hover.node == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, style.r + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}
	});
	ctx.set_global_alpha(1.0);
}

fn draw_labels(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let opacity = state.labels.opacity();
	if opacity == 0.0 {
		return;
	}
	ctx.set_global_alpha(opacity);
	ctx.set_fill_style_str("white");
	ctx.set_font(&format!("{LABEL_FONT_SIZE}px sans-serif"));
	state.graph.visit_nodes(|node| {
		if let Some(label) = &node.data.user_data.label {
			let (x, y) = (node.x() as f64, node.y() as f64);
			let _ = ctx.fill_text(label, x + LABEL_DX, y + LABEL_DY_EM * LABEL_FONT_SIZE);
		}
	});
	ctx.set_global_alpha(1.0);
}

/// The data file name, in screen space at the top left.
fn draw_dataset_name(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
	ctx.set_font("14px sans-serif");
	let _ = ctx.fill_text(&state.dataset, 4.0, 20.0);
}
