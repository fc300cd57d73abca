use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scene::{Rect, SceneNode, SceneState, Shape};

const BACKGROUND: &str = "#f8fafc";
const CARD: &str = "#ffffff";
const INK: &str = "#0f172a";
const MUTED: &str = "#64748b";
const RADIUS: f64 = 8.0;
const PAD: f64 = 12.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &SceneState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_grid(state, ctx);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_minimap(state, ctx);
}

/// Overview of the whole graph with the visible area outlined.
fn draw_minimap(state: &SceneState, ctx: &CanvasRenderingContext2d) {
	let Some(map) = state.minimap() else {
		return;
	};
	let Rect { x, y, w, h } = map.frame;
	rounded_rect(ctx, x - 4.0, y - 4.0, w + 8.0, h + 8.0, 6.0);
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
	ctx.fill();
	ctx.set_stroke_style_str("#e2e8f0");
	ctx.set_line_width(1.0);
	ctx.stroke();

	for node in &state.nodes {
		let r = map.project(Rect {
			x: node.x,
			y: node.y,
			w: node.w,
			h: node.h,
		});
		ctx.set_fill_style_str(node.shape.color());
		ctx.fill_rect(r.x, r.y, r.w.max(1.0), r.h.max(1.0));
	}

	let view = map.project(state.visible_area());
	ctx.set_fill_style_str("rgba(15, 23, 42, 0.06)");
	ctx.fill_rect(view.x, view.y, view.w, view.h);
	ctx.set_stroke_style_str("rgba(15, 23, 42, 0.5)");
	ctx.stroke_rect(view.x, view.y, view.w, view.h);
}

/// Dotted background that moves with the view.
fn draw_grid(state: &SceneState, ctx: &CanvasRenderingContext2d) {
	let step = 24.0 * state.transform.k;
	if step < 6.0 {
		return;
	}
	ctx.set_fill_style_str("#e2e8f0");
	let (ox, oy) = (state.transform.x % step, state.transform.y % step);
	let mut x = ox;
	while x < state.width {
		let mut y = oy;
		while y < state.height {
			ctx.fill_rect(x, y, 1.5, 1.5);
			y += step;
		}
		x += step;
	}
}

/// Distance from a box centre to its border along (ux, uy).
fn border_offset(node: &SceneNode, ux: f64, uy: f64) -> f64 {
	let (hw, hh) = (node.w / 2.0, node.h / 2.0);
	let tx = if ux.abs() > 1e-9 { hw / ux.abs() } else { f64::INFINITY };
	let ty = if uy.abs() > 1e-9 { hh / uy.abs() } else { f64::INFINITY };
	tx.min(ty)
}

fn draw_edges(state: &SceneState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, arrow_size) = (1.5 / k.max(0.5), 8.0);
	let t = ease_out_cubic(state.hover.highlight_t);

	for &(si, ti) in &state.edges {
		let (src, tgt) = (&state.nodes[si], &state.nodes[ti]);
		let ((x1, y1), (x2, y2)) = (src.center(), tgt.center());
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let (start, end) = (border_offset(src, ux, uy), border_offset(tgt, ux, uy));
		if start + end >= dist {
			continue;
		}

		let is_highlighted = state.is_highlighted(si) && state.is_highlighted(ti);
		let alpha = if is_highlighted {
			0.55 + 0.4 * t
		} else {
			0.55 - 0.4 * t
		};
		let color = format!("rgba(100, 116, 139, {})", alpha);

		ctx.set_stroke_style_str(&color);
		ctx.set_line_width(if is_highlighted {
			line_width * (1.0 + 0.5 * t)
		} else {
			line_width
		});
		ctx.begin_path();
		ctx.move_to(x1 + ux * start, y1 + uy * start);
		ctx.line_to(x2 - ux * (end + arrow_size), y2 - uy * (end + arrow_size));
		ctx.stroke();

		ctx.set_fill_style_str(&color);
		let (tip_x, tip_y) = (x2 - ux * end, y2 - uy * end);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

/// Cut `text` with an ellipsis so it fits in `max_width` at the current font.
fn fit_text(ctx: &CanvasRenderingContext2d, text: &str, max_width: f64) -> String {
	let width = |s: &str| ctx.measure_text(s).map(|m| m.width()).unwrap_or(0.0);
	if width(text) <= max_width {
		return text.to_string();
	}
	let mut chars: Vec<char> = text.chars().collect();
	while !chars.is_empty() {
		chars.pop();
		let candidate: String = chars.iter().collect::<String>() + "…";
		if width(&candidate) <= max_width {
			return candidate;
		}
	}
	String::new()
}

/// Greedy word wrap into at most `max_lines`, ellipsising the last one.
fn wrap_text(ctx: &CanvasRenderingContext2d, text: &str, max_width: f64, max_lines: usize) -> Vec<String> {
	let width = |s: &str| ctx.measure_text(s).map(|m| m.width()).unwrap_or(0.0);
	let mut lines: Vec<String> = Vec::new();
	let mut current = String::new();
	let mut words = text.split_whitespace();
	while let Some(word) = words.next() {
		let candidate = if current.is_empty() {
			word.to_string()
		} else {
			format!("{current} {word}")
		};
		if width(&candidate) <= max_width || current.is_empty() {
			current = candidate;
			continue;
		}
		if lines.len() + 1 == max_lines {
			let rest: Vec<&str> = std::iter::once(word).chain(words).collect();
			current = format!("{current} {}", rest.join(" "));
			break;
		}
		lines.push(std::mem::replace(&mut current, word.to_string()));
	}
	if !current.is_empty() {
		lines.push(current);
	}
	lines
		.into_iter()
		.take(max_lines)
		.map(|line| fit_text(ctx, &line, max_width))
		.collect()
}

fn draw_clause(
	ctx: &CanvasRenderingContext2d,
	node: &SceneNode,
	label: &str,
	object: Option<&str>,
	condition: Option<&str>,
	badge: &str,
) {
	let color = node.shape.color();
	rounded_rect(ctx, node.x, node.y, node.w, node.h, RADIUS);
	ctx.set_fill_style_str(CARD);
	ctx.fill();
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(2.0);
	ctx.stroke();

	let inner = node.w - 2.0 * PAD;
	let mut y = node.y + PAD;

	ctx.set_font("bold 10px sans-serif");
	let badge_w = ctx.measure_text(badge).map(|m| m.width()).unwrap_or(60.0) + 12.0;
	rounded_rect(ctx, node.x + PAD, y, badge_w, 18.0, 4.0);
	ctx.set_fill_style_str(color);
	ctx.fill();
	ctx.set_fill_style_str("white");
	let _ = ctx.fill_text(badge, node.x + PAD + 6.0, y + 13.0);
	y += 26.0;

	ctx.set_font("500 13px sans-serif");
	ctx.set_fill_style_str(INK);
	for line in wrap_text(ctx, label, inner, 2) {
		y += 14.0;
		let _ = ctx.fill_text(&line, node.x + PAD, y);
	}

	ctx.set_fill_style_str(MUTED);
	if let Some(object) = object {
		ctx.set_font("11px sans-serif");
		y += 15.0;
		let _ = ctx.fill_text(&fit_text(ctx, object, inner), node.x + PAD, y);
	}
	if let Some(condition) = condition {
		ctx.set_font("italic 11px sans-serif");
		y += 15.0;
		let line = fit_text(ctx, &format!("if: {condition}"), inner);
		let _ = ctx.fill_text(&line, node.x + PAD, y);
	}
}

fn draw_pill(ctx: &CanvasRenderingContext2d, node: &SceneNode, label: &str, icon: char) {
	let color = node.shape.color();
	rounded_rect(ctx, node.x, node.y, node.w, node.h, RADIUS);
	ctx.set_fill_style_str(color);
	ctx.fill();

	let cy = node.y + node.h / 2.0;
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.25)");
	ctx.begin_path();
	let _ = ctx.arc(node.x + PAD + 8.0, cy, 9.0, 0.0, 2.0 * PI);
	ctx.fill();

	ctx.set_fill_style_str("white");
	ctx.set_font("bold 11px sans-serif");
	let _ = ctx.fill_text(&icon.to_string(), node.x + PAD + 4.5, cy + 4.0);
	ctx.set_font("600 13px sans-serif");
	let inner = node.w - 2.0 * PAD - 24.0;
	let _ = ctx.fill_text(&fit_text(ctx, label, inner), node.x + PAD + 24.0, cy + 4.5);
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &SceneNode) {
	match &node.shape {
		Shape::Clause {
			modality,
			label,
			object,
			condition,
		} => draw_clause(
			ctx,
			node,
			label,
			object.as_deref(),
			condition.as_deref(),
			modality.as_str(),
		),
		Shape::Actor { label } => draw_pill(ctx, node, label, 'A'),
		Shape::Article { label } => draw_pill(ctx, node, label, '§'),
		Shape::Generic { label } => draw_pill(ctx, node, label, '?'),
	}
}

fn draw_nodes(state: &SceneState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.hover.node.is_some() || t > 0.0;

	for (idx, node) in state.nodes.iter().enumerate() {
		let dimmed = has_highlight && !state.is_highlighted(idx);
		ctx.set_global_alpha(if dimmed { 1.0 - 0.65 * t } else { 1.0 });
		ctx.set_shadow_color("rgba(15, 23, 42, 0.12)");
		ctx.set_shadow_blur(8.0);
		ctx.set_shadow_offset_y(2.0);
		draw_node(ctx, node);
		ctx.set_shadow_color("transparent");
		ctx.set_global_alpha(1.0);
	}

	if let Some(idx) = state.selected {
		let node = &state.nodes[idx];
		rounded_rect(ctx, node.x - 4.0, node.y - 4.0, node.w + 8.0, node.h + 8.0, RADIUS + 4.0);
		ctx.set_stroke_style_str("#f59e0b");
		ctx.set_line_width(3.0 / state.transform.k.max(0.5));
		ctx.stroke();
	}

	if let Some(idx) = state.hover.node {
		if t > 0.01 {
			let node = &state.nodes[idx];
			rounded_rect(ctx, node.x - 2.0, node.y - 2.0, node.w + 4.0, node.h + 4.0, RADIUS + 2.0);
			ctx.set_stroke_style_str(&format!("rgba(15, 23, 42, {})", 0.5 * t));
			ctx.set_line_width(1.5 / state.transform.k.max(0.5));
			ctx.stroke();
		}
	}
}
