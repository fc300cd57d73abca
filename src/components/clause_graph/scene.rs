use std::collections::{HashMap, HashSet};

use super::types::{GraphEdge, GraphNode, Modality, NodeKind};

pub const CLAUSE_SIZE: (f64, f64) = (260.0, 112.0);
pub const ACTOR_SIZE: (f64, f64) = (180.0, 48.0);
pub const ARTICLE_SIZE: (f64, f64) = (150.0, 48.0);
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 2.0;
const FIT_PADDING: f64 = 40.0;
/// Zoom step of the zoom in/out buttons.
pub const ZOOM_STEP: f64 = 1.2;
/// Largest minimap box, in screen pixels.
pub const MINIMAP_SIZE: (f64, f64) = (200.0, 140.0);
const MINIMAP_MARGIN: f64 = 16.0;
/// Pointer travel (screen pixels) below which a press counts as a click.
pub const CLICK_SLOP: f64 = 4.0;

pub const ACTOR_COLOR: &str = "#8b5cf6";
pub const ARTICLE_COLOR: &str = "#ec4899";
pub const OTHER_COLOR: &str = "#6b7280";

/// Drawing shape per node kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
	Clause {
		modality: Modality,
		label: String,
		object: Option<String>,
		condition: Option<String>,
	},
	Actor { label: String },
	Article { label: String },
	Generic { label: String },
}

impl Shape {
	fn of(kind: &NodeKind) -> Self {
		match kind {
			NodeKind::Clause(info) => Shape::Clause {
				modality: info.modality,
				label: info.label.clone(),
				object: info.object.clone(),
				condition: info.condition.clone(),
			},
			NodeKind::Actor { label } => Shape::Actor {
				label: label.clone(),
			},
			NodeKind::Article { label } => Shape::Article {
				label: label.clone(),
			},
			NodeKind::Other { tag, label } => Shape::Generic {
				label: label.clone().unwrap_or_else(|| tag.clone()),
			},
		}
	}

	pub fn size(&self) -> (f64, f64) {
		match self {
			Shape::Clause { .. } => CLAUSE_SIZE,
			Shape::Actor { .. } => ACTOR_SIZE,
			Shape::Article { .. } | Shape::Generic { .. } => ARTICLE_SIZE,
		}
	}

	pub fn color(&self) -> &'static str {
		match self {
			Shape::Clause { modality, .. } => modality.color(),
			Shape::Actor { .. } => ACTOR_COLOR,
			Shape::Article { .. } => ARTICLE_COLOR,
			Shape::Generic { .. } => OTHER_COLOR,
		}
	}
}

/// A node as placed on the canvas. `x`/`y` is the top-left corner.
#[derive(Clone, Debug)]
pub struct SceneNode {
	pub id: String,
	pub shape: Shape,
	pub x: f64,
	pub y: f64,
	pub w: f64,
	pub h: f64,
}

impl SceneNode {
	pub fn center(&self) -> (f64, f64) {
		(self.x + self.w / 2.0, self.y + self.h / 2.0)
	}

	fn contains(&self, gx: f64, gy: f64) -> bool {
		gx >= self.x && gx <= self.x + self.w && gy >= self.y && gy <= self.y + self.h
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
}

/// Axis-aligned rectangle in graph or screen units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub w: f64,
	pub h: f64,
}

impl Rect {
	fn union(self, other: Rect) -> Rect {
		let (x, y) = (self.x.min(other.x), self.y.min(other.y));
		Rect {
			x,
			y,
			w: (self.x + self.w).max(other.x + other.w) - x,
			h: (self.y + self.h).max(other.y + other.h) - y,
		}
	}
}

/// Overview in the bottom-right corner: graph-space `world` scaled by
/// `scale` into the screen-space `frame`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MiniMap {
	pub frame: Rect,
	pub world: Rect,
	pub scale: f64,
}

impl MiniMap {
	pub fn to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			self.frame.x + (gx - self.world.x) * self.scale,
			self.frame.y + (gy - self.world.y) * self.scale,
		)
	}

	/// A graph-space rectangle in minimap pixels.
	pub fn project(&self, r: Rect) -> Rect {
		let (x, y) = self.to_screen(r.x, r.y);
		Rect {
			x,
			y,
			w: r.w * self.scale,
			h: r.h * self.scale,
		}
	}
}

/// Canvas-side copy of the displayed graph plus everything about how it is
/// being looked at.
#[derive(Clone, Debug, Default)]
pub struct SceneState {
	pub nodes: Vec<SceneNode>,
	/// Edges as node indices; edges naming unknown nodes are not drawn.
	pub edges: Vec<(usize, usize)>,
	pub selected: Option<usize>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	/// Revision of the view state this scene was built from.
	pub revision: u64,
}

impl SceneState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			..Default::default()
		}
	}

	/// Rebuild from a freshly swapped graph and fit it into the viewport.
	pub fn load(&mut self, nodes: &[GraphNode], edges: &[GraphEdge], revision: u64) {
		self.nodes = nodes
			.iter()
			.map(|node| {
				let shape = Shape::of(&node.kind);
				let (w, h) = shape.size();
				SceneNode {
					id: node.id.clone(),
					shape,
					x: node.position.x,
					y: node.position.y,
					w,
					h,
				}
			})
			.collect();

		let index: HashMap<&str, usize> = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();
		self.edges = edges
			.iter()
			.filter_map(|e| Some((*index.get(e.source.as_str())?, *index.get(e.target.as_str())?)))
			.collect();

		self.revision = revision;
		self.selected = None;
		self.drag = DragState::default();
		self.hover = HoverState::default();
		self.fit_view();
	}

	pub fn select_id(&mut self, id: Option<&str>) {
		self.selected = id.and_then(|id| self.nodes.iter().position(|n| n.id == id));
	}

	/// Scale and centre so every node is visible.
	pub fn fit_view(&mut self) {
		let bounds = match self.bounds() {
			Some(b) if self.width > 0.0 && self.height > 0.0 => b,
			_ => {
				self.transform = ViewTransform::default();
				return;
			}
		};
		let k = ((self.width - 2.0 * FIT_PADDING) / bounds.w)
			.min((self.height - 2.0 * FIT_PADDING) / bounds.h)
			.clamp(MIN_ZOOM, MAX_ZOOM.min(1.0));
		self.transform = ViewTransform {
			x: self.width / 2.0 - (bounds.x + bounds.w / 2.0) * k,
			y: self.height / 2.0 - (bounds.y + bounds.h / 2.0) * k,
			k,
		};
	}

	/// Graph-space box around every node.
	pub fn bounds(&self) -> Option<Rect> {
		self.nodes
			.iter()
			.map(|n| Rect {
				x: n.x,
				y: n.y,
				w: n.w,
				h: n.h,
			})
			.reduce(Rect::union)
	}

	/// The part of graph space currently on screen.
	pub fn visible_area(&self) -> Rect {
		let (x, y) = self.screen_to_graph(0.0, 0.0);
		Rect {
			x,
			y,
			w: self.width / self.transform.k,
			h: self.height / self.transform.k,
		}
	}

	/// Minimap placement for the current viewport. It covers the nodes and
	/// the visible area, so the viewport outline always fits inside.
	pub fn minimap(&self) -> Option<MiniMap> {
		let world = self.bounds()?.union(self.visible_area());
		if world.w <= 0.0 || world.h <= 0.0 {
			return None;
		}
		let (max_w, max_h) = MINIMAP_SIZE;
		let scale = (max_w / world.w).min(max_h / world.h);
		let (w, h) = (world.w * scale, world.h * scale);
		Some(MiniMap {
			frame: Rect {
				x: self.width - MINIMAP_MARGIN - w,
				y: self.height - MINIMAP_MARGIN - h,
				w,
				h,
			},
			world,
			scale,
		})
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen position. Later nodes are drawn on top.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.nodes.iter().rposition(|n| n.contains(gx, gy))
	}

	/// Zoom by `factor` keeping the graph point under (sx, sy) fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Zoom around the middle of the viewport.
	pub fn zoom_centre(&mut self, factor: f64) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, factor);
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();
		if let Some(idx) = node {
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx)
	}

	/// Ease the hover highlight towards on/off. Returns whether anything
	/// changed, so idle frames can skip redrawing.
	pub fn tick(&mut self, dt: f64) -> bool {
		let target = if self.hover.node.is_some() { 1.0 } else { 0.0 };
		let before = self.hover.highlight_t;
		self.hover.highlight_t += (target - self.hover.highlight_t) * (6.0 * dt).min(1.0);
		if (self.hover.highlight_t - target).abs() < 0.01 {
			self.hover.highlight_t = target;
		}
		self.hover.highlight_t != before
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::clause_graph::layout::apply_layout;
	use crate::components::clause_graph::types::{ClauseInfo, Position};

	fn graph() -> (Vec<GraphNode>, Vec<GraphEdge>) {
		let mut nodes = vec![
			GraphNode {
				id: "article_4".into(),
				kind: NodeKind::Article {
					label: "Article 4".into(),
				},
				position: Position::default(),
			},
			GraphNode {
				id: "c1".into(),
				kind: NodeKind::Clause(ClauseInfo {
					modality: Modality::Prohibition,
					label: "4: processor".into(),
					..Default::default()
				}),
				position: Position::default(),
			},
			GraphNode {
				id: "actor_0".into(),
				kind: NodeKind::Actor {
					label: "processor".into(),
				},
				position: Position::default(),
			},
		];
		let edges = vec![
			GraphEdge {
				source: "article_4".into(),
				target: "c1".into(),
			},
			GraphEdge {
				source: "c1".into(),
				target: "actor_0".into(),
			},
			GraphEdge {
				source: "c1".into(),
				target: "missing".into(),
			},
		];
		apply_layout(&mut nodes, &edges);
		(nodes, edges)
	}

	#[test]
	fn load_resolves_edges_and_fits() {
		let (nodes, edges) = graph();
		let mut scene = SceneState::new(1600.0, 900.0);
		scene.load(&nodes, &edges, 3);

		assert_eq!(scene.edges, vec![(0, 1), (1, 2)]);
		assert_eq!(scene.revision, 3);
		assert!(scene.transform.k > MIN_ZOOM && scene.transform.k <= 1.0);
		assert_eq!(scene.nodes[1].shape.color(), Modality::Prohibition.color());
	}

	#[test]
	fn hit_testing_uses_boxes() {
		let (nodes, edges) = graph();
		let mut scene = SceneState::new(1600.0, 900.0);
		scene.load(&nodes, &edges, 1);
		scene.transform = ViewTransform::default();

		assert_eq!(scene.node_at_position(60.0, 60.0), Some(0));
		assert_eq!(scene.node_at_position(410.0, 150.0), Some(1));
		assert_eq!(scene.node_at_position(1250.0, 70.0), Some(2));
		assert_eq!(scene.node_at_position(300.0, 600.0), None);
	}

	#[test]
	fn hover_collects_neighbours() {
		let (nodes, edges) = graph();
		let mut scene = SceneState::new(800.0, 600.0);
		scene.load(&nodes, &edges, 1);

		scene.set_hover(Some(1));
		assert!(scene.is_highlighted(0) && scene.is_highlighted(1) && scene.is_highlighted(2));
		scene.set_hover(Some(0));
		assert!(!scene.is_highlighted(2));
		assert!(scene.tick(0.016));
		scene.set_hover(None);
		assert!(!scene.is_highlighted(0));
	}

	#[test]
	fn zoom_is_clamped_and_anchored() {
		let mut scene = SceneState::new(800.0, 600.0);
		scene.zoom_at(100.0, 100.0, 100.0);
		assert_eq!(scene.transform.k, MAX_ZOOM);
		assert_eq!(scene.screen_to_graph(100.0, 100.0), (100.0, 100.0));
		for _ in 0..100 {
			scene.zoom_at(0.0, 0.0, 0.5);
		}
		assert_eq!(scene.transform.k, MIN_ZOOM);
	}

	#[test]
	fn centre_zoom_keeps_the_middle_fixed() {
		let (nodes, edges) = graph();
		let mut scene = SceneState::new(800.0, 600.0);
		scene.load(&nodes, &edges, 1);
		let middle = scene.screen_to_graph(400.0, 300.0);
		let k = scene.transform.k;

		scene.zoom_centre(ZOOM_STEP);
		assert!((scene.transform.k - k * ZOOM_STEP).abs() < 1e-9);
		let (gx, gy) = scene.screen_to_graph(400.0, 300.0);
		assert!((gx - middle.0).abs() < 1e-9 && (gy - middle.1).abs() < 1e-9);

		scene.zoom_centre(1.0 / ZOOM_STEP);
		assert!((scene.transform.k - k).abs() < 1e-9);
		scene.fit_view();
		assert!((scene.transform.k - k).abs() < 1e-9);
	}

	#[test]
	fn minimap_covers_nodes_and_viewport() {
		let (nodes, edges) = graph();
		let mut scene = SceneState::new(800.0, 600.0);
		assert_eq!(scene.minimap(), None);
		scene.load(&nodes, &edges, 1);
		scene.transform = ViewTransform::default();

		let map = scene.minimap().unwrap();
		let (max_w, max_h) = MINIMAP_SIZE;
		assert!(map.frame.w <= max_w + 1e-9 && map.frame.h <= max_h + 1e-9);
		assert!((map.frame.x + map.frame.w - (800.0 - 16.0)).abs() < 1e-9);
		assert!((map.frame.y + map.frame.h - (600.0 - 16.0)).abs() < 1e-9);

		// viewport starts at x=0, the actor column ends at x=1380
		assert_eq!(map.world.x, 0.0);
		assert_eq!(map.world.w, 1380.0);
		assert_eq!(map.to_screen(map.world.x, map.world.y), (map.frame.x, map.frame.y));

		let inside = |r: Rect| {
			r.x >= map.frame.x - 1e-9
				&& r.y >= map.frame.y - 1e-9
				&& r.x + r.w <= map.frame.x + map.frame.w + 1e-9
				&& r.y + r.h <= map.frame.y + map.frame.h + 1e-9
		};
		assert!(inside(map.project(scene.visible_area())));
		for n in &scene.nodes {
			assert!(inside(map.project(Rect {
				x: n.x,
				y: n.y,
				w: n.w,
				h: n.h,
			})));
		}
	}

	#[test]
	fn selection_by_id() {
		let (nodes, edges) = graph();
		let mut scene = SceneState::new(800.0, 600.0);
		scene.load(&nodes, &edges, 1);
		scene.select_id(Some("actor_0"));
		assert_eq!(scene.selected, Some(2));
		scene.select_id(Some("nope"));
		assert_eq!(scene.selected, None);
	}
}
