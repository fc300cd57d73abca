use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::controller::GraphController;
use super::render;
use super::scene::{CLICK_SLOP, SceneState, ZOOM_STEP};

type SharedScene = Rc<RefCell<Option<SceneState>>>;
type SharedCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Browser callbacks held by one mounted canvas. Dropping it stops the frame
/// loop and unregisters the resize listener before the closures are freed.
struct CanvasHooks {
	running: Rc<Cell<bool>>,
	frame: Rc<Cell<Option<i32>>>,
	animate: SharedCallback,
	resize: SharedCallback,
}

impl Drop for CanvasHooks {
	fn drop(&mut self) {
		self.running.set(false);
		let frame = self.frame.take();
		let resize = self.resize.borrow_mut().take();
		if frame.is_some() || resize.is_some() {
			if let Some(window) = web_sys::window() {
				if let Some(id) = frame {
					let _ = window.cancel_animation_frame(id);
				}
				if let Some(cb) = &resize {
					let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}
		}
		drop(resize);
		// the frame callback holds its own slot; emptying it breaks the cycle
		let animate = self.animate.borrow_mut().take();
		drop(animate);
	}
}

/// Keep `hooks` alive until the current owner is cleaned up.
fn hold_until_cleanup(hooks: CanvasHooks) {
	let hooks = StoredValue::new_local(hooks);
	on_cleanup(move || hooks.dispose());
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas showing the controller's current graph. Clicking a node selects it,
/// clicking empty canvas clears the selection. Zoom and fit buttons sit in
/// the bottom-left corner; double-clicking empty canvas also fits the view.
#[component]
pub fn ClauseGraphCanvas(controller: GraphController) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let view = controller.state();
	let scene: SharedScene = Rc::new(RefCell::new(None));
	let animate: SharedCallback = Rc::new(RefCell::new(None));
	let resize_cb: SharedCallback = Rc::new(RefCell::new(None));
	let running = Rc::new(Cell::new(true));
	let frame = Rc::new(Cell::new(None));
	hold_until_cleanup(CanvasHooks {
		running: running.clone(),
		frame: frame.clone(),
		animate: animate.clone(),
		resize: resize_cb.clone(),
	});

	let (scene_init, animate_init, resize_cb_init, running_init, frame_init) = (
		scene.clone(),
		animate,
		resize_cb,
		running,
		frame,
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if scene_init.borrow().is_some() || !running_init.get() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("clause-graph: no window, canvas stays blank");
			return;
		};
		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("clause-graph: 2d context unavailable");
				return;
			}
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		let mut initial = SceneState::new(w, h);
		view.with_untracked(|s| {
			initial.load(s.nodes(), s.edges(), s.revision());
			initial.select_id(s.selected_id());
		});
		*scene_init.borrow_mut() = Some(initial);

		let (scene_resize, canvas_resize, running_resize) =
			(scene_init.clone(), canvas.clone(), running_init.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			if !running_resize.get() {
				return;
			}
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *scene_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (scene_anim, animate_inner, running_anim, frame_anim) = (
			scene_init.clone(),
			animate_init.clone(),
			running_init.clone(),
			frame_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			frame_anim.set(None);
			if !running_anim.get() {
				return;
			}
			if let Some(ref mut s) = *scene_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				frame_anim.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			frame_init.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	// Follow swaps and selection changes in the view state.
	let scene_sync = scene.clone();
	Effect::new(move |_| {
		let (revision, selected) =
			view.with(|s| (s.revision(), s.selected_id().map(str::to_owned)));
		let mut guard = scene_sync.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		if s.revision != revision {
			view.with_untracked(|v| s.load(v.nodes(), v.edges(), revision));
		}
		s.select_id(selected.as_deref());
	});

	let scene_md = scene.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *scene_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.moved = false;
				s.drag.node = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.drag.node_start_x = s.nodes[idx].x;
				s.drag.node_start_y = s.nodes[idx].y;
			} else {
				s.pan.active = true;
				s.pan.moved = false;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let scene_mm = scene.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *scene_mm.borrow_mut() {
			if !s.drag.active {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}

			if s.drag.active {
				let (dx, dy) = (x - s.drag.start_x, y - s.drag.start_y);
				if dx.hypot(dy) > CLICK_SLOP {
					s.drag.moved = true;
				}
				if let (Some(idx), true) = (s.drag.node, s.drag.moved) {
					let k = s.transform.k;
					s.nodes[idx].x = s.drag.node_start_x + dx / k;
					s.nodes[idx].y = s.drag.node_start_y + dy / k;
				}
			} else if s.pan.active {
				let (dx, dy) = (x - s.pan.start_x, y - s.pan.start_y);
				if dx.hypot(dy) > CLICK_SLOP {
					s.pan.moved = true;
				}
				s.transform.x = s.pan.transform_start_x + dx;
				s.transform.y = s.pan.transform_start_y + dy;
			}
		}
	};

	let scene_mu = scene.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = {
			let mut guard = scene_mu.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let clicked = if s.drag.active && !s.drag.moved {
				Some(s.drag.node.map(|idx| s.nodes[idx].id.clone()))
			} else if s.pan.active && !s.pan.moved {
				Some(None)
			} else {
				None
			};
			s.drag.active = false;
			s.drag.node = None;
			s.pan.active = false;
			clicked
		};
		// scene borrow released before touching the view state
		match clicked {
			Some(Some(id)) => controller.select(id),
			Some(None) => controller.clear_selection(),
			None => {}
		}
	};

	let scene_ml = scene.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *scene_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.node = None;
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let scene_dbl = scene.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *scene_dbl.borrow_mut() {
			if s.node_at_position(x, y).is_none() {
				s.fit_view();
			}
		}
	};

	let scene_wh = scene.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *scene_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	let zoom_button = |factor: f64| {
		let scene = scene.clone();
		move |_: MouseEvent| {
			if let Some(ref mut s) = *scene.borrow_mut() {
				s.zoom_centre(factor);
			}
		}
	};
	let on_zoom_in = zoom_button(ZOOM_STEP);
	let on_zoom_out = zoom_button(1.0 / ZOOM_STEP);
	let scene_fit = scene.clone();
	let on_fit = move |_: MouseEvent| {
		if let Some(ref mut s) = *scene_fit.borrow_mut() {
			s.fit_view();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="clause-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
		<div class="graph-controls">
			<button class="control-button" title="Zoom in" on:click=on_zoom_in>"+"</button>
			<button class="control-button" title="Zoom out" on:click=on_zoom_out>"−"</button>
			<button
				class="control-button"
				title="Fit view (or double-click empty canvas)"
				on:click=on_fit
			>
				"⤢"
			</button>
		</div>
	}
}
