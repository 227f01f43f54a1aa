pub mod canvas;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod events;
pub mod game;
pub mod input;
pub mod modal;
pub mod scene;
pub mod sprites;
pub mod stage;
pub mod subscriptions;
pub mod surface;
pub mod text;
pub mod textures;
pub mod timeline;

#[cfg(test)]
mod testing;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use crate::canvas::{CanvasMetrics, CanvasRenderer};
use crate::input::Pointer;
use crate::subscriptions::Subscriptions;

pub use crate::config::GameConfig;
pub use crate::data::BattleEntry;
pub use crate::error::{MenuError, Result};
pub use crate::game::Game;

// --- LOGGING ---

fn init_logging() {
    console_error_panic_hook::set_once();
    // A second run_menu on the same page finds the logger already installed
    let _ = console_log::init_with_level(log::Level::Debug);
}

// --- HOST HANDLE ---

/// Returned to the page so it can restart or stop the menu.
#[wasm_bindgen]
pub struct MenuApp {
    game: Rc<RefCell<Game>>,
    running: Rc<Cell<bool>>,
    /// DOM listeners and the frame loop; each holds a clone of `game`.
    subscriptions: Subscriptions,
}

#[wasm_bindgen]
impl MenuApp {
    /// Tear the menu down and build it again; textures are kept.
    pub fn reload(&self) {
        if self.running.get() {
            self.game.borrow_mut().start_menu();
        }
    }

    /// Stop the frame loop, detach every DOM listener and release the
    /// menu. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.running.set(false);
        let released = self.subscriptions.release();
        self.game.borrow_mut().shutdown();
        if released > 0 {
            info!("menu stopped, {} host subscriptions released", released);
        }
    }
}

impl Drop for MenuApp {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn unlisten(target: &EventTarget, kind: &str, callback: &JsValue) {
    if let Err(err) = target.remove_event_listener_with_callback(kind, callback.unchecked_ref()) {
        warn!("removing {} listener failed: {:?}", kind, err);
    }
}

// --- MAIN LOOP ---

/// Map a mouse event from CSS pixels to canvas pixels.
fn canvas_pointer(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Pointer {
    let rect = canvas.get_bounding_client_rect();
    let sx = if rect.width() > 0.0 { canvas.width() as f64 / rect.width() } else { 1.0 };
    let sy = if rect.height() > 0.0 { canvas.height() as f64 / rect.height() } else { 1.0 };
    Pointer::new(
        ((event.client_x() as f64 - rect.left()) * sx) as f32,
        ((event.client_y() as f64 - rect.top()) * sy) as f32,
        event.time_stamp(),
    )
}

/// Boot and show the menu on `canvas_id` (falls back to the config's id).
#[wasm_bindgen]
pub fn run_menu(canvas_id: Option<String>, config_json: Option<String>) -> std::result::Result<MenuApp, JsValue> {
    init_logging();

    let mut config = GameConfig::from_json(config_json.as_deref())?;
    if let Some(id) = canvas_id.filter(|id| !id.is_empty()) {
        config.canvas_id = id;
    }
    let battles = data::default_battles()?;

    let window = web_sys::window().ok_or_else(|| MenuError::host("no global `window` exists"))?;
    let document = window.document().ok_or_else(|| MenuError::host("window has no document"))?;
    let canvas = document
        .get_element_by_id(&config.canvas_id)
        .ok_or_else(|| MenuError::host(format!("no #{} on the page", config.canvas_id)))?
        .dyn_into::<HtmlCanvasElement>()?;

    canvas.set_width(config.width);
    canvas.set_height(config.height);

    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| MenuError::host("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let metrics: Rc<dyn text::TextMetrics> = Rc::new(CanvasMetrics::new(context.clone()));
    let mut renderer = CanvasRenderer::new(document, context, metrics.clone());

    let background = config.background;
    let game = Rc::new(RefCell::new(Game::new(config, battles, metrics)));
    game.borrow_mut().boot();

    let running = Rc::new(Cell::new(true));
    let mut subscriptions = Subscriptions::new();

    // --- INPUT ---
    {
        let gs = game.clone();
        let target = canvas.clone();
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            gs.borrow_mut().pointer_move(canvas_pointer(&target, &event));
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        let canvas = canvas.clone();
        subscriptions.add("mousemove", move || unlisten(&canvas, "mousemove", closure.as_ref()));
    }
    {
        let gs = game.clone();
        let target = canvas.clone();
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            if event.button() == 0 {
                gs.borrow_mut().pointer_down(canvas_pointer(&target, &event));
            }
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        let canvas = canvas.clone();
        subscriptions.add("mousedown", move || unlisten(&canvas, "mousedown", closure.as_ref()));
    }
    {
        let gs = game.clone();
        let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
            gs.borrow_mut().pointer_leave();
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())?;
        let canvas = canvas.clone();
        subscriptions.add("mouseleave", move || unlisten(&canvas, "mouseleave", closure.as_ref()));
    }
    {
        let gs = game.clone();
        let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            gs.borrow_mut().key_down(&event.key());
        }) as Box<dyn FnMut(_)>);
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        let window = window.clone();
        subscriptions.add("keydown", move || unlisten(&window, "keydown", closure.as_ref()));
    }

    // --- RENDER LOOP ---
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let frame_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

    let gs = game.clone();
    let alive = running.clone();
    let pending = frame_id.clone();
    let window_for_loop = window.clone();
    let performance = window.performance();
    let mut last = performance.as_ref().map_or(0.0, |p| p.now());

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        pending.set(None);
        if !alive.get() {
            return;
        }

        let now = performance.as_ref().map_or(last + 16.0, |p| p.now());
        // Background tabs pause rAF; don't fast-forward the gallop afterwards
        let dt = (now - last).clamp(0.0, 250.0);
        last = now;

        gs.borrow_mut().update(dt);
        {
            let game = gs.borrow();
            if let Some(menu) = game.menu() {
                if let Err(err) = renderer.render(menu.stage(), game.registry(), background) {
                    warn!("frame render failed: {}", err);
                }
            }
        }

        if let Some(callback) = f.borrow().as_ref() {
            pending.set(request_animation_frame(&window_for_loop, callback));
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = g.borrow().as_ref() {
        frame_id.set(request_animation_frame(&window, callback));
    }
    {
        // Cancel the queued frame before dropping the closure it would call
        let window = window.clone();
        subscriptions.add("animation frame", move || {
            if let Some(id) = frame_id.take() {
                if let Err(err) = window.cancel_animation_frame(id) {
                    warn!("cancelAnimationFrame failed: {:?}", err);
                }
            }
            g.borrow_mut().take();
        });
    }
    info!("menu running on #{}", game.borrow().config().canvas_id);

    Ok(MenuApp { game, running, subscriptions })
}

fn request_animation_frame(window: &Window, f: &Closure<dyn FnMut()>) -> Option<i32> {
    match window.request_animation_frame(f.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(err) => {
            warn!("requestAnimationFrame failed: {:?}", err);
            None
        }
    }
}
