use std::cell::RefCell;
use std::rc::Rc;

use log::info;

use crate::config::GameConfig;
use crate::constants::{colors, depths, layout, subtitle_style, title_style, SUBTITLE_TEXT, TITLE_TEXT};
use crate::data::BattleEntry;
use crate::input::{Pointer, PointerEvent, PointerTracker};
use crate::modal::BattleModal;
use crate::sprites::hussar::{frame_key, ANIM_KEY};
use crate::sprites::PolishEagle;
use crate::stage::{Handle, Stage};
use crate::surface::Surface;
use crate::text::{TextMetrics, TextStyle};
use crate::textures::{AnimationPlayer, TextureRegistry};
use crate::timeline::{ClickCallback, TimelineManager};

pub const PROMPT_TEXT: &str = "Wybierz bitwę";

pub fn selected_label(entry: &BattleEntry) -> String {
    format!("Wybrana bitwa: {} ({})", entry.name, entry.year)
}

/// The title screen: backdrop, banner, sprites, the battle timeline and the
/// detail modal it opens.
pub struct MenuScene {
    config: GameConfig,
    stage: Stage,
    tracker: PointerTracker,
    metrics: Rc<dyn TextMetrics>,
    decor: Vec<Handle>,
    eagle: Option<PolishEagle>,
    hussar: Handle,
    gallop: AnimationPlayer,
    selected: Handle,
    timeline: TimelineManager,
    /// Filled by the timeline click callback, drained after each dispatch.
    selections: Rc<RefCell<Vec<Rc<BattleEntry>>>>,
    modal: Option<BattleModal>,
    shut_down: bool,
}

fn backdrop(stage: &mut Stage, width: f32, height: f32) -> Vec<Handle> {
    let bg = stage.graphics(0.0, 0.0);
    if let Some(g) = bg.borrow_mut().graphics_mut() {
        g.fill_style(colors::BG_BASE, 1.0);
        g.fill_rect(0.0, 0.0, width, height);
    }
    bg.borrow_mut().set_depth(depths::BG);

    // White over red along the top, red along the bottom
    let stripes = stage.graphics(0.0, 0.0);
    if let Some(g) = stripes.borrow_mut().graphics_mut() {
        let white = layout::WHITE_STRIPE_HEIGHT;
        let band = layout::STRIPE_HEIGHT;
        g.fill_style(colors::WHITE, 1.0);
        g.fill_rect(0.0, 0.0, width, white);
        g.fill_style(colors::RED, 1.0);
        g.fill_rect(0.0, white, width, band - white);
        g.fill_rect(0.0, height - (band - white), width, band - white);
    }
    stripes.borrow_mut().set_depth(depths::PANEL);

    let line = stage.graphics(width / 2.0, layout::DECO_LINE_Y);
    if let Some(g) = line.borrow_mut().graphics_mut() {
        let half = layout::DECO_LINE_WIDTH / 2.0;
        g.fill_style(colors::GOLD, 0.8);
        g.fill_rect(-half, -1.0, half * 2.0, 2.0);
        g.fill_style(colors::GOLD, 1.0);
        g.fill_rect(-half - 4.0, -4.0, 8.0, 8.0);
        g.fill_rect(half - 4.0, -4.0, 8.0, 8.0);
        g.fill_rect(-4.0, -4.0, 8.0, 8.0);
    }
    line.borrow_mut().set_depth(depths::DECORATIONS);

    let title = stage.text(width / 2.0, layout::TITLE_Y, TITLE_TEXT, title_style());
    title.borrow_mut().set_origin(0.5, 0.5).set_depth(depths::UI);
    let subtitle = stage.text(width / 2.0, layout::SUBTITLE_Y, SUBTITLE_TEXT, subtitle_style());
    subtitle.borrow_mut().set_origin(0.5, 0.5).set_depth(depths::UI);

    let decor = vec![bg, stripes, line, title, subtitle];
    for h in &decor {
        stage.add(h);
    }
    decor
}

impl MenuScene {
    pub fn create(config: &GameConfig, battles: &[BattleEntry], metrics: Rc<dyn TextMetrics>) -> MenuScene {
        let (width, height) = (config.width as f32, config.height as f32);
        let mut stage = Stage::new();

        let decor = backdrop(&mut stage, width, height);
        let eagle = PolishEagle::new(&mut stage, layout::EAGLE_X, layout::EAGLE_Y, layout::EAGLE_SCALE);

        let hussar = stage.image(layout::HUSSAR_X, layout::HUSSAR_Y, &frame_key(0));
        hussar.borrow_mut().set_depth(depths::SPRITES);
        stage.add(&hussar);

        let selected = stage.text(width / 2.0, layout::SELECTED_BATTLE_Y, PROMPT_TEXT, TextStyle::sized(18.0, colors::WHITE));
        selected.borrow_mut().set_origin(0.5, 0.5).set_depth(depths::UI);
        stage.add(&selected);

        let selections = Rc::new(RefCell::new(Vec::new()));
        let queue = selections.clone();
        let on_click: ClickCallback = Rc::new(move |entry| queue.borrow_mut().push(entry.clone()));
        let mut timeline = TimelineManager::new(&mut stage, metrics.clone(), width, Some(on_click));
        timeline.build(&mut stage, battles);

        info!("menu ready: {} battles, {} stage objects", timeline.node_count(), stage.len());
        MenuScene {
            config: config.clone(),
            stage,
            tracker: PointerTracker::new(),
            metrics,
            decor,
            eagle: Some(eagle),
            hussar,
            gallop: AnimationPlayer::new(ANIM_KEY),
            selected,
            timeline,
            selections,
            modal: None,
            shut_down: false,
        }
    }

    /// Per-frame tick: advance the hussar gallop.
    pub fn update(&mut self, dt_ms: f64, registry: &TextureRegistry) {
        if self.shut_down {
            return;
        }
        self.gallop.advance(dt_ms);
        if let Some(key) = self.gallop.current_frame(registry) {
            self.hussar.borrow_mut().set_texture(key);
        }
    }

    pub fn pointer_move(&mut self, pointer: Pointer) {
        if self.shut_down {
            return;
        }
        let events = self.tracker.pointer_move(&self.stage, pointer);
        self.dispatch(events);
    }

    pub fn pointer_down(&mut self, pointer: Pointer) {
        if self.shut_down {
            return;
        }
        let events = self.tracker.pointer_down(&self.stage, pointer);
        self.dispatch(events);
    }

    pub fn pointer_leave(&mut self) {
        let events = self.tracker.pointer_leave();
        self.dispatch(events);
    }

    pub fn key_down(&mut self, key: &str) {
        let close = self.modal.as_ref().is_some_and(|m| m.closes_on_key(key));
        if close {
            self.close_modal();
            self.resync_pointer();
        }
    }

    fn dispatch(&mut self, events: Vec<PointerEvent>) {
        let mut display_changed = false;
        for event in events {
            match event {
                PointerEvent::Over(id) => {
                    self.timeline.pointer_over(id);
                }
                PointerEvent::Out(id) => {
                    self.timeline.pointer_out(id);
                }
                PointerEvent::Down(id) => {
                    if self.modal.as_ref().is_some_and(|m| m.close_button_id() == id) {
                        self.close_modal();
                        display_changed = true;
                    } else {
                        self.timeline.pointer_down(id);
                    }
                }
                PointerEvent::Move(p) => self.timeline.update(p),
            }
        }

        let picked = self.selections.borrow_mut().drain(..).last();
        if let Some(entry) = picked {
            self.open_modal(entry);
            display_changed = true;
        }
        if display_changed {
            self.resync_pointer();
        }
    }

    /// Objects appeared or vanished under a still pointer.
    fn resync_pointer(&mut self) {
        let events = self.tracker.refresh(&self.stage);
        for event in events {
            match event {
                PointerEvent::Over(id) => {
                    self.timeline.pointer_over(id);
                }
                PointerEvent::Out(id) => {
                    self.timeline.pointer_out(id);
                }
                PointerEvent::Down(_) | PointerEvent::Move(_) => {}
            }
        }
        self.timeline.update(self.tracker.position());
    }

    fn open_modal(&mut self, entry: Rc<BattleEntry>) {
        self.close_modal();
        info!("selected {} ({})", entry.name, entry.year);
        self.selected.borrow_mut().set_text(&selected_label(&entry));
        let (w, h) = (self.config.width as f32, self.config.height as f32);
        self.modal = Some(BattleModal::new(&mut self.stage, entry, w, h, self.metrics.as_ref()));
    }

    fn close_modal(&mut self) {
        if let Some(modal) = self.modal.take() {
            modal.destroy(&mut self.stage);
        }
    }

    /// Release everything the scene put on stage. Idempotent.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.close_modal();
        self.timeline.teardown(&mut self.stage);
        if let Some(eagle) = self.eagle.take() {
            eagle.destroy(&mut self.stage);
        }
        self.stage.destroy(&self.hussar);
        self.stage.destroy(&self.selected);
        for h in self.decor.drain(..) {
            self.stage.destroy(&h);
        }
        self.selections.borrow_mut().clear();
        self.shut_down = true;
        info!("menu shut down, {} stage objects left", self.stage.len());
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn timeline(&self) -> &TimelineManager {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut TimelineManager {
        &mut self.timeline
    }

    pub fn modal(&self) -> Option<&BattleModal> {
        self.modal.as_ref()
    }

    pub fn selected_text(&self) -> String {
        self.selected.borrow().text().map(|t| t.content.clone()).unwrap_or_default()
    }

    pub fn hussar_texture(&self) -> String {
        self.hussar.borrow().texture().unwrap_or_default().to_string()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

impl Drop for MenuScene {
    fn drop(&mut self) {
        self.shutdown();
    }
}
