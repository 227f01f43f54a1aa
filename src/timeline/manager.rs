use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info, warn};

use super::node::{NodeEventKind, TimelineNode};
use super::tooltip::Tooltip;
use super::node_positions;
use crate::constants::{colors, depths, layout};
use crate::data::BattleEntry;
use crate::events::ListenerId;
use crate::input::Pointer;
use crate::stage::{Handle, ObjectId, Stage};
use crate::surface::Surface;
use crate::text::TextMetrics;

/// Receives the battle a node was clicked for.
pub type ClickCallback = Rc<dyn Fn(&Rc<BattleEntry>)>;

struct NodeListeners {
    hover_enter: ListenerId,
    hover_exit: ListenerId,
    click: ListenerId,
}

/// What a node event does to the timeline. Shared between the manager's
/// own entry points and the listeners it subscribes on every node.
struct Reactions {
    tooltip: RefCell<Tooltip>,
    on_click: Option<ClickCallback>,
}

impl Reactions {
    fn hover_enter(&self, entry: &BattleEntry) {
        self.tooltip.borrow_mut().show(&entry.description);
    }

    fn hover_exit(&self) {
        self.tooltip.borrow_mut().hide();
    }

    fn click(&self, entry: &Rc<BattleEntry>) {
        if let Some(cb) = &self.on_click {
            cb(entry);
        }
    }
}

/// Lays battles out along the track, owns the shared tooltip and forwards
/// clicks to whoever created it.
pub struct TimelineManager {
    nodes: Vec<TimelineNode>,
    listeners: HashMap<ObjectId, NodeListeners>,
    track: Handle,
    reactions: Rc<Reactions>,
    screen_width: f32,
    destroyed: bool,
}

impl TimelineManager {
    pub fn new(
        stage: &mut Stage,
        metrics: Rc<dyn TextMetrics>,
        screen_width: f32,
        on_click: Option<ClickCallback>,
    ) -> TimelineManager {
        let track = stage.graphics(0.0, 0.0);
        track.borrow_mut().set_depth(depths::TIMELINE);
        stage.add(&track);
        let tooltip = Tooltip::new(stage, metrics, screen_width);

        TimelineManager {
            nodes: Vec::new(),
            listeners: HashMap::new(),
            track,
            reactions: Rc::new(Reactions { tooltip: RefCell::new(tooltip), on_click }),
            screen_width,
            destroyed: false,
        }
    }

    /// Draw the track and place one node per entry. Building again replaces
    /// the previous nodes.
    pub fn build(&mut self, stage: &mut Stage, entries: &[BattleEntry]) {
        if self.destroyed {
            warn!("timeline build after teardown ignored");
            return;
        }
        self.detach_nodes(stage);

        let y = layout::TIMELINE_Y;
        let x_start = layout::TIMELINE_PADDING_X;
        let x_end = self.screen_width - layout::TIMELINE_PADDING_X;
        self.draw_track(x_start, x_end, y);

        for (entry, x) in entries.iter().zip(node_positions(entries.len(), x_start, x_end)) {
            let mut node = TimelineNode::new(stage, x, y, Rc::new(entry.clone()));

            let r = self.reactions.clone();
            let hover_enter = node.on(NodeEventKind::HoverEnter, move |ev| r.hover_enter(ev.entry()));
            let r = self.reactions.clone();
            let hover_exit = node.on(NodeEventKind::HoverExit, move |_| r.hover_exit());
            let r = self.reactions.clone();
            let click = node.on(NodeEventKind::Click, move |ev| r.click(ev.entry()));

            self.listeners.insert(node.id(), NodeListeners { hover_enter, hover_exit, click });
            self.nodes.push(node);
        }
        debug!("timeline built with {} nodes", self.nodes.len());
    }

    fn draw_track(&self, x_start: f32, x_end: f32, y: f32) {
        let mut obj = self.track.borrow_mut();
        let Some(g) = obj.graphics_mut() else { return };
        let h = layout::TIMELINE_TRACK_HEIGHT;
        g.clear();
        g.fill_style(colors::DARK_WOOD, 1.0);
        g.fill_rect(x_start, y - h / 2.0, x_end - x_start, h);
        g.line_style(1.0, colors::GOLD, 0.4);
        g.stroke_rect(x_start, y - h / 2.0, x_end - x_start, h);
    }

    /// Unsubscribe and destroy every node.
    fn detach_nodes(&mut self, stage: &mut Stage) {
        for mut node in self.nodes.drain(..) {
            if let Some(l) = self.listeners.remove(&node.id()) {
                node.off(NodeEventKind::HoverEnter, l.hover_enter);
                node.off(NodeEventKind::HoverExit, l.hover_exit);
                node.off(NodeEventKind::Click, l.click);
            }
            node.destroy(stage);
        }
        self.listeners.clear();
    }

    /// Show the entry's description in the tooltip.
    pub fn on_hover_enter(&self, entry: &BattleEntry) {
        self.reactions.hover_enter(entry);
    }

    pub fn on_hover_exit(&self) {
        self.reactions.hover_exit();
    }

    /// Forward to the click callback, if one was given.
    pub fn on_click(&self, entry: &Rc<BattleEntry>) {
        self.reactions.click(entry);
    }

    /// Per pointer-move update; keeps the visible tooltip next to the pointer.
    pub fn update(&self, pointer: Pointer) {
        self.reactions.tooltip.borrow_mut().follow(pointer);
    }

    fn node_mut(&mut self, id: ObjectId) -> Option<&mut TimelineNode> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    /// Route pointer input for stage object `id`; false when it is not one
    /// of this timeline's nodes.
    pub fn pointer_over(&mut self, id: ObjectId) -> bool {
        self.node_mut(id).map(TimelineNode::pointer_over).is_some()
    }

    pub fn pointer_out(&mut self, id: ObjectId) -> bool {
        self.node_mut(id).map(TimelineNode::pointer_out).is_some()
    }

    pub fn pointer_down(&mut self, id: ObjectId) -> bool {
        self.node_mut(id).map(TimelineNode::pointer_down).is_some()
    }

    pub fn nodes(&self) -> &[TimelineNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [TimelineNode] {
        &mut self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn entries(&self) -> Vec<Rc<BattleEntry>> {
        self.nodes.iter().map(|n| n.entry().clone()).collect()
    }

    pub fn subscription_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn tooltip(&self) -> Ref<'_, Tooltip> {
        self.reactions.tooltip.borrow()
    }

    pub fn track(&self) -> &Handle {
        &self.track
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Release every node, listener, the track and the tooltip. Returns
    /// false (and does nothing) when already torn down.
    pub fn teardown(&mut self, stage: &mut Stage) -> bool {
        if self.destroyed {
            warn!("timeline teardown called twice");
            return false;
        }
        let count = self.nodes.len();
        self.detach_nodes(stage);
        stage.destroy(&self.track);
        self.reactions.tooltip.borrow_mut().destroy(stage);
        self.destroyed = true;
        info!("timeline torn down ({} nodes)", count);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Shape;
    use crate::text::MonospaceMetrics;
    use crate::timeline::tooltip::clamp_x;

    fn battles() -> Vec<BattleEntry> {
        crate::data::default_battles().unwrap()
    }

    fn manager(stage: &mut Stage, on_click: Option<ClickCallback>) -> TimelineManager {
        TimelineManager::new(stage, Rc::new(MonospaceMetrics::default()), 1280.0, on_click)
    }

    #[test]
    fn places_three_battles_across_the_track() {
        let mut stage = Stage::new();
        let mut tl = manager(&mut stage, None);
        tl.build(&mut stage, &battles());

        let xs: Vec<f32> = tl.nodes().iter().map(|n| n.position().0).collect();
        assert_eq!(xs, vec![120.0, 640.0, 1160.0]);
        assert!(tl.nodes().iter().all(|n| n.position().1 == layout::TIMELINE_Y));
        assert_eq!(tl.subscription_count(), 3);
        assert!(tl.nodes().iter().all(|n| n.listener_count() == 3));
    }

    #[test]
    fn track_spans_padding_to_padding() {
        let mut stage = Stage::new();
        let mut tl = manager(&mut stage, None);
        tl.build(&mut stage, &battles());

        let mut track = tl.track().borrow_mut();
        let g = track.graphics_mut().unwrap();
        assert!(g.commands().iter().any(|c| matches!(
            c,
            Shape::FillRect { x, w, .. } if *x == 120.0 && *w == 1040.0
        )));
    }

    #[test]
    fn empty_list_builds_bare_track() {
        let mut stage = Stage::new();
        let mut tl = manager(&mut stage, None);
        tl.build(&mut stage, &[]);
        assert_eq!(tl.node_count(), 0);
        assert!(!tl.track().borrow_mut().graphics_mut().unwrap().is_empty());
    }

    #[test]
    fn single_battle_sits_mid_track() {
        let mut stage = Stage::new();
        let mut tl = manager(&mut stage, None);
        tl.build(&mut stage, &battles()[..1]);
        assert_eq!(tl.nodes()[0].position().0, 640.0);
    }

    #[test]
    fn hover_shows_description_and_exit_hides_it() {
        let mut stage = Stage::new();
        let mut tl = manager(&mut stage, None);
        tl.build(&mut stage, &battles());
        let id = tl.nodes()[2].id();

        assert!(tl.pointer_over(id));
        assert!(tl.tooltip().is_visible());
        assert!(tl.tooltip().content().starts_with("Odsiecz"));

        assert!(tl.pointer_out(id));
        assert!(!tl.tooltip().is_visible());
        assert!(tl.tooltip().content().starts_with("Odsiecz"));
        assert!(!tl.pointer_over(9999));
    }

    #[test]
    fn click_reaches_callback_with_entry() {
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let c = clicked.clone();
        let cb: ClickCallback = Rc::new(move |e| c.borrow_mut().push(e.year));

        let mut stage = Stage::new();
        let mut tl = manager(&mut stage, Some(cb));
        tl.build(&mut stage, &battles());
        let id = tl.nodes()[0].id();
        tl.pointer_down(id);
        assert_eq!(*clicked.borrow(), vec![1410]);
    }

    #[test]
    fn click_without_callback_is_harmless() {
        let mut stage = Stage::new();
        let mut tl = manager(&mut stage, None);
        tl.build(&mut stage, &battles());
        let id = tl.nodes()[1].id();
        assert!(tl.pointer_down(id));
    }

    #[test]
    fn hover_entry_points_drive_the_tooltip_directly() {
        let mut stage = Stage::new();
        let mut tl = manager(&mut stage, None);
        tl.build(&mut stage, &battles());
        let entries = tl.entries();

        tl.update(Pointer::new(1160.0, 450.0, 0.0));
        tl.on_hover_enter(&entries[0]);
        tl.on_hover_enter(&entries[2]);
        assert!(tl.tooltip().is_visible());
        assert!(tl.tooltip().content().contains("Sobieski"));
        let (w, _) = tl.tooltip().size();
        assert!(tl.tooltip().position().0 + w <= 1280.0 - 8.0 + 1e-3);

        tl.on_hover_exit();
        assert!(!tl.tooltip().is_visible());
        assert!(tl.tooltip().content().contains("Sobieski"));
    }

    #[test]
    fn on_click_forwards_to_callback() {
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let c = clicked.clone();
        let cb: ClickCallback = Rc::new(move |e| c.borrow_mut().push(e.year));

        let mut stage = Stage::new();
        let mut tl = manager(&mut stage, Some(cb));
        tl.build(&mut stage, &battles());
        let entries = tl.entries();
        tl.on_click(&entries[1]);
        assert_eq!(*clicked.borrow(), vec![1655]);

        let mut silent = manager(&mut stage, None);
        silent.on_click(&entries[1]);
        assert_eq!(clicked.borrow().len(), 1);
    }

    #[test]
    fn switching_nodes_without_moving_keeps_tooltip_on_screen() {
        let mut stage = Stage::new();
        let mut tl = manager(&mut stage, None);
        tl.build(&mut stage, &battles());
        let (grunwald, wieden) = (tl.nodes()[0].id(), tl.nodes()[2].id());

        tl.pointer_over(grunwald);
        tl.update(Pointer::new(1270.0, 450.0, 0.0));
        tl.pointer_out(grunwald);
        tl.pointer_over(wieden);

        let (w, _) = tl.tooltip().size();
        assert_eq!(tl.tooltip().position().0, clamp_x(1270.0, w, 1280.0, 8.0));
    }

    #[test]
    fn tooltip_follows_pointer_and_stays_on_screen() {
        let mut stage = Stage::new();
        let mut tl = manager(&mut stage, None);
        tl.build(&mut stage, &battles());
        let id = tl.nodes()[0].id();
        tl.pointer_over(id);

        let (w, _) = tl.tooltip().size();
        for px in [-5000.0, 0.0, 120.0, 640.0, 1280.0, 99_999.0] {
            tl.update(Pointer::new(px, 450.0, 0.0));
            let (x, _) = tl.tooltip().position();
            assert!(x >= 8.0 && x <= 1280.0 - w - 8.0, "x={} for pointer {}", x, px);
        }
    }

    #[test]
    fn rebuild_does_not_double_fire() {
        let clicked = Rc::new(RefCell::new(0));
        let c = clicked.clone();
        let cb: ClickCallback = Rc::new(move |_| *c.borrow_mut() += 1);

        let mut stage = Stage::new();
        let mut tl = manager(&mut stage, Some(cb));
        tl.build(&mut stage, &battles());
        let objects = stage.len();
        tl.build(&mut stage, &battles());
        assert_eq!(stage.len(), objects);
        assert_eq!(tl.subscription_count(), 3);

        let id = tl.nodes()[0].id();
        tl.pointer_down(id);
        assert_eq!(*clicked.borrow(), 1);
    }

    #[test]
    fn teardown_releases_everything_once() {
        let mut stage = Stage::new();
        let mut tl = manager(&mut stage, None);
        tl.build(&mut stage, &battles());
        let (x, y) = tl.nodes()[1].position();

        assert!(tl.teardown(&mut stage));
        assert!(stage.is_empty());
        assert_eq!(tl.node_count(), 0);
        assert_eq!(tl.subscription_count(), 0);
        assert_eq!(stage.hit_test(x, y), None);

        assert!(!tl.teardown(&mut stage));
        tl.build(&mut stage, &battles());
        assert_eq!(tl.node_count(), 0);
    }
}
