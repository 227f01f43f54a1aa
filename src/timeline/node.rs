use std::rc::Rc;

use log::trace;

use crate::constants::{colors, depths, layout};
use crate::data::BattleEntry;
use crate::events::{Emitter, Event, ListenerId};
use crate::stage::{Handle, ObjectId, Rect, Stage};
use crate::surface::Surface;
use crate::text::TextStyle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    Idle,
    Hovered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeEventKind {
    HoverEnter,
    HoverExit,
    Click,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeEvent {
    HoverEnter(Rc<BattleEntry>),
    HoverExit(Rc<BattleEntry>),
    Click(Rc<BattleEntry>),
}

impl NodeEvent {
    pub fn entry(&self) -> &Rc<BattleEntry> {
        match self {
            NodeEvent::HoverEnter(e) | NodeEvent::HoverExit(e) | NodeEvent::Click(e) => e,
        }
    }
}

impl Event for NodeEvent {
    type Kind = NodeEventKind;

    fn kind(&self) -> NodeEventKind {
        match self {
            NodeEvent::HoverEnter(_) => NodeEventKind::HoverEnter,
            NodeEvent::HoverExit(_) => NodeEventKind::HoverExit,
            NodeEvent::Click(_) => NodeEventKind::Click,
        }
    }
}

/// One battle on the timeline: a gold disc with its year above and its
/// name below. Hovering lights it up; pointer down reports a click.
pub struct TimelineNode {
    entry: Rc<BattleEntry>,
    x: f32,
    y: f32,
    container: Handle,
    gfx: Handle,
    labels: [Handle; 2],
    state: NodeState,
    emitter: Emitter<NodeEvent>,
    destroyed: bool,
}

impl TimelineNode {
    pub fn new(stage: &mut Stage, x: f32, y: f32, entry: Rc<BattleEntry>) -> TimelineNode {
        let gfx = stage.graphics(0.0, 0.0);

        let year = stage.text(0.0, layout::TIMELINE_YEAR_OFFSET_Y, &entry.year.to_string(), TextStyle::sized(16.0, colors::GOLD));
        year.borrow_mut().set_origin(0.5, 0.5);
        let name = stage.text(0.0, layout::TIMELINE_NAME_OFFSET_Y, &entry.name, TextStyle::sized(14.0, colors::WHITE));
        name.borrow_mut().set_origin(0.5, 0.5);

        let container = stage.container(x, y);
        {
            let mut c = container.borrow_mut();
            c.add_child(gfx.clone());
            c.add_child(year.clone());
            c.add_child(name.clone());
            let side = layout::TIMELINE_GLOW_RADIUS * 2.0;
            c.set_depth(depths::TIMELINE).set_hit_area(Rect::centered(side, side));
        }
        stage.add(&container);

        let node = TimelineNode {
            entry,
            x,
            y,
            container,
            gfx,
            labels: [year, name],
            state: NodeState::Idle,
            emitter: Emitter::new(),
            destroyed: false,
        };
        node.draw();
        node
    }

    fn draw(&self) {
        let hovered = self.state == NodeState::Hovered;
        let mut obj = self.gfx.borrow_mut();
        let Some(g) = obj.graphics_mut() else { return };

        g.clear();
        if hovered {
            g.fill_style(colors::GOLD, 0.25);
            g.fill_circle(0.0, 0.0, layout::TIMELINE_GLOW_RADIUS);
        }
        g.fill_style(if hovered { colors::GOLD } else { colors::GOLD_DIM }, 1.0);
        g.fill_circle(0.0, 0.0, layout::TIMELINE_NODE_RADIUS);
        g.line_style(2.0, colors::WHITE, 0.6);
        g.stroke_circle(0.0, 0.0, layout::TIMELINE_NODE_RADIUS);
    }

    pub fn id(&self) -> ObjectId {
        self.container.borrow().id()
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn entry(&self) -> &Rc<BattleEntry> {
        &self.entry
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_hovered(&self) -> bool {
        self.state == NodeState::Hovered
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn graphics(&self) -> &Handle {
        &self.gfx
    }

    pub fn on<F>(&mut self, kind: NodeEventKind, listener: F) -> ListenerId
    where
        F: Fn(&NodeEvent) + 'static,
    {
        self.emitter.on(kind, listener)
    }

    pub fn off(&mut self, kind: NodeEventKind, id: ListenerId) -> bool {
        self.emitter.off(kind, id)
    }

    pub fn listener_count(&self) -> usize {
        self.emitter.total_listeners()
    }

    pub fn pointer_over(&mut self) {
        if self.destroyed || self.state == NodeState::Hovered {
            return;
        }
        trace!("hover enter {}", self.entry.year);
        self.state = NodeState::Hovered;
        self.draw();
        self.emitter.emit(&NodeEvent::HoverEnter(self.entry.clone()));
    }

    pub fn pointer_out(&mut self) {
        if self.destroyed || self.state == NodeState::Idle {
            return;
        }
        trace!("hover exit {}", self.entry.year);
        self.state = NodeState::Idle;
        self.draw();
        self.emitter.emit(&NodeEvent::HoverExit(self.entry.clone()));
    }

    pub fn pointer_down(&mut self) {
        if self.destroyed {
            return;
        }
        self.emitter.emit(&NodeEvent::Click(self.entry.clone()));
    }

    /// Release drawing objects and the hit area; remaining listeners are
    /// dropped. Pointer handlers are no-ops afterwards.
    pub fn destroy(&mut self, stage: &mut Stage) {
        if self.destroyed {
            return;
        }
        self.emitter.remove_all();
        stage.destroy(&self.gfx);
        for label in &self.labels {
            stage.destroy(label);
        }
        stage.destroy(&self.container);
        self.destroyed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::surface::Shape;

    fn grunwald() -> Rc<BattleEntry> {
        Rc::new(BattleEntry {
            year: 1410,
            name: "Grunwald".into(),
            description: "Bitwa pod Grunwaldem".into(),
        })
    }

    fn recorded(node: &mut TimelineNode) -> Rc<RefCell<Vec<(NodeEventKind, i32)>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in [NodeEventKind::HoverEnter, NodeEventKind::HoverExit, NodeEventKind::Click] {
            let l = log.clone();
            node.on(kind, move |ev| l.borrow_mut().push((ev.kind(), ev.entry().year)));
        }
        log
    }

    fn has_glow(node: &TimelineNode) -> bool {
        let mut obj = node.graphics().borrow_mut();
        obj.graphics_mut()
            .map(|g| g.commands().iter().any(|c| matches!(c, Shape::FillCircle { radius, .. } if *radius == layout::TIMELINE_GLOW_RADIUS)))
            .unwrap_or(false)
    }

    #[test]
    fn starts_idle_without_glow() {
        let mut stage = Stage::new();
        let node = TimelineNode::new(&mut stage, 120.0, 450.0, grunwald());
        assert_eq!(node.state(), NodeState::Idle);
        assert!(!has_glow(&node));
        assert_eq!(node.position(), (120.0, 450.0));
    }

    #[test]
    fn hover_cycle_emits_once_each() {
        let mut stage = Stage::new();
        let mut node = TimelineNode::new(&mut stage, 0.0, 0.0, grunwald());
        let log = recorded(&mut node);

        node.pointer_over();
        assert!(node.is_hovered());
        assert!(has_glow(&node));
        node.pointer_over();

        node.pointer_out();
        assert_eq!(node.state(), NodeState::Idle);
        assert!(!has_glow(&node));
        node.pointer_out();

        assert_eq!(*log.borrow(), vec![(NodeEventKind::HoverEnter, 1410), (NodeEventKind::HoverExit, 1410)]);
    }

    #[test]
    fn click_keeps_hover_state() {
        let mut stage = Stage::new();
        let mut node = TimelineNode::new(&mut stage, 0.0, 0.0, grunwald());
        let log = recorded(&mut node);

        node.pointer_down();
        assert_eq!(node.state(), NodeState::Idle);
        node.pointer_over();
        node.pointer_down();
        assert_eq!(node.state(), NodeState::Hovered);

        assert_eq!(
            *log.borrow(),
            vec![(NodeEventKind::Click, 1410), (NodeEventKind::HoverEnter, 1410), (NodeEventKind::Click, 1410)]
        );
    }

    #[test]
    fn hit_area_is_twice_the_glow_radius() {
        let mut stage = Stage::new();
        let node = TimelineNode::new(&mut stage, 300.0, 450.0, grunwald());
        let edge = layout::TIMELINE_GLOW_RADIUS - 1.0;
        assert_eq!(stage.hit_test(300.0 + edge, 450.0 - edge), Some(node.id()));
        assert_eq!(stage.hit_test(300.0 + layout::TIMELINE_GLOW_RADIUS + 1.0, 450.0), None);
    }

    #[test]
    fn destroyed_node_is_silent_and_off_stage() {
        let mut stage = Stage::new();
        let mut node = TimelineNode::new(&mut stage, 0.0, 0.0, grunwald());
        let log = recorded(&mut node);

        node.destroy(&mut stage);
        assert!(stage.is_empty());
        assert_eq!(node.listener_count(), 0);
        assert_eq!(stage.hit_test(0.0, 0.0), None);

        node.pointer_over();
        node.pointer_down();
        assert!(log.borrow().is_empty());
        node.destroy(&mut stage);
    }
}
