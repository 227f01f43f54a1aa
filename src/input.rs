use crate::stage::{ObjectId, Stage};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    /// Host timestamp in milliseconds.
    pub time: f64,
}

impl Pointer {
    pub fn new(x: f32, y: f32, time: f64) -> Pointer {
        Pointer { x, y, time }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Over(ObjectId),
    Out(ObjectId),
    Down(ObjectId),
    Move(Pointer),
}

/// Turns raw pointer positions into over/out/down events for the top-most
/// interactive object, one object hovered at a time.
#[derive(Debug, Default)]
pub struct PointerTracker {
    over: Option<ObjectId>,
    last: Pointer,
}

impl PointerTracker {
    pub fn new() -> PointerTracker {
        PointerTracker::default()
    }

    pub fn current(&self) -> Option<ObjectId> {
        self.over
    }

    pub fn position(&self) -> Pointer {
        self.last
    }

    fn retarget(&mut self, target: Option<ObjectId>, out: &mut Vec<PointerEvent>) {
        if target == self.over {
            return;
        }
        if let Some(old) = self.over.take() {
            out.push(PointerEvent::Out(old));
        }
        if let Some(new) = target {
            out.push(PointerEvent::Over(new));
        }
        self.over = target;
    }

    pub fn pointer_move(&mut self, stage: &Stage, pointer: Pointer) -> Vec<PointerEvent> {
        self.last = pointer;
        let mut events = Vec::new();
        self.retarget(stage.hit_test(pointer.x, pointer.y), &mut events);
        events.push(PointerEvent::Move(pointer));
        events
    }

    pub fn pointer_down(&mut self, stage: &Stage, pointer: Pointer) -> Vec<PointerEvent> {
        self.last = pointer;
        let mut events = Vec::new();
        let target = stage.hit_test(pointer.x, pointer.y);
        self.retarget(target, &mut events);
        if let Some(id) = target {
            events.push(PointerEvent::Down(id));
        }
        events
    }

    /// Pointer left the canvas.
    pub fn pointer_leave(&mut self) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        self.retarget(None, &mut events);
        events
    }

    /// Re-run the hit test at the last position after the display list
    /// changed underneath a still pointer.
    pub fn refresh(&mut self, stage: &Stage) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        self.retarget(stage.hit_test(self.last.x, self.last.y), &mut events);
        events
    }
}
