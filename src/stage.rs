use std::cell::RefCell;
use std::rc::Rc;

use crate::surface::{Graphics, Surface};
use crate::text::{layout, TextLayout, TextMetrics, TextStyle};

pub type ObjectId = u32;
pub type Handle = Rc<RefCell<DisplayObject>>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect { x, y, w, h }
    }

    /// Rectangle of the given size centered on the local origin.
    pub fn centered(w: f32, h: f32) -> Rect {
        Rect { x: -w / 2.0, y: -h / 2.0, w, h }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    pub content: String,
    pub style: TextStyle,
    /// Normalized anchor; (0.5, 0.5) centers the text on the object position.
    pub origin: (f32, f32),
}

impl Text {
    pub fn layout(&self, metrics: &dyn TextMetrics) -> TextLayout {
        layout(&self.content, &self.style, metrics)
    }
}

pub enum ObjectKind {
    Graphics(Graphics),
    Text(Text),
    /// Texture key in the registry.
    Image(String),
    Container(Vec<Handle>),
}

pub struct DisplayObject {
    id: ObjectId,
    pub x: f32,
    pub y: f32,
    pub depth: i32,
    pub visible: bool,
    pub scale: f32,
    pub hit_area: Option<Rect>,
    kind: ObjectKind,
    destroyed: bool,
}

impl DisplayObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn set_position(&mut self, x: f32, y: f32) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn set_depth(&mut self, depth: i32) -> &mut Self {
        self.depth = depth;
        self
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.visible = visible;
        self
    }

    pub fn set_scale(&mut self, scale: f32) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn set_hit_area(&mut self, area: Rect) -> &mut Self {
        self.hit_area = Some(area);
        self
    }

    pub fn graphics_mut(&mut self) -> Option<&mut Graphics> {
        match &mut self.kind {
            ObjectKind::Graphics(g) => Some(g),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&Text> {
        match &self.kind {
            ObjectKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn set_text(&mut self, content: &str) -> &mut Self {
        if let ObjectKind::Text(t) = &mut self.kind {
            t.content.clear();
            t.content.push_str(content);
        }
        self
    }

    pub fn set_origin(&mut self, ox: f32, oy: f32) -> &mut Self {
        if let ObjectKind::Text(t) = &mut self.kind {
            t.origin = (ox, oy);
        }
        self
    }

    pub fn set_texture(&mut self, key: &str) -> &mut Self {
        if let ObjectKind::Image(current) = &mut self.kind {
            if current.as_str() != key {
                current.clear();
                current.push_str(key);
            }
        }
        self
    }

    pub fn texture(&self) -> Option<&str> {
        match &self.kind {
            ObjectKind::Image(key) => Some(key),
            _ => None,
        }
    }

    pub fn add_child(&mut self, child: Handle) {
        if let ObjectKind::Container(children) = &mut self.kind {
            children.push(child);
        }
    }

    pub fn children(&self) -> &[Handle] {
        match &self.kind {
            ObjectKind::Container(children) => children,
            _ => &[],
        }
    }

    /// Drop drawing data and children; the object stops rendering and
    /// stops receiving pointer input.
    fn release(&mut self) {
        match &mut self.kind {
            ObjectKind::Graphics(g) => g.clear(),
            ObjectKind::Text(t) => t.content.clear(),
            ObjectKind::Image(key) => key.clear(),
            ObjectKind::Container(children) => {
                for child in children.drain(..) {
                    child.borrow_mut().release();
                }
            }
        }
        self.hit_area = None;
        self.visible = false;
        self.destroyed = true;
    }
}

/// Display list for one screen. Objects are created detached and become
/// visible once added at the top level or attached to an added container.
pub struct Stage {
    objects: Vec<Handle>,
    next_id: ObjectId,
}

impl Default for Stage {
    fn default() -> Self {
        Stage::new()
    }
}

impl Stage {
    pub fn new() -> Stage {
        Stage { objects: Vec::new(), next_id: 1 }
    }

    fn create(&mut self, x: f32, y: f32, kind: ObjectKind) -> Handle {
        let id = self.next_id;
        self.next_id += 1;
        Rc::new(RefCell::new(DisplayObject {
            id,
            x,
            y,
            depth: 0,
            visible: true,
            scale: 1.0,
            hit_area: None,
            kind,
            destroyed: false,
        }))
    }

    pub fn graphics(&mut self, x: f32, y: f32) -> Handle {
        self.create(x, y, ObjectKind::Graphics(Graphics::new()))
    }

    pub fn text(&mut self, x: f32, y: f32, content: &str, style: TextStyle) -> Handle {
        let text = Text { content: content.to_string(), style, origin: (0.0, 0.0) };
        self.create(x, y, ObjectKind::Text(text))
    }

    pub fn image(&mut self, x: f32, y: f32, key: &str) -> Handle {
        self.create(x, y, ObjectKind::Image(key.to_string()))
    }

    pub fn container(&mut self, x: f32, y: f32) -> Handle {
        self.create(x, y, ObjectKind::Container(Vec::new()))
    }

    /// Put an object on the display list.
    pub fn add(&mut self, handle: &Handle) {
        if !self.objects.iter().any(|h| Rc::ptr_eq(h, handle)) {
            self.objects.push(handle.clone());
        }
    }

    /// Remove an object from the display list and release its resources.
    /// Returns false when it was already destroyed.
    pub fn destroy(&mut self, handle: &Handle) -> bool {
        self.objects.retain(|h| !Rc::ptr_eq(h, handle));
        let mut obj = handle.borrow_mut();
        if obj.destroyed {
            return false;
        }
        obj.release();
        true
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn find(&self, id: ObjectId) -> Option<Handle> {
        self.objects.iter().find(|h| h.borrow().id == id).cloned()
    }

    /// Top-level objects in draw order (depth, then insertion).
    pub fn display_list(&self) -> Vec<Handle> {
        let mut list = self.objects.clone();
        list.sort_by_key(|h| h.borrow().depth);
        list
    }

    /// Top-most visible object with a hit area containing the point.
    pub fn hit_test(&self, px: f32, py: f32) -> Option<ObjectId> {
        let mut best: Option<(i32, ObjectId)> = None;
        for handle in &self.objects {
            let obj = handle.borrow();
            if !obj.visible || obj.destroyed {
                continue;
            }
            let Some(area) = obj.hit_area else { continue };
            let world = Rect {
                x: obj.x + area.x * obj.scale,
                y: obj.y + area.y * obj.scale,
                w: area.w * obj.scale,
                h: area.h * obj.scale,
            };
            if !world.contains(px, py) {
                continue;
            }
            // Later objects win ties, same as they draw on top
            if best.map_or(true, |(depth, _)| obj.depth >= depth) {
                best = Some((obj.depth, obj.id));
            }
        }
        best.map(|(_, id)| id)
    }
}
