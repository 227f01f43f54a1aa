use std::rc::Rc;

use crate::constants::{colors, depths, layout};
use crate::input::Pointer;
use crate::stage::{Handle, Stage};
use crate::surface::Surface;
use crate::text::{TextMetrics, TextStyle};

/// Left edge for a tooltip of `width` centered on `pointer_x`, kept
/// `margin` away from both screen edges. When the tooltip is wider than the
/// screen allows, the left margin wins.
pub fn clamp_x(pointer_x: f32, width: f32, screen_width: f32, margin: f32) -> f32 {
    let max = screen_width - width - margin;
    (pointer_x - width / 2.0).min(max).max(margin)
}

fn style() -> TextStyle {
    TextStyle::sized(13.0, colors::GOLD)
}

/// The single description box shared by every timeline node.
pub struct Tooltip {
    container: Handle,
    bg: Handle,
    text: Handle,
    metrics: Rc<dyn TextMetrics>,
    screen_width: f32,
    /// Content the cached size was measured for.
    measured_for: Option<String>,
    width: f32,
    height: f32,
    /// Last pointer seen, visible or not.
    pointer: Option<Pointer>,
}

impl Tooltip {
    pub fn new(stage: &mut Stage, metrics: Rc<dyn TextMetrics>, screen_width: f32) -> Tooltip {
        let pad = layout::TIMELINE_TOOLTIP_PADDING;
        let bg = stage.graphics(0.0, 0.0);
        let text = stage.text(pad, pad, "", style());
        let container = stage.container(0.0, 0.0);
        {
            let mut c = container.borrow_mut();
            c.add_child(bg.clone());
            c.add_child(text.clone());
            c.set_depth(depths::TOOLTIP).set_visible(false);
        }
        stage.add(&container);

        Tooltip {
            container,
            bg,
            text,
            metrics,
            screen_width,
            measured_for: None,
            width: 0.0,
            height: 0.0,
            pointer: None,
        }
    }

    /// Show `content`. The panel is measured and redrawn only when the
    /// content differs from what the cached size belongs to, and it is
    /// placed against the last known pointer using that size.
    pub fn show(&mut self, content: &str) {
        if self.measured_for.as_deref() != Some(content) {
            self.text.borrow_mut().set_text(content);
            let pad = layout::TIMELINE_TOOLTIP_PADDING;
            let measured = crate::text::layout(content, &style(), self.metrics.as_ref());
            self.width = measured.width + pad * 2.0;
            self.height = measured.height + pad * 2.0;
            self.measured_for = Some(content.to_string());
            self.redraw();
        }
        self.container.borrow_mut().set_visible(true);
        if let Some(pointer) = self.pointer {
            self.place(pointer);
        }
    }

    fn redraw(&self) {
        let mut obj = self.bg.borrow_mut();
        let Some(g) = obj.graphics_mut() else { return };
        let r = layout::TIMELINE_TOOLTIP_RADIUS;
        g.clear();
        g.fill_style(colors::TOOLTIP_BG, 0.92);
        g.fill_rounded_rect(0.0, 0.0, self.width, self.height, r);
        g.line_style(1.0, colors::GOLD, 0.6);
        g.stroke_rounded_rect(0.0, 0.0, self.width, self.height, r);
    }

    /// Hide; the content stays for the next show.
    pub fn hide(&mut self) {
        self.container.borrow_mut().set_visible(false);
    }

    /// Track the pointer. Only a visible tooltip moves; a hidden one just
    /// remembers where to appear.
    pub fn follow(&mut self, pointer: Pointer) {
        self.pointer = Some(pointer);
        if self.is_visible() {
            self.place(pointer);
        }
    }

    fn place(&self, pointer: Pointer) {
        let x = clamp_x(pointer.x, self.width, self.screen_width, layout::TIMELINE_TOOLTIP_MARGIN);
        let y = pointer.y + layout::TIMELINE_TOOLTIP_OFFSET_Y;
        self.container.borrow_mut().set_position(x, y);
    }

    pub fn is_visible(&self) -> bool {
        self.container.borrow().visible
    }

    pub fn content(&self) -> String {
        self.text.borrow().text().map(|t| t.content.clone()).unwrap_or_default()
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn position(&self) -> (f32, f32) {
        let c = self.container.borrow();
        (c.x, c.y)
    }

    pub fn background(&self) -> &Handle {
        &self.bg
    }

    pub fn destroy(&mut self, stage: &mut Stage) {
        stage.destroy(&self.bg);
        stage.destroy(&self.text);
        stage.destroy(&self.container);
        self.measured_for = None;
    }
}
