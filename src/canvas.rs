// --- CANVAS BACKEND ---
//
// Browser side of the drawing layer. `CanvasSurface` plays recorded
// `Graphics` onto a 2d context, `CanvasMetrics` asks the browser for text
// widths and `CanvasRenderer` walks the stage every frame.

use std::collections::HashMap;
use std::f64::consts::TAU;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, ImageData};

use crate::error::{MenuError, Result};
use crate::stage::{DisplayObject, ObjectKind, Stage, Text};
use crate::surface::{css_rgba, PixelBuffer, Surface};
use crate::text::{spaced_width, Align, MonospaceMetrics, TextMetrics, TextStyle};
use crate::textures::TextureRegistry;

fn logged(op: &str, result: std::result::Result<(), JsValue>) {
    if let Err(err) = result {
        warn!("canvas {} failed: {:?}", op, err);
    }
}

pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> CanvasSurface<'a> {
        CanvasSurface { ctx }
    }

    fn rounded_path(&self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        let (x, y, w, h) = (x as f64, y as f64, w as f64, h as f64);
        let r = (radius as f64).min(w / 2.0).min(h / 2.0).max(0.0);
        let ctx = self.ctx;
        ctx.begin_path();
        ctx.move_to(x + r, y);
        logged("arc_to", ctx.arc_to(x + w, y, x + w, y + h, r));
        logged("arc_to", ctx.arc_to(x + w, y + h, x, y + h, r));
        logged("arc_to", ctx.arc_to(x, y + h, x, y, r));
        logged("arc_to", ctx.arc_to(x, y, x + w, y, r));
        ctx.close_path();
    }

    fn circle_path(&self, x: f32, y: f32, radius: f32) {
        self.ctx.begin_path();
        logged("arc", self.ctx.arc(x as f64, y as f64, radius.max(0.0) as f64, 0.0, TAU));
    }
}

impl<'a> Surface for CanvasSurface<'a> {
    fn clear(&mut self) {
        if let Some(canvas) = self.ctx.canvas() {
            self.ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        }
    }

    fn fill_style(&mut self, color: u32, alpha: f32) {
        self.ctx.set_fill_style_str(&css_rgba(color, alpha));
    }

    fn line_style(&mut self, width: f32, color: u32, alpha: f32) {
        self.ctx.set_line_width(width as f64);
        self.ctx.set_stroke_style_str(&css_rgba(color, alpha));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.stroke_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.circle_path(x, y, radius);
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.circle_path(x, y, radius);
        self.ctx.stroke();
    }

    fn fill_ellipse(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.begin_path();
        let (rx, ry) = ((w / 2.0).max(0.0) as f64, (h / 2.0).max(0.0) as f64);
        logged("ellipse", self.ctx.ellipse(x as f64, y as f64, rx, ry, 0.0, 0.0, TAU));
        self.ctx.fill();
    }

    fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        self.rounded_path(x, y, w, h, radius);
        self.ctx.fill();
    }

    fn stroke_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        self.rounded_path(x, y, w, h, radius);
        self.ctx.stroke();
    }
}

/// Text widths measured by the browser with the style's font. Falls back to
/// a monospace estimate when measuring fails.
pub struct CanvasMetrics {
    ctx: CanvasRenderingContext2d,
    fallback: MonospaceMetrics,
}

impl CanvasMetrics {
    pub fn new(ctx: CanvasRenderingContext2d) -> CanvasMetrics {
        CanvasMetrics { ctx, fallback: MonospaceMetrics::default() }
    }
}

impl TextMetrics for CanvasMetrics {
    fn line_width(&self, line: &str, style: &TextStyle) -> f32 {
        self.ctx.set_font(&style.font());
        match self.ctx.measure_text(line) {
            Ok(m) => m.width() as f32,
            Err(_) => self.fallback.line_width(line, style),
        }
    }
}

/// Draws a stage onto the page canvas. Generated textures are uploaded once
/// into offscreen canvases and reused.
pub struct CanvasRenderer {
    document: Document,
    ctx: CanvasRenderingContext2d,
    metrics: Rc<dyn TextMetrics>,
    textures: HashMap<String, HtmlCanvasElement>,
}

impl CanvasRenderer {
    pub fn new(document: Document, ctx: CanvasRenderingContext2d, metrics: Rc<dyn TextMetrics>) -> CanvasRenderer {
        CanvasRenderer { document, ctx, metrics, textures: HashMap::new() }
    }

    pub fn render(&mut self, stage: &Stage, registry: &TextureRegistry, background: u32) -> Result<()> {
        let mut surface = CanvasSurface::new(&self.ctx);
        surface.clear();
        if let Some(canvas) = self.ctx.canvas() {
            surface.fill_style(background, 1.0);
            surface.fill_rect(0.0, 0.0, canvas.width() as f32, canvas.height() as f32);
        }

        for handle in stage.display_list() {
            self.draw_object(&handle.borrow(), registry)?;
        }
        Ok(())
    }

    fn draw_object(&mut self, obj: &DisplayObject, registry: &TextureRegistry) -> Result<()> {
        if !obj.visible || obj.is_destroyed() {
            return Ok(());
        }
        self.ctx.save();
        let drawn = self.draw_transformed(obj, registry);
        self.ctx.restore();
        drawn
    }

    fn draw_transformed(&mut self, obj: &DisplayObject, registry: &TextureRegistry) -> Result<()> {
        self.ctx.translate(obj.x as f64, obj.y as f64)?;
        if obj.scale != 1.0 {
            self.ctx.scale(obj.scale as f64, obj.scale as f64)?;
        }

        match obj.kind() {
            ObjectKind::Graphics(g) => g.replay(&mut CanvasSurface::new(&self.ctx)),
            ObjectKind::Text(t) => self.draw_text(t)?,
            ObjectKind::Image(key) => {
                if let Some(texture) = self.texture(key, registry)? {
                    let (w, h) = (texture.width() as f64, texture.height() as f64);
                    self.ctx.draw_image_with_html_canvas_element(&texture, -w / 2.0, -h / 2.0)?;
                }
            }
            ObjectKind::Container(children) => {
                for child in children {
                    self.draw_object(&child.borrow(), registry)?;
                }
            }
        }
        Ok(())
    }

    fn draw_text(&self, text: &Text) -> Result<()> {
        let style = &text.style;
        let layout = text.layout(self.metrics.as_ref());
        let ctx = &self.ctx;

        ctx.set_font(&style.font());
        ctx.set_text_baseline("top");
        ctx.set_text_align("left");
        if let Some(shadow) = style.shadow {
            ctx.set_shadow_color(&css_rgba(shadow.color, 1.0));
            ctx.set_shadow_blur(shadow.blur as f64);
            ctx.set_shadow_offset_x(shadow.offset_x as f64);
            ctx.set_shadow_offset_y(shadow.offset_y as f64);
        }
        if let Some((color, thickness)) = style.stroke {
            ctx.set_stroke_style_str(&css_rgba(color, 1.0));
            ctx.set_line_width(thickness as f64);
        }
        ctx.set_fill_style_str(&css_rgba(style.color, 1.0));

        let left = -text.origin.0 * layout.width;
        let top = -text.origin.1 * layout.height;
        for (i, line) in layout.lines.iter().enumerate() {
            let line_width = spaced_width(line, style, self.metrics.as_ref());
            let x = match style.align {
                Align::Left => left,
                Align::Center => left + (layout.width - line_width) / 2.0,
            };
            let y = top + i as f32 * layout.line_height;

            if style.letter_spacing == 0.0 {
                self.put_text(line, x, y, style.stroke.is_some())?;
                continue;
            }
            // No portable canvas letter-spacing, so place glyphs one by one
            let mut cursor = x;
            let mut glyph = [0u8; 4];
            for ch in line.chars() {
                let s: &str = ch.encode_utf8(&mut glyph);
                self.put_text(s, cursor, y, style.stroke.is_some())?;
                cursor += self.metrics.line_width(s, style) + style.letter_spacing;
            }
        }
        Ok(())
    }

    fn put_text(&self, s: &str, x: f32, y: f32, stroke: bool) -> Result<()> {
        if stroke {
            self.ctx.stroke_text(s, x as f64, y as f64)?;
        }
        self.ctx.fill_text(s, x as f64, y as f64)?;
        Ok(())
    }

    fn texture(&mut self, key: &str, registry: &TextureRegistry) -> Result<Option<HtmlCanvasElement>> {
        if let Some(canvas) = self.textures.get(key) {
            return Ok(Some(canvas.clone()));
        }
        let Some(buffer) = registry.get(key) else {
            return Ok(None);
        };
        let canvas = self.upload(buffer)?;
        debug!("uploaded texture {} ({}x{})", key, buffer.width, buffer.height);
        self.textures.insert(key.to_string(), canvas.clone());
        Ok(Some(canvas))
    }

    fn upload(&self, buffer: &PixelBuffer) -> Result<HtmlCanvasElement> {
        let canvas = self
            .document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| MenuError::host("created element is not a canvas"))?;
        canvas.set_width(buffer.width);
        canvas.set_height(buffer.height);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| MenuError::host("offscreen canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| MenuError::host("offscreen context is not 2d"))?;
        let image_data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&buffer.pixels), buffer.width, buffer.height)?;
        ctx.put_image_data(&image_data, 0.0, 0.0)?;
        Ok(canvas)
    }
}
