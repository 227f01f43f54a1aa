// --- DRAWING SURFACES ---
//
// `Surface` is the drawing vocabulary shared by every sprite and widget.
// `Graphics` records calls so a display object can be replayed onto the
// canvas each frame; `PixelBuffer` rasterizes them into RGBA textures.

pub fn rgb(color: u32) -> (u8, u8, u8) {
    (((color >> 16) & 0xff) as u8, ((color >> 8) & 0xff) as u8, (color & 0xff) as u8)
}

pub fn css_rgba(color: u32, alpha: f32) -> String {
    let (r, g, b) = rgb(color);
    format!("rgba({},{},{},{})", r, g, b, alpha.clamp(0.0, 1.0))
}

pub trait Surface {
    fn clear(&mut self);
    fn fill_style(&mut self, color: u32, alpha: f32);
    fn line_style(&mut self, width: f32, color: u32, alpha: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32);
    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32);
    /// Ellipse centered on `(x, y)` with full `w` x `h` extents.
    fn fill_ellipse(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32);
    fn stroke_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    FillStyle { color: u32, alpha: f32 },
    LineStyle { width: f32, color: u32, alpha: f32 },
    FillRect { x: f32, y: f32, w: f32, h: f32 },
    StrokeRect { x: f32, y: f32, w: f32, h: f32 },
    FillCircle { x: f32, y: f32, radius: f32 },
    StrokeCircle { x: f32, y: f32, radius: f32 },
    FillEllipse { x: f32, y: f32, w: f32, h: f32 },
    FillRoundedRect { x: f32, y: f32, w: f32, h: f32, radius: f32 },
    StrokeRoundedRect { x: f32, y: f32, w: f32, h: f32, radius: f32 },
}

/// Recorded drawing commands. `clear` forgets everything drawn so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graphics {
    commands: Vec<Shape>,
}

impl Graphics {
    pub fn new() -> Graphics {
        Graphics { commands: Vec::new() }
    }

    pub fn commands(&self) -> &[Shape] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn replay(&self, target: &mut dyn Surface) {
        for cmd in &self.commands {
            match *cmd {
                Shape::FillStyle { color, alpha } => target.fill_style(color, alpha),
                Shape::LineStyle { width, color, alpha } => target.line_style(width, color, alpha),
                Shape::FillRect { x, y, w, h } => target.fill_rect(x, y, w, h),
                Shape::StrokeRect { x, y, w, h } => target.stroke_rect(x, y, w, h),
                Shape::FillCircle { x, y, radius } => target.fill_circle(x, y, radius),
                Shape::StrokeCircle { x, y, radius } => target.stroke_circle(x, y, radius),
                Shape::FillEllipse { x, y, w, h } => target.fill_ellipse(x, y, w, h),
                Shape::FillRoundedRect { x, y, w, h, radius } => target.fill_rounded_rect(x, y, w, h, radius),
                Shape::StrokeRoundedRect { x, y, w, h, radius } => target.stroke_rounded_rect(x, y, w, h, radius),
            }
        }
    }
}

impl Surface for Graphics {
    fn clear(&mut self) {
        self.commands.clear();
    }
    fn fill_style(&mut self, color: u32, alpha: f32) {
        self.commands.push(Shape::FillStyle { color, alpha });
    }
    fn line_style(&mut self, width: f32, color: u32, alpha: f32) {
        self.commands.push(Shape::LineStyle { width, color, alpha });
    }
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(Shape::FillRect { x, y, w, h });
    }
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(Shape::StrokeRect { x, y, w, h });
    }
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.commands.push(Shape::FillCircle { x, y, radius });
    }
    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.commands.push(Shape::StrokeCircle { x, y, radius });
    }
    fn fill_ellipse(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(Shape::FillEllipse { x, y, w, h });
    }
    fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        self.commands.push(Shape::FillRoundedRect { x, y, w, h, radius });
    }
    fn stroke_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        self.commands.push(Shape::StrokeRoundedRect { x, y, w, h, radius });
    }
}

// --- PIXEL BUFFER ENGINE ---

fn inside_rounded(px: f32, py: f32, x: f32, y: f32, w: f32, h: f32, radius: f32) -> bool {
    if w <= 0.0 || h <= 0.0 || px < x || py < y || px >= x + w || py >= y + h {
        return false;
    }
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    // Distance to the inner rectangle the corner arcs are centered on
    let cx = px.clamp(x + r, x + w - r);
    let cy = py.clamp(y + r, y + h - r);
    let (dx, dy) = (px - cx, py - cy);
    dx * dx + dy * dy <= r * r
}

pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    fill: (u8, u8, u8, f32),
    line: (f32, u8, u8, u8, f32),
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> PixelBuffer {
        let size = (width * height * 4) as usize;
        PixelBuffer {
            width,
            height,
            pixels: vec![0; size],
            fill: (255, 255, 255, 1.0),
            line: (1.0, 255, 255, 255, 1.0),
        }
    }

    pub fn pixel_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height { return None; }
        let idx = ((y * self.width + x) * 4) as usize;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2], self.pixels[idx + 3]])
    }

    /// Source-over blend of one pixel.
    fn blend(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 { return; }
        let a = alpha.clamp(0.0, 1.0);
        if a <= 0.0 { return; }
        let idx = ((y * self.width as i32 + x) * 4) as usize;

        let dst_a = self.pixels[idx + 3] as f32 / 255.0;
        let out_a = a + dst_a * (1.0 - a);
        let mix = |src: u8, dst: u8| -> u8 {
            let c = (src as f32 * a + dst as f32 * dst_a * (1.0 - a)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };
        self.pixels[idx] = mix(r, self.pixels[idx]);
        self.pixels[idx + 1] = mix(g, self.pixels[idx + 1]);
        self.pixels[idx + 2] = mix(b, self.pixels[idx + 2]);
        self.pixels[idx + 3] = (out_a * 255.0).round() as u8;
    }

    /// Visit every pixel center inside the clipped bounding box that `hit` accepts.
    fn scan<F>(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: (u8, u8, u8, f32), hit: F)
    where
        F: Fn(f32, f32) -> bool,
    {
        let start_x = (x0.floor() as i32).max(0);
        let start_y = (y0.floor() as i32).max(0);
        let end_x = (x1.ceil() as i32).min(self.width as i32);
        let end_y = (y1.ceil() as i32).min(self.height as i32);

        if start_x >= end_x || start_y >= end_y { return; }

        for iy in start_y..end_y {
            for ix in start_x..end_x {
                if hit(ix as f32 + 0.5, iy as f32 + 0.5) {
                    self.blend(ix, iy, color.0, color.1, color.2, color.3);
                }
            }
        }
    }

    fn line_color(&self) -> (u8, u8, u8, f32) {
        (self.line.1, self.line.2, self.line.3, self.line.4)
    }
}

impl Surface for PixelBuffer {
    fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = 0);
    }

    fn fill_style(&mut self, color: u32, alpha: f32) {
        let (r, g, b) = rgb(color);
        self.fill = (r, g, b, alpha);
    }

    fn line_style(&mut self, width: f32, color: u32, alpha: f32) {
        let (r, g, b) = rgb(color);
        self.line = (width, r, g, b, alpha);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let fill = self.fill;
        self.scan(x, y, x + w, y + h, fill, |px, py| px >= x && px < x + w && py >= y && py < y + h);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.stroke_rounded_rect(x, y, w, h, 0.0);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        let fill = self.fill;
        let r2 = radius * radius;
        self.scan(x - radius, y - radius, x + radius, y + radius, fill, |px, py| {
            let (dx, dy) = (px - x, py - y);
            dx * dx + dy * dy <= r2
        });
    }

    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32) {
        let color = self.line_color();
        let half = self.line.0 / 2.0;
        let (inner, outer) = ((radius - half).max(0.0), radius + half);
        self.scan(x - outer, y - outer, x + outer, y + outer, color, |px, py| {
            let d = ((px - x).powi(2) + (py - y).powi(2)).sqrt();
            d >= inner && d <= outer
        });
    }

    fn fill_ellipse(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if w <= 0.0 || h <= 0.0 { return; }
        let fill = self.fill;
        let (rx, ry) = (w / 2.0, h / 2.0);
        self.scan(x - rx, y - ry, x + rx, y + ry, fill, |px, py| {
            let (nx, ny) = ((px - x) / rx, (py - y) / ry);
            nx * nx + ny * ny <= 1.0
        });
    }

    fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        let fill = self.fill;
        self.scan(x, y, x + w, y + h, fill, |px, py| inside_rounded(px, py, x, y, w, h, radius));
    }

    fn stroke_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        let color = self.line_color();
        let half = self.line.0 / 2.0;
        let outer = (x - half, y - half, w + half * 2.0, h + half * 2.0, radius + half);
        let inner = (x + half, y + half, w - half * 2.0, h - half * 2.0, (radius - half).max(0.0));
        self.scan(outer.0, outer.1, outer.0 + outer.2, outer.1 + outer.3, color, |px, py| {
            inside_rounded(px, py, outer.0, outer.1, outer.2, outer.3, outer.4)
                && !inside_rounded(px, py, inner.0, inner.1, inner.2, inner.3, inner.4)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_splits_channels() {
        assert_eq!(rgb(0xdc143c), (0xdc, 0x14, 0x3c));
        assert_eq!(css_rgba(0xffd700, 0.25), "rgba(255,215,0,0.25)");
    }

    #[test]
    fn graphics_clear_drops_commands() {
        let mut g = Graphics::new();
        g.fill_style(0xffffff, 1.0);
        g.fill_rect(0.0, 0.0, 1.0, 1.0);
        assert_eq!(g.commands().len(), 2);
        g.clear();
        assert!(g.is_empty());
    }

    #[test]
    fn graphics_replays_in_order() {
        let mut g = Graphics::new();
        g.fill_style(0xff0000, 1.0);
        g.fill_rect(1.0, 1.0, 2.0, 2.0);
        let mut copy = Graphics::new();
        g.replay(&mut copy);
        assert_eq!(copy, g);
    }

    #[test]
    fn fill_rect_is_clipped_to_the_buffer() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.fill_style(0x00ff00, 1.0);
        buf.fill_rect(-10.0, -10.0, 12.0, 12.0);
        assert_eq!(buf.pixel_at(0, 0), Some([0, 255, 0, 255]));
        assert_eq!(buf.pixel_at(1, 1), Some([0, 255, 0, 255]));
        assert_eq!(buf.pixel_at(2, 2), Some([0, 0, 0, 0]));
        assert_eq!(buf.pixel_at(4, 0), None);
    }

    #[test]
    fn translucent_fill_blends_over_opaque() {
        let mut buf = PixelBuffer::new(1, 1);
        buf.fill_style(0x000000, 1.0);
        buf.fill_rect(0.0, 0.0, 1.0, 1.0);
        buf.fill_style(0xffffff, 0.5);
        buf.fill_rect(0.0, 0.0, 1.0, 1.0);
        let [r, g, b, a] = buf.pixel_at(0, 0).unwrap();
        assert_eq!(a, 255);
        assert!((127..=128).contains(&r));
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn translucent_fill_on_transparent_keeps_color() {
        let mut buf = PixelBuffer::new(1, 1);
        buf.fill_style(0xdc143c, 0.8);
        buf.fill_rect(0.0, 0.0, 1.0, 1.0);
        assert_eq!(buf.pixel_at(0, 0), Some([0xdc, 0x14, 0x3c, 204]));
    }

    #[test]
    fn circle_covers_center_not_corners() {
        let mut buf = PixelBuffer::new(20, 20);
        buf.fill_style(0xffffff, 1.0);
        buf.fill_circle(10.0, 10.0, 5.0);
        assert_eq!(buf.pixel_at(10, 10).map(|p| p[3]), Some(255));
        assert_eq!(buf.pixel_at(5, 5).map(|p| p[3]), Some(0));
    }

    #[test]
    fn ellipse_uses_full_extents() {
        let mut buf = PixelBuffer::new(40, 20);
        buf.fill_style(0xffffff, 1.0);
        buf.fill_ellipse(20.0, 10.0, 30.0, 10.0);
        assert_eq!(buf.pixel_at(6, 10).map(|p| p[3]), Some(255));
        assert_eq!(buf.pixel_at(20, 4).map(|p| p[3]), Some(0));
    }

    #[test]
    fn rounded_stroke_leaves_interior_empty() {
        let mut buf = PixelBuffer::new(30, 30);
        buf.line_style(2.0, 0xffffff, 1.0);
        buf.stroke_rounded_rect(5.0, 5.0, 20.0, 20.0, 4.0);
        assert_eq!(buf.pixel_at(15, 15).map(|p| p[3]), Some(0));
        assert_eq!(buf.pixel_at(15, 5).map(|p| p[3]), Some(255));
    }

    #[test]
    fn clear_makes_everything_transparent() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.fill_style(0xffffff, 1.0);
        buf.fill_rect(0.0, 0.0, 2.0, 2.0);
        buf.clear();
        assert!(buf.pixels.iter().all(|&p| p == 0));
    }
}
