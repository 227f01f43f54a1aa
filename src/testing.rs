//! Headless doubles shared by the unit tests.

use std::cell::Cell;

use crate::surface::Surface;
use crate::text::{MonospaceMetrics, TextMetrics, TextStyle};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Clear,
    FillStyle(u32, f32),
    LineStyle(f32, u32, f32),
    Fill(&'static str, Vec<f32>),
    Stroke(&'static str, Vec<f32>),
}

/// Surface that only remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct CallLog {
    pub calls: Vec<Call>,
}

impl CallLog {
    pub fn fill_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Fill(..))).count()
    }
}

impl Surface for CallLog {
    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }
    fn fill_style(&mut self, color: u32, alpha: f32) {
        self.calls.push(Call::FillStyle(color, alpha));
    }
    fn line_style(&mut self, width: f32, color: u32, alpha: f32) {
        self.calls.push(Call::LineStyle(width, color, alpha));
    }
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.calls.push(Call::Fill("rect", vec![x, y, w, h]));
    }
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.calls.push(Call::Stroke("rect", vec![x, y, w, h]));
    }
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.calls.push(Call::Fill("circle", vec![x, y, radius]));
    }
    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.calls.push(Call::Stroke("circle", vec![x, y, radius]));
    }
    fn fill_ellipse(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.calls.push(Call::Fill("ellipse", vec![x, y, w, h]));
    }
    fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        self.calls.push(Call::Fill("rounded", vec![x, y, w, h, radius]));
    }
    fn stroke_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        self.calls.push(Call::Stroke("rounded", vec![x, y, w, h, radius]));
    }
}

/// Monospace metrics that count how often text was measured.
#[derive(Debug, Default)]
pub struct CountingMetrics {
    inner: MonospaceMetrics,
    pub measured: Cell<usize>,
}

impl TextMetrics for CountingMetrics {
    fn line_width(&self, line: &str, style: &TextStyle) -> f32 {
        self.measured.set(self.measured.get() + 1);
        self.inner.line_width(line, style)
    }
}
