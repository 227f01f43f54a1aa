use crate::constants::{colors, FONT_FAMILY};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub offset_x: f32,
    pub offset_y: f32,
    pub color: u32,
    pub blur: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: u32,
    /// Outline color and thickness.
    pub stroke: Option<(u32, f32)>,
    pub shadow: Option<Shadow>,
    pub letter_spacing: f32,
    pub align: Align,
    pub wrap_width: Option<f32>,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            font_size: 16.0,
            color: colors::WHITE,
            stroke: None,
            shadow: None,
            letter_spacing: 0.0,
            align: Align::Left,
            wrap_width: None,
        }
    }
}

impl TextStyle {
    pub fn sized(font_size: f32, color: u32) -> Self {
        TextStyle { font_size, color, ..TextStyle::default() }
    }

    /// CSS font shorthand for the canvas context.
    pub fn font(&self) -> String {
        format!("{}px {}", self.font_size, FONT_FAMILY)
    }
}

/// Measures rendered text. The canvas backend asks the browser; headless
/// code uses [`MonospaceMetrics`].
pub trait TextMetrics {
    fn line_width(&self, line: &str, style: &TextStyle) -> f32;

    fn line_height(&self, style: &TextStyle) -> f32 {
        (style.font_size * 1.2).ceil()
    }
}

/// Fixed advance per character, counted in chars rather than bytes so
/// Polish diacritics measure the same as ASCII.
#[derive(Clone, Copy, Debug)]
pub struct MonospaceMetrics {
    pub advance: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        MonospaceMetrics { advance: 0.6 }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn line_width(&self, line: &str, style: &TextStyle) -> f32 {
        line.chars().count() as f32 * style.font_size * self.advance
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
    pub line_height: f32,
}

/// Width of one line including letter spacing between glyphs.
pub fn spaced_width(line: &str, style: &TextStyle, metrics: &dyn TextMetrics) -> f32 {
    let chars = line.chars().count();
    let spacing = if chars > 1 { style.letter_spacing * (chars - 1) as f32 } else { 0.0 };
    metrics.line_width(line, style) + spacing
}

/// Greedy word wrap. A single word wider than `max_width` keeps its own line.
pub fn wrap(paragraph: &str, max_width: f32, style: &TextStyle, metrics: &dyn TextMetrics) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if spaced_width(&candidate, style, metrics) > max_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current = candidate;
        }
    }

    lines.push(current);
    lines
}

pub fn layout(content: &str, style: &TextStyle, metrics: &dyn TextMetrics) -> TextLayout {
    let lines: Vec<String> = content
        .split('\n')
        .flat_map(|paragraph| match style.wrap_width {
            Some(max) => wrap(paragraph, max, style, metrics),
            None => vec![paragraph.to_string()],
        })
        .collect();

    let width = lines
        .iter()
        .map(|l| spaced_width(l, style, metrics))
        .fold(0.0, f32::max);
    let line_height = metrics.line_height(style);

    TextLayout {
        height: line_height * lines.len() as f32,
        lines,
        width,
        line_height,
    }
}
