//! Drawing contract between the games and whatever paints the pixels.
//!
//! Coordinates are surface-local CSS pixels; device-pixel-ratio scaling is the
//! host's business.

use serde::{Deserialize, Serialize};

use crate::{Point, Rect};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn white(a: f32) -> Self {
        Self::rgba(255, 255, 255, a)
    }

    pub const fn black(a: f32) -> Self {
        Self::rgba(0, 0, 0, a)
    }

    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextBaseline {
    Top,
    Middle,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub size_px: f64,
    pub weight: u16,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub color: Color,
}

impl TextStyle {
    pub fn css_font(&self) -> String {
        format!("{} {}px ui-sans-serif, system-ui", self.weight, self.size_px.floor())
    }
}

pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64);
    fn fill_round_rect(&mut self, rect: Rect, radius: f64, color: Color);
    fn stroke_round_rect(&mut self, rect: Rect, radius: f64, color: Color, line_width: f64);
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);
    fn fill_polygon(&mut self, points: &[Point], color: Color);
    fn line(&mut self, from: Point, to: Point, color: Color, line_width: f64);
    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle);
    fn set_alpha(&mut self, alpha: f64);
}

/// Radius clamped so the corners never overlap.
pub fn corner_radius(rect: Rect, radius: f64) -> f64 {
    radius.min(rect.w / 2.).min(rect.h / 2.).max(0.)
}

/// Raised panel behind a game board.
pub fn bevel_panel(surface: &mut dyn Surface, rect: Rect, radius: f64) {
    surface.fill_round_rect(rect, radius, Color::white(0.08));
    surface.stroke_round_rect(rect.inset(1.), (radius - 1.).max(0.), Color::white(0.12), 2.);
    surface.stroke_round_rect(rect, radius, Color::black(0.35), 2.);
}

/// Records draw calls instead of painting; used to check render paths.
#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum DrawCall {
        Rect,
        RoundRect,
        Circle,
        Polygon,
        Line,
        Text(String),
        Alpha,
    }

    #[derive(Default, Debug)]
    pub(crate) struct RecordingSurface {
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn texts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    DrawCall::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn count(&self, kind: &DrawCall) -> usize {
            self.calls.iter().filter(|call| *call == kind).count()
        }
    }

    impl Surface for RecordingSurface {
        fn fill_rect(&mut self, _rect: Rect, _color: Color) {
            self.calls.push(DrawCall::Rect);
        }

        fn stroke_rect(&mut self, _rect: Rect, _color: Color, _line_width: f64) {
            self.calls.push(DrawCall::Rect);
        }

        fn fill_round_rect(&mut self, _rect: Rect, _radius: f64, _color: Color) {
            self.calls.push(DrawCall::RoundRect);
        }

        fn stroke_round_rect(&mut self, _rect: Rect, _radius: f64, _color: Color, _lw: f64) {
            self.calls.push(DrawCall::RoundRect);
        }

        fn fill_circle(&mut self, _center: Point, _radius: f64, _color: Color) {
            self.calls.push(DrawCall::Circle);
        }

        fn fill_polygon(&mut self, _points: &[Point], _color: Color) {
            self.calls.push(DrawCall::Polygon);
        }

        fn line(&mut self, _from: Point, _to: Point, _color: Color, _line_width: f64) {
            self.calls.push(DrawCall::Line);
        }

        fn fill_text(&mut self, text: &str, _at: Point, _style: &TextStyle) {
            self.calls.push(DrawCall::Text(text.to_string()));
        }

        fn set_alpha(&mut self, _alpha: f64) {
            self.calls.push(DrawCall::Alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_formats_as_css_rgba() {
        assert_eq!(Color::rgba(255, 95, 109, 0.85).css(), "rgba(255,95,109,0.85)");
    }

    #[test]
    fn corner_radius_never_exceeds_half_side() {
        let rect = Rect::new(0., 0., 10., 40.);

        assert_eq!(corner_radius(rect, 14.), 5.);
        assert_eq!(corner_radius(rect, 3.), 3.);
    }

    #[test]
    fn font_string_uses_whole_pixels() {
        let style = TextStyle {
            size_px: 15.8,
            weight: 800,
            align: TextAlign::Left,
            baseline: TextBaseline::Top,
            color: Color::black(1.),
        };

        assert_eq!(style.css_font(), "800 15px ui-sans-serif, system-ui");
    }
}
