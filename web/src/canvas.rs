use anyhow::{Context, anyhow};
use gloo::utils::window;
use minigames_core::{Color, Point, Rect, Surface, TextAlign, TextBaseline, TextStyle, corner_radius};
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// [`Surface`] backed by a 2d canvas, drawn in CSS pixels.
pub(crate) struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub(crate) fn new(canvas: HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|err| anyhow!("getContext failed: {:?}", err))?
            .context("Canvas has no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| anyhow!("2d context has an unexpected type"))?;

        Ok(Self {
            canvas,
            ctx,
            width: 0.,
            height: 0.,
        })
    }

    pub(crate) fn is_for(&self, canvas: &HtmlCanvasElement) -> bool {
        &self.canvas == canvas
    }

    /// Matches the backing store to the parent box and device pixel ratio.
    /// Returns the new size in CSS pixels.
    pub(crate) fn fit_to_parent(&mut self) -> (f64, f64) {
        let Some(parent) = self.canvas.parent_element() else {
            return (self.width, self.height);
        };
        let rect = parent.get_bounding_client_rect();
        let width = rect.width().floor().max(1.);
        let height = rect.height().floor().max(1.);
        let dpr = window().device_pixel_ratio().max(1.);

        self.canvas.set_width((width * dpr).floor() as u32);
        self.canvas.set_height((height * dpr).floor() as u32);
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", width)).ok();
        style.set_property("height", &format!("{}px", height)).ok();
        self.ctx.set_transform(dpr, 0., 0., dpr, 0., 0.).ok();

        log::debug!("canvas fit: {}x{} @{}", width, height, dpr);
        self.width = width;
        self.height = height;
        (width, height)
    }

    pub(crate) fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub(crate) fn clear(&self) {
        self.ctx.clear_rect(0., 0., self.width, self.height);
    }

    fn round_rect_path(&self, rect: Rect, radius: f64) {
        let r = corner_radius(rect, radius);
        let (x, y, w, h) = (rect.x, rect.y, rect.w, rect.h);
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(x + r, y);
        ctx.arc_to(x + w, y, x + w, y + h, r).ok();
        ctx.arc_to(x + w, y + h, x, y + h, r).ok();
        ctx.arc_to(x, y + h, x, y, r).ok();
        ctx.arc_to(x, y, x + w, y, r).ok();
        ctx.close_path();
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(line_width);
        self.ctx.stroke_rect(rect.x, rect.y, rect.w, rect.h);
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f64, color: Color) {
        self.round_rect_path(rect, radius);
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill();
    }

    fn stroke_round_rect(&mut self, rect: Rect, radius: f64, color: Color, line_width: f64) {
        self.round_rect_path(rect, radius);
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(line_width);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, 0., TAU).ok();
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill();
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill();
    }

    fn line(&mut self, from: Point, to: Point, color: Color, line_width: f64) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(line_width);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.ctx.set_font(&style.css_font());
        self.ctx.set_text_align(match style.align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        });
        self.ctx.set_text_baseline(match style.baseline {
            TextBaseline::Top => "top",
            TextBaseline::Middle => "middle",
        });
        self.ctx.set_fill_style_str(&style.color.css());
        self.ctx.fill_text(text, at.x, at.y).ok();
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }
}
