//! Shared palette and sizing for the charts.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

pub const LEGACY: RGBColor = RGBColor(0x31, 0x78, 0xC6);
pub const TURBO: RGBColor = RGBColor(0xF2, 0x1B, 0x3F);
pub const LEGACY_LIGHT: RGBColor = RGBColor(0x6B, 0xA3, 0xE8);
pub const TURBO_LIGHT: RGBColor = RGBColor(0xF7, 0x6D, 0x85);
pub const GRID: RGBColor = RGBColor(0xE5, 0xE5, 0xE5);
pub const TEXT: RGBColor = RGBColor(0x1A, 0x1A, 0x1A);
pub const ANNOTATION: RGBColor = RGBColor(0x66, 0x66, 0x66);
pub const PANEL: RGBColor = RGBColor(0xF8, 0xF9, 0xFA);

const FONT: &str = "sans-serif";
const MONO_FONT: &str = "monospace";

pub fn anchor(h: HPos, v: VPos) -> Pos {
    Pos::new(h, v)
}

pub fn centered() -> Pos {
    anchor(HPos::Center, VPos::Center)
}

/// Converts figure sizes in inches and font sizes in points to pixels.
#[derive(Debug, Clone, Copy)]
pub struct Canvas {
    dpi: u32,
}

impl Canvas {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    pub fn size(&self, width_in: f64, height_in: f64) -> (u32, u32) {
        (
            (width_in * self.dpi as f64).round() as u32,
            (height_in * self.dpi as f64).round() as u32,
        )
    }

    /// Points (1/72 inch) to pixels.
    pub fn px(&self, points: f64) -> i32 {
        (points * self.dpi as f64 / 72.0).round() as i32
    }

    fn font_px(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    pub fn text(&self, points: f64, color: &RGBColor) -> TextStyle<'static> {
        (FONT, self.font_px(points)).into_font().color(color)
    }

    pub fn bold(&self, points: f64, color: &RGBColor) -> TextStyle<'static> {
        (FONT, self.font_px(points))
            .into_font()
            .style(FontStyle::Bold)
            .color(color)
    }

    pub fn italic(&self, points: f64, color: &RGBColor) -> TextStyle<'static> {
        (FONT, self.font_px(points))
            .into_font()
            .style(FontStyle::Italic)
            .color(color)
    }

    pub fn mono(&self, points: f64, color: &RGBColor) -> TextStyle<'static> {
        (MONO_FONT, self.font_px(points)).into_font().color(color)
    }

    pub fn title(&self) -> TextStyle<'static> {
        self.bold(14.0, &TEXT)
    }

    /// Light grid lines drawn behind the data.
    pub fn grid_line(&self) -> ShapeStyle {
        GRID.mix(0.3).stroke_width(1)
    }

    /// Line width in pixels for a width given in points.
    pub fn stroke(&self, points: f64) -> u32 {
        self.px(points).max(1) as u32
    }

    pub fn axis_line(&self) -> ShapeStyle {
        GRID.stroke_width(self.stroke(1.5))
    }
}
