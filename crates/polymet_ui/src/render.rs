//! Render-ready scene description.
//!
//! This module provides plain shape types that a drawing surface can paint
//! in order. All coordinates are in screen space (pan already applied).
//! These are decoupled from application-specific annotation types.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build a color from 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse `#rrggbb` or `#rgb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let expand = |s: &str| channel(s).map(|v| v * 17);
                Some(Self::rgb8(
                    expand(&digits[0..1])?,
                    expand(&digits[1..2])?,
                    expand(&digits[2..3])?,
                ))
            }
            _ => None,
        }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a;
        self
    }

    /// `#rrggbb` representation (alpha is dropped).
    pub fn to_hex(&self) -> String {
        let to8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", to8(self.r), to8(self.g), to8(self.b))
    }
}

/// A straight line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub from: Point,
    pub to: Point,
    pub color: Color,
    pub width: f32,
}

/// Text anchored at its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub position: Point,
    pub color: Color,
    pub size: f32,
}

/// A closed, filled and outlined polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilledPolygon {
    pub vertices: Vec<Point>,
    /// Fill color, alpha included
    pub fill: Color,
    pub outline: Color,
    pub outline_width: f32,
    pub label: Option<Label>,
}

/// An open polyline with a dot on every vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: Color,
    pub width: f32,
    /// Radius of the vertex dots (0 for none)
    pub dot_radius: f32,
}

/// Everything needed to paint one frame of the canvas, in painting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub background: Color,
    pub grid: Vec<Line>,
    pub polygons: Vec<FilledPolygon>,
    /// Polygon under construction, if any
    pub preview: Option<Stroke>,
}

impl Scene {
    /// Create an empty scene of the given size.
    pub fn new(width: f32, height: f32, background: Color) -> Self {
        Self {
            width,
            height,
            background,
            grid: Vec::new(),
            polygons: Vec::new(),
            preview: None,
        }
    }

    /// Add grid lines every `cell` pixels, shifted by `phase` per axis.
    ///
    /// `phase` is expected to be the pan offset modulo the cell size so that
    /// the grid moves with the content.
    pub fn push_grid(&mut self, cell: f32, phase: (f32, f32), color: Color) {
        if cell <= 0.0 || !cell.is_finite() {
            return;
        }
        let columns = (self.width / cell).floor() as usize;
        for i in 0..=columns {
            let x = i as f32 * cell + phase.0;
            self.grid.push(Line {
                from: Point::new(x, 0.0),
                to: Point::new(x, self.height),
                color,
                width: 1.0,
            });
        }
        let rows = (self.height / cell).floor() as usize;
        for i in 0..=rows {
            let y = i as f32 * cell + phase.1;
            self.grid.push(Line {
                from: Point::new(0.0, y),
                to: Point::new(self.width, y),
                color,
                width: 1.0,
            });
        }
    }

    /// Check if nothing but the background would be painted.
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty() && self.polygons.is_empty() && self.preview.is_none()
    }
}
