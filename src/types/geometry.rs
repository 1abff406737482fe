//! Geometry and color primitives shared by the parser and the merge engine

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in PDF user space, origin at the lower-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle anchored at the origin
    pub fn with_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// `[llx lly urx ury]` as written into a PDF `/Rect` entry
    pub fn to_pdf_array(&self) -> [f64; 4] {
        [self.x, self.y, self.right(), self.top()]
    }
}

/// 2D affine transform stored as the PDF matrix `[a b c d e f]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(matrix: [f64; 6]) -> Self {
        let [a, b, c, d, e, f] = matrix;
        Self { a, b, c, d, e, f }
    }

    /// Uniform scale followed by a translation
    pub fn scale_translate(scale: f64, x_shift: f64, y_shift: f64) -> Self {
        Self::new([scale, 0.0, 0.0, scale, x_shift, y_shift])
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn matrix(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Transforms a vector, ignoring the translation part
    pub fn delta_transform(&self, dx: f64, dy: f64) -> (f64, f64) {
        (self.a * dx + self.c * dy, self.b * dx + self.d * dy)
    }

    /// Transforms a flat `[x0, y0, x1, y1, ...]` list. A trailing odd value is
    /// passed through untouched.
    pub fn transform_coords(&self, coords: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(coords.len());
        for pair in coords.chunks(2) {
            match *pair {
                [x, y] => {
                    let (tx, ty) = self.transform_point(x, y);
                    out.push(tx);
                    out.push(ty);
                }
                [lone] => out.push(lone),
                _ => {}
            }
        }
        out
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Device RGB color, channels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);
    /// Default for text notes and highlights without an explicit color
    pub const HIGHLIGHT: Color = Color::new(1.0, 0.81, 0.0);

    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::new(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    pub fn components(&self) -> [f64; 3] {
        [self.red, self.green, self.blue]
    }

    /// Bit-exact key, usable in hash maps
    pub fn key(&self) -> [u64; 3] {
        [self.red.to_bits(), self.green.to_bits(), self.blue.to_bits()]
    }
}
