//! Fixed decorative appearances (caret glyph, speech bubble) and their
//! per-session cache.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Color, Rectangle};

/// Both glyphs are drawn on a 30x30 canvas
const CANVAS_SIZE: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AppearanceKind {
    Caret,
    Comment,
}

/// How appearances are shared inside one merge session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppearanceCachePolicy {
    /// One appearance per kind; the first color seen wins
    #[default]
    PerKind,
    /// One appearance per kind and color
    PerKindAndColor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CurveTo(f64, f64, f64, f64, f64, f64),
    ClosePath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppearanceId(pub u32);

/// A filled vector path on a fixed canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub id: AppearanceId,
    pub kind: AppearanceKind,
    pub bbox: Rectangle,
    pub fill: Color,
    pub line_width: Option<f64>,
    pub path: Vec<PathOp>,
}

impl Appearance {
    pub fn caret(id: AppearanceId, fill: Color) -> Self {
        use PathOp::*;
        Self {
            id,
            kind: AppearanceKind::Caret,
            bbox: Rectangle::with_size(CANVAS_SIZE, CANVAS_SIZE),
            fill,
            line_width: None,
            path: vec![
                MoveTo(15.0, 30.0),
                CurveTo(15.0, 30.0, 15.0, 0.0, 0.0, 0.0),
                LineTo(30.0, 0.0),
                CurveTo(15.0, 0.0, 15.0, 30.0, 15.0, 30.0),
                ClosePath,
            ],
        }
    }

    pub fn comment(id: AppearanceId, fill: Color) -> Self {
        use PathOp::*;
        Self {
            id,
            kind: AppearanceKind::Comment,
            bbox: Rectangle::with_size(CANVAS_SIZE, CANVAS_SIZE),
            fill,
            line_width: Some(0.85),
            path: vec![
                MoveTo(6.0, 27.5),
                CurveTo(4.3, 27.5, 3.0, 26.5, 3.0, 25.0),
                LineTo(3.0, 12.0),
                CurveTo(3.0, 10.25, 4.3, 10.25, 6.0, 10.25),
                LineTo(7.6, 10.25),
                LineTo(11.25, 3.0),
                LineTo(13.0, 10.25),
                LineTo(25.5, 10.25),
                CurveTo(25.1, 10.25, 26.25, 10.25, 26.25, 12.0),
                LineTo(26.25, 25.0),
                CurveTo(26.25, 26.5, 25.0, 27.5, 23.5, 27.5),
                ClosePath,
            ],
        }
    }

    /// Content stream as `(operator, operands)` pairs
    pub fn operations(&self) -> Vec<(&'static str, Vec<f64>)> {
        let mut ops = Vec::with_capacity(self.path.len() + 3);
        ops.push(("rg", self.fill.components().to_vec()));
        if let Some(width) = self.line_width {
            ops.push(("w", vec![width]));
        }
        for op in &self.path {
            ops.push(match *op {
                PathOp::MoveTo(x, y) => ("m", vec![x, y]),
                PathOp::LineTo(x, y) => ("l", vec![x, y]),
                PathOp::CurveTo(x1, y1, x2, y2, x3, y3) => ("c", vec![x1, y1, x2, y2, x3, y3]),
                PathOp::ClosePath => ("h", Vec::new()),
            });
        }
        ops.push(("f", Vec::new()));
        ops
    }
}

type CacheKey = (AppearanceKind, Option<[u64; 3]>);

/// Lazily built appearances, owned by a single merge session
#[derive(Debug, Default)]
pub struct AppearanceCache {
    policy: AppearanceCachePolicy,
    entries: HashMap<CacheKey, Arc<Appearance>>,
    next_id: u32,
}

impl AppearanceCache {
    pub fn new(policy: AppearanceCachePolicy) -> Self {
        Self {
            policy,
            entries: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn get(&mut self, kind: AppearanceKind, color: Color) -> Arc<Appearance> {
        let key = match self.policy {
            AppearanceCachePolicy::PerKind => (kind, None),
            AppearanceCachePolicy::PerKindAndColor => (kind, Some(color.key())),
        };
        if let Some(existing) = self.entries.get(&key) {
            return Arc::clone(existing);
        }

        let id = AppearanceId(self.next_id);
        self.next_id += 1;
        let appearance = Arc::new(match kind {
            AppearanceKind::Caret => Appearance::caret(id, color),
            AppearanceKind::Comment => Appearance::comment(id, color),
        });
        debug!(?kind, id = id.0, "Built appearance");
        self.entries.insert(key, Arc::clone(&appearance));
        appearance
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_kind_cache_ignores_color() {
        let mut cache = AppearanceCache::new(AppearanceCachePolicy::PerKind);
        let first = cache.get(AppearanceKind::Caret, Color::BLUE);
        let second = cache.get(AppearanceKind::Caret, Color::RED);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.fill, Color::BLUE);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_per_color_cache_builds_one_per_color() {
        let mut cache = AppearanceCache::new(AppearanceCachePolicy::PerKindAndColor);
        let blue = cache.get(AppearanceKind::Comment, Color::BLUE);
        let red = cache.get(AppearanceKind::Comment, Color::RED);
        let blue_again = cache.get(AppearanceKind::Comment, Color::BLUE);
        assert!(!Arc::ptr_eq(&blue, &red));
        assert!(Arc::ptr_eq(&blue, &blue_again));
        assert_ne!(blue.id, red.id);
    }

    #[test]
    fn test_caret_operations() {
        let caret = Appearance::caret(AppearanceId(0), Color::BLUE);
        let ops = caret.operations();
        assert_eq!(ops.first().unwrap(), &("rg", vec![0.0, 0.0, 1.0]));
        assert_eq!(ops[1], ("m", vec![15.0, 30.0]));
        assert_eq!(ops.last().unwrap().0, "f");
    }

    #[test]
    fn test_comment_sets_line_width() {
        let bubble = Appearance::comment(AppearanceId(3), Color::BLACK);
        assert_eq!(bubble.operations()[1], ("w", vec![0.85]));
    }
}
