//! Conversions from raw interchange attribute strings to typed values.
//!
//! All list-valued attributes are comma separated. Empty tokens are skipped
//! and each token is trimmed before numeric parsing.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::error::ConversionError;
use crate::types::{AffineTransform, AnnotationFlags, Color, Rectangle};

lazy_static! {
    static ref FLAG_NAMES: HashMap<&'static str, AnnotationFlags> = {
        let mut m = HashMap::new();
        m.insert("invisible", AnnotationFlags::INVISIBLE);
        m.insert("hidden", AnnotationFlags::HIDDEN);
        m.insert("print", AnnotationFlags::PRINT);
        m.insert("nozoom", AnnotationFlags::NO_ZOOM);
        m.insert("norotate", AnnotationFlags::NO_ROTATE);
        m.insert("noview", AnnotationFlags::NO_VIEW);
        m.insert("readonly", AnnotationFlags::READ_ONLY);
        m.insert("locked", AnnotationFlags::LOCKED);
        m.insert("togglenoview", AnnotationFlags::TOGGLE_NO_VIEW);
        m
    };
}

fn tokenize(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

fn parse_number(token: &str) -> Result<f64, ConversionError> {
    token
        .parse::<f64>()
        .map_err(|_| ConversionError::InvalidNumber(token.to_string()))
}

/// Converts `"w,h"` or `"x1,y1,x2,y2"` into a rectangle.
///
/// Two values are a size anchored at the origin; only the linear part of the
/// transform applies to them. Four values are two corners, transformed and
/// then normalized so their order does not matter.
pub fn convert_rect(raw: &str, transform: &AffineTransform) -> Result<Rectangle, ConversionError> {
    let tokens = tokenize(raw);
    match tokens.len() {
        2 => {
            let (w, h) = transform.delta_transform(parse_number(tokens[0])?, parse_number(tokens[1])?);
            Ok(Rectangle::with_size(w.abs(), h.abs()))
        }
        4 => {
            let mut raw_coords = [0.0; 4];
            for (slot, token) in raw_coords.iter_mut().zip(&tokens) {
                *slot = parse_number(token)?;
            }
            let (x1, y1) = transform.transform_point(raw_coords[0], raw_coords[1]);
            let (x2, y2) = transform.transform_point(raw_coords[2], raw_coords[3]);
            Ok(Rectangle::new(
                x1.min(x2),
                y1.min(y2),
                (x1 - x2).abs(),
                (y1 - y2).abs(),
            ))
        }
        n => Err(ConversionError::RectCoordinateCount(n)),
    }
}

/// Converts a coords list into transformed quad points. A count that is not a
/// multiple of 8 yields an empty list rather than an error.
pub fn convert_quad_points(raw: &str, transform: &AffineTransform) -> Result<Vec<f64>, ConversionError> {
    let tokens = tokenize(raw);
    if tokens.len() % 8 != 0 {
        return Ok(Vec::new());
    }
    let points = tokens
        .into_iter()
        .map(parse_number)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(transform.transform_coords(&points))
}

/// ORs together the named flags; unknown names are ignored without comment.
pub fn convert_flags(raw: &str) -> AnnotationFlags {
    tokenize(raw)
        .into_iter()
        .filter_map(|name| FLAG_NAMES.get(name.to_ascii_lowercase().as_str()).copied())
        .fold(AnnotationFlags::empty(), |acc, flag| acc | flag)
}

/// Converts `#RRGGBB`. Anything after the first `#` that is not exactly six
/// hex digits gives black.
pub fn convert_color(raw: &str) -> Color {
    let hex = match raw.find('#') {
        Some(pos) => &raw[pos + 1..],
        None => raw,
    };
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Color::BLACK;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).unwrap_or(0);
    Color::from_rgb8(channel(0), channel(1), channel(2))
}

/// One-based target page for a zero-based interchange page
pub fn resolve_target_page(page_shift: i32, source_page: i32) -> i64 {
    i64::from(page_shift) + 1 + i64::from(source_page)
}

/// `yes`/`true`/`1` (any case) mean open
pub fn convert_open_state(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "yes" | "true" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: AffineTransform = AffineTransform::IDENTITY;

    #[test]
    fn test_rect_from_size() {
        let rect = convert_rect("10,20", &ID).unwrap();
        assert_eq!(rect, Rectangle::new(0.0, 0.0, 10.0, 20.0));
    }

    #[test]
    fn test_rect_from_corners() {
        assert_eq!(convert_rect("0,0,10,20", &ID).unwrap(), Rectangle::new(0.0, 0.0, 10.0, 20.0));
    }

    #[test]
    fn test_rect_corner_order_does_not_matter() {
        assert_eq!(convert_rect("10,20,0,0", &ID).unwrap(), Rectangle::new(0.0, 0.0, 10.0, 20.0));
    }

    #[test]
    fn test_rect_applies_transform() {
        let t = AffineTransform::scale_translate(2.0, 5.0, 7.0);
        assert_eq!(convert_rect("1,1,3,4", &t).unwrap(), Rectangle::new(7.0, 9.0, 4.0, 6.0));
        assert_eq!(convert_rect("3,4", &t).unwrap(), Rectangle::new(0.0, 0.0, 6.0, 8.0));
    }

    #[test]
    fn test_rect_with_wrong_count_is_an_error() {
        assert_eq!(convert_rect("1,2,3", &ID), Err(ConversionError::RectCoordinateCount(3)));
        assert_eq!(convert_rect("", &ID), Err(ConversionError::RectCoordinateCount(0)));
    }

    #[test]
    fn test_rect_with_bad_number_is_an_error() {
        assert!(matches!(convert_rect("1,x", &ID), Err(ConversionError::InvalidNumber(_))));
    }

    #[test]
    fn test_quad_points_keep_count() {
        let quads = convert_quad_points("1,2,3,4,5,6,7,8", &ID).unwrap();
        assert_eq!(quads, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_quad_points_partial_list_is_empty() {
        assert!(convert_quad_points("1,2,3,4,5,6,7", &ID).unwrap().is_empty());
        assert!(convert_quad_points("1,2,3,4,5,6,7,8,9", &ID).unwrap().is_empty());
    }

    #[test]
    fn test_quad_points_are_transformed() {
        let t = AffineTransform::scale_translate(1.0, 10.0, 0.0);
        let quads = convert_quad_points("0,0,1,0,0,1,1,1", &t).unwrap();
        assert_eq!(quads, vec![10.0, 0.0, 11.0, 0.0, 10.0, 1.0, 11.0, 1.0]);
    }

    #[test]
    fn test_flags() {
        assert_eq!(convert_flags("print,hidden"), AnnotationFlags::PRINT | AnnotationFlags::HIDDEN);
        assert_eq!(convert_flags("Print, NoZoom"), AnnotationFlags::PRINT | AnnotationFlags::NO_ZOOM);
    }

    #[test]
    fn test_unknown_flags_contribute_nothing() {
        assert_eq!(convert_flags("print,sparkly"), AnnotationFlags::PRINT);
        assert_eq!(convert_flags(""), AnnotationFlags::empty());
    }

    #[test]
    fn test_color() {
        assert_eq!(convert_color("#FF8000"), Color::from_rgb8(255, 128, 0));
        assert_eq!(convert_color("00ff00"), Color::from_rgb8(0, 255, 0));
    }

    #[test]
    fn test_malformed_color_is_black() {
        assert_eq!(convert_color("#FFF"), Color::BLACK);
        assert_eq!(convert_color("#GG0000"), Color::BLACK);
    }

    #[test]
    fn test_target_page() {
        assert_eq!(resolve_target_page(0, 0), 1);
        assert_eq!(resolve_target_page(2, 3), 6);
        assert_eq!(resolve_target_page(-1, 0), 0);
    }

    #[test]
    fn test_open_state() {
        assert!(convert_open_state("Yes"));
        assert!(!convert_open_state("no"));
    }
}
