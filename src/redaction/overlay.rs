//! Opaque overlay painting.
//!
//! The overlay is appended after filtering succeeded; by then the content
//! underneath is already gone and the rectangle is visual confirmation. The
//! byte shape is fixed and deterministic:
//!
//! ```text
//! q
//! 0 0 0 rg
//! {x:.2} {y:.2} {w:.2} {h:.2} re
//! f
//! Q
//! ```
//!
//! Numbers are two-decimal fixed, dot separator, regardless of locale.

use crate::geometry::Rect;

/// Build the overlay operators for `area_top_left` (top-left PDF points).
///
/// The rectangle is emitted in PDF bottom-left coordinates:
/// `y = page_height − area.y − area.h`.
pub fn overlay_bytes(area_top_left: &Rect, page_height: f64, fill_rgb: [u8; 3]) -> Vec<u8> {
    let pdf_y = page_height - area_top_left.y - area_top_left.height;
    format!(
        "q\n{} {} {} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
        color_component(fill_rgb[0]),
        color_component(fill_rgb[1]),
        color_component(fill_rgb[2]),
        area_top_left.x,
        pdf_y,
        area_top_left.width,
        area_top_left.height,
    )
    .into_bytes()
}

/// Append an overlay to existing content, separated by a newline.
pub fn append_overlay(
    content: &mut Vec<u8>,
    area_top_left: &Rect,
    page_height: f64,
    fill_rgb: [u8; 3],
) {
    if !content.is_empty() && !content.ends_with(b"\n") {
        content.push(b'\n');
    }
    content.extend_from_slice(&overlay_bytes(area_top_left, page_height, fill_rgb));
}

/// Recognize a path span this module itself painted.
///
/// The fixed byte shape (four two-decimal numbers, `re`, newline, `f`) is
/// the fingerprint that makes redaction idempotent: re-running the same
/// rectangle must not remove and repaint its own overlay. Because the
/// rebuilder re-emits kept spans byte-exact, the shape survives save and
/// reopen cycles.
pub(crate) fn is_overlay_span(raw: &[u8]) -> bool {
    let text = match std::str::from_utf8(raw) {
        Ok(t) => t,
        Err(_) => return false,
    };
    let body = match text.strip_suffix(" re\nf") {
        Some(b) => b,
        None => return false,
    };
    let parts: Vec<&str> = body.split(' ').collect();
    parts.len() == 4 && parts.iter().all(|p| is_two_decimal_number(p))
}

fn is_two_decimal_number(text: &str) -> bool {
    let (int_part, frac_part) = match text.split_once('.') {
        Some(split) => split,
        None => return false,
    };
    let digits = int_part.strip_prefix('-').unwrap_or(int_part);
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && frac_part.len() == 2
        && frac_part.bytes().all(|b| b.is_ascii_digit())
}

/// Format one 8-bit color channel as a PDF 0..1 component.
///
/// 0 and 255 stay exact ("0" / "1") so the default black overlay keeps the
/// canonical `0 0 0 rg` shape the verifier matches on.
fn color_component(value: u8) -> String {
    match value {
        0 => "0".to_string(),
        255 => "1".to_string(),
        other => format!("{:.3}", f64::from(other) / 255.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_overlay_fixed_shape() {
        let area = Rect::new(100.0, 100.0, 50.0, 25.0);
        let bytes = overlay_bytes(&area, 792.0, [0, 0, 0]);
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "q\n0 0 0 rg\n100.00 667.00 50.00 25.00 re\nf\nQ\n"
        );
    }

    #[test]
    fn test_fractional_coordinates_two_decimals() {
        let area = Rect::new(10.125, 20.5, 30.333, 40.0);
        let text = String::from_utf8(overlay_bytes(&area, 792.0, [0, 0, 0])).unwrap();
        assert!(text.contains("10.13 731.50 30.33 40.00 re"));
    }

    #[test]
    fn test_custom_color() {
        let area = Rect::new(0.0, 0.0, 10.0, 10.0);
        let text = String::from_utf8(overlay_bytes(&area, 100.0, [255, 0, 128])).unwrap();
        assert!(text.starts_with("q\n1 0 0.502 rg\n"));
    }

    #[test]
    fn test_overlay_span_recognized() {
        assert!(is_overlay_span(b"100.00 667.00 50.00 25.00 re\nf"));
        assert!(is_overlay_span(b"-3.50 667.00 50.00 25.00 re\nf"));
        // User content rarely carries the exact two-decimal shape.
        assert!(!is_overlay_span(b"100 690 60 14 re f"));
        assert!(!is_overlay_span(b"100.0 667.0 50.0 25.0 re\nf"));
        assert!(!is_overlay_span(b"100.00 667.00 50.00 re\nf"));
    }

    #[test]
    fn test_emitted_overlay_path_span_matches_fingerprint() {
        use crate::content::{parse_content, Operation};

        let bytes = overlay_bytes(&Rect::new(10.0, 10.0, 5.0, 5.0), 792.0, [0, 0, 0]);
        let parsed = parse_content(&bytes, 792.0).unwrap();
        let path_raw = parsed
            .operations
            .iter()
            .find_map(|op| match op {
                Operation::Path { raw, .. } => Some(*raw),
                _ => None,
            })
            .unwrap();
        assert!(is_overlay_span(path_raw.bytes(&bytes)));
    }

    #[test]
    fn test_append_separates_with_newline() {
        let mut content = b"BT ET".to_vec();
        append_overlay(&mut content, &Rect::new(0.0, 0.0, 5.0, 5.0), 100.0, [0, 0, 0]);
        assert!(content.starts_with(b"BT ET\nq\n"));
    }

    #[test]
    fn test_overlay_parses_as_black_rect_fill() {
        use crate::content::{parse_content, Operation, PathPaint};

        let area = Rect::new(100.0, 100.0, 50.0, 25.0);
        let bytes = overlay_bytes(&area, 792.0, [0, 0, 0]);
        let parsed = parse_content(&bytes, 792.0).unwrap();
        let path = parsed
            .operations
            .iter()
            .find_map(|op| match op {
                Operation::Path {
                    kind: PathPaint::Fill,
                    bbox_top_left,
                    fill_rgb,
                    from_rect,
                    ..
                } => Some((*bbox_top_left, *fill_rgb, *from_rect)),
                _ => None,
            })
            .expect("overlay must parse as a filled path");
        assert_eq!(path.1, [0.0, 0.0, 0.0]);
        assert!(path.2);
        // Round-trips to the same top-left rectangle.
        assert_eq!(path.0, area);
    }
}
