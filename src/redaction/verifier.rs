//! Post-hoc leakage verification.
//!
//! Re-parses every page of a (typically just-saved) document, finds the
//! opaque rectangles this system paints, and reports every text operation
//! whose bounding box still intersects one. A passing report means the
//! operators under each overlay are actually gone, not merely covered.
//!
//! An overlay is recognized two ways: by a black fill color on a rectangle
//! path (the default `0 g` / `0 0 0 rg` shape), or by the painter's fixed
//! two-decimal byte shape regardless of fill color. The second rule matters
//! because `RedactionOptions.fill_color` lets callers paint non-black
//! overlays; a colored rectangle the verifier cannot see would let covered
//! text pass verification.

use crate::content::{parse_content, Operation, PathPaint};
use crate::document::PdfDocument;
use crate::error::Result;
use crate::geometry::Rect;
use crate::redaction::{overlay, VerificationLeak, VerificationReport};
use std::path::Path;

/// Fill components at or below this are considered black.
const BLACK_THRESHOLD: f64 = 0.01;

/// Verify a document already in memory.
pub fn verify(doc: &mut PdfDocument) -> Result<VerificationReport> {
    let mut leaks = Vec::new();

    for page_index in 0..doc.page_count() {
        let page_height = doc.page_height_points(page_index)?;
        let content = doc.page_contents(page_index)?;
        let parsed = match parse_content(&content, page_height) {
            Ok(parsed) => parsed,
            Err(e) => {
                // A page we cannot parse is a page we cannot clear.
                log::error!("verifier cannot parse page {}: {}", page_index, e);
                leaks.push(VerificationLeak {
                    page_index,
                    text: String::new(),
                    bbox_top_left: Rect::new(0.0, 0.0, 0.0, 0.0),
                });
                continue;
            },
        };

        let overlay_rects: Vec<Rect> = parsed
            .operations
            .iter()
            .filter_map(|op| match op {
                Operation::Path {
                    kind: PathPaint::Fill,
                    bbox_top_left,
                    fill_rgb,
                    from_rect: true,
                    raw,
                } if fill_rgb.iter().all(|&c| c <= BLACK_THRESHOLD)
                    || overlay::is_overlay_span(raw.bytes(&content)) =>
                {
                    Some(*bbox_top_left)
                },
                _ => None,
            })
            .collect();
        if overlay_rects.is_empty() {
            continue;
        }

        for op in &parsed.operations {
            if let Operation::Text {
                text,
                bbox_top_left,
                ..
            } = op
            {
                if overlay_rects.iter().any(|r| r.intersects(bbox_top_left)) {
                    leaks.push(VerificationLeak {
                        page_index,
                        text: text.clone(),
                        bbox_top_left: *bbox_top_left,
                    });
                }
            }
        }
    }

    Ok(VerificationReport {
        passed: leaks.is_empty(),
        leaks,
    })
}

/// Open a saved file and verify it.
pub fn verify_file(path: impl AsRef<Path>) -> Result<VerificationReport> {
    let mut doc = PdfDocument::open(path)?;
    verify(&mut doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::one_page_pdf;

    #[test]
    fn test_no_overlays_passes() {
        let pdf = one_page_pdf(b"BT /F1 12 Tf 100 700 Td (visible) Tj ET");
        let mut doc = PdfDocument::from_bytes(pdf).unwrap();
        let report = verify(&mut doc).unwrap();
        assert!(report.passed);
    }

    #[test]
    fn test_text_under_black_rect_is_a_leak() {
        // Text at y=700 with a black rectangle painted right over it.
        let content =
            b"BT /F1 12 Tf 100 700 Td (LEAKED) Tj ET\nq\n0 0 0 rg\n95.00 695.00 80.00 20.00 re\nf\nQ";
        let mut doc = PdfDocument::from_bytes(one_page_pdf(content)).unwrap();
        let report = verify(&mut doc).unwrap();
        assert!(!report.passed);
        assert_eq!(report.leaks.len(), 1);
        assert_eq!(report.leaks[0].text, "LEAKED");
        assert_eq!(report.leaks[0].page_index, 0);
    }

    #[test]
    fn test_text_beside_black_rect_passes() {
        let content =
            b"BT /F1 12 Tf 100 700 Td (fine) Tj ET\nq\n0 0 0 rg\n400.00 100.00 50.00 20.00 re\nf\nQ";
        let mut doc = PdfDocument::from_bytes(one_page_pdf(content)).unwrap();
        let report = verify(&mut doc).unwrap();
        assert!(report.passed);
    }

    #[test]
    fn test_third_party_white_rect_is_not_an_overlay() {
        // Neither black nor in the painter's byte shape: a page background
        // rectangle from another tool, not a redaction.
        let content =
            b"BT /F1 12 Tf 100 700 Td (text) Tj ET\n1 1 1 rg\n95 695 80 20 re\nf";
        let mut doc = PdfDocument::from_bytes(one_page_pdf(content)).unwrap();
        let report = verify(&mut doc).unwrap();
        assert!(report.passed);
    }

    #[test]
    fn test_colored_overlay_detected_by_byte_shape() {
        // A non-black overlay painted through RedactionOptions.fill_color
        // keeps the painter's fixed byte shape; text under it must still be
        // reported.
        let content =
            b"BT /F1 12 Tf 100 700 Td (LEAK) Tj ET\nq\n1 0 0 rg\n95.00 688.00 80.00 20.00 re\nf\nQ";
        let mut doc = PdfDocument::from_bytes(one_page_pdf(content)).unwrap();
        let report = verify(&mut doc).unwrap();
        assert!(!report.passed);
        assert_eq!(report.leaks.len(), 1);
        assert_eq!(report.leaks[0].text, "LEAK");
    }

    #[test]
    fn test_gray_shorthand_black_detected() {
        // "0 g" sets black fill just like "0 0 0 rg".
        let content = b"BT /F1 12 Tf 100 700 Td (shh) Tj ET\n0 g\n95 690 80 25 re\nf";
        let mut doc = PdfDocument::from_bytes(one_page_pdf(content)).unwrap();
        let report = verify(&mut doc).unwrap();
        assert!(!report.passed);
    }
}
