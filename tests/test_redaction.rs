//! End-to-end redaction scenarios over synthetic single-page documents:
//! plain text removal, out-of-page rectangles, rotated pages, mixed content
//! classes, and multi-stream consolidation.

mod common;

use common::{secret_page, secret_rect_px, TestPdf};
use pdf_redact::content::{parse_content, Operation};
use pdf_redact::extractors::extract_letters;
use pdf_redact::geometry::Rect;
use pdf_redact::{verify, PdfDocument, RedactionMode, Redactor};

#[test]
fn single_word_text_redaction() {
    let mut doc = PdfDocument::from_bytes(secret_page()).unwrap();
    let mut redactor = Redactor::new();

    let result = redactor.redact_area(&mut doc, 0, secret_rect_px()).unwrap();
    assert_eq!(result.mode, RedactionMode::TrueRedaction);
    assert!(result.content_removed);
    assert!(result.visual_drawn);
    assert_eq!(result.text_removed, 1);
    assert_eq!(redactor.redacted_terms(), &["SECRET".to_string()]);

    // Save, reopen: no text survives, extraction yields nothing.
    let saved = doc.to_bytes().unwrap();
    let mut reopened = PdfDocument::from_bytes(saved).unwrap();
    let content = reopened.page_contents(0).unwrap();
    let letters = extract_letters(&content, 792.0).unwrap();
    assert!(letters.is_empty());

    let report = verify(&mut reopened).unwrap();
    assert!(report.passed, "leaks: {:?}", report.leaks);
}

#[test]
fn rectangle_outside_page_is_visual_only() {
    let mut doc = PdfDocument::from_bytes(secret_page()).unwrap();
    let mut redactor = Redactor::new();

    let far_away = Rect::new(10000.0, 10000.0, 50.0, 50.0);
    let result = redactor.redact_area(&mut doc, 0, far_away).unwrap();
    assert_eq!(result.mode, RedactionMode::VisualOnly);
    assert!(!result.content_removed);
    assert!(result.visual_drawn);
    assert_eq!(result.text_removed, 0);

    // The file is still a valid PDF and the original text is untouched.
    let saved = doc.to_bytes().unwrap();
    let mut reopened = PdfDocument::from_bytes(saved).unwrap();
    let content = reopened.page_contents(0).unwrap();
    let letters = extract_letters(&content, 792.0).unwrap();
    assert_eq!(letters.len(), "SECRET".len());
}

#[test]
fn rotated_page_selection_lands_on_text() {
    let mut builder = TestPdf::with_content(b"BT /F1 12 Tf 100 700 Td (SECRET) Tj ET");
    builder.page_extra = "/Rotate 90".to_string();
    let mut doc = PdfDocument::from_bytes(builder.build()).unwrap();
    let mut redactor = Redactor::new();

    // The rectangle that covers "SECRET" on the 90-degree rotated 150 dpi
    // rendering (display space is 1650x1275 px).
    let display_rect = Rect::new(1434.0, 208.0, 25.0, 125.0);
    let result = redactor.redact_area(&mut doc, 0, display_rect).unwrap();
    assert_eq!(result.mode, RedactionMode::TrueRedaction);
    assert_eq!(result.text_removed, 1);

    let mut reopened = PdfDocument::from_bytes(doc.to_bytes().unwrap()).unwrap();
    assert!(verify(&mut reopened).unwrap().passed);
}

#[test]
fn mixed_content_counts_and_resource_cleanup() {
    let content = b"BT /F1 12 Tf 100 700 Td (SECRET) Tj ET\n\
100 690 60 14 re f\n\
q 60 0 0 14 100 660 cm /Im1 Do Q\n\
q 30 0 0 14 100 640 cm BI /W 1 /H 1 ID \x00 EI Q";
    let mut builder = TestPdf::with_content(content);
    builder.page_extra = "/Resources << /XObject << /Im1 5 0 R >> >>".to_string();
    builder.extra_objects = vec![
        b"<< /Subtype /Image /Width 1 /Height 1 /Length 1 >>\nstream\nA\nendstream".to_vec(),
    ];
    assert_eq!(builder.first_extra_id(), 5);

    let mut doc = PdfDocument::from_bytes(builder.build()).unwrap();
    // Selections at 72 dpi: pixel coordinates equal PDF points.
    let mut redactor = Redactor::with_dpi(72.0).unwrap();

    let area = Rect::new(95.0, 87.0, 80.0, 70.0);
    let result = redactor.redact_area(&mut doc, 0, area).unwrap();
    assert_eq!(result.mode, RedactionMode::TrueRedaction);
    assert_eq!(result.text_removed, 1);
    assert_eq!(result.graphics_removed, 1);
    assert_eq!(result.image_removed, 2);

    // /Im1 was referenced only by the removed operation.
    let page = doc.page_dict(0).unwrap();
    let resources = doc.resolve_entry(&page, "Resources").unwrap().unwrap();
    let xobjects = resources
        .as_dict()
        .unwrap()
        .get("XObject")
        .unwrap()
        .as_dict()
        .unwrap()
        .clone();
    assert!(!xobjects.contains_key("Im1"));
}

#[test]
fn xobject_kept_when_another_placement_survives() {
    // Two placements of the same image; only one is redacted.
    let content = b"q 60 0 0 14 100 660 cm /Im1 Do Q\nq 60 0 0 14 400 100 cm /Im1 Do Q";
    let mut builder = TestPdf::with_content(content);
    builder.page_extra = "/Resources << /XObject << /Im1 5 0 R >> >>".to_string();
    builder.extra_objects = vec![
        b"<< /Subtype /Image /Width 1 /Height 1 /Length 1 >>\nstream\nA\nendstream".to_vec(),
    ];

    let mut doc = PdfDocument::from_bytes(builder.build()).unwrap();
    let mut redactor = Redactor::with_dpi(72.0).unwrap();
    let area = Rect::new(95.0, 110.0, 80.0, 30.0); // covers only the first placement
    let result = redactor.redact_area(&mut doc, 0, area).unwrap();
    assert_eq!(result.image_removed, 1);

    let page = doc.page_dict(0).unwrap();
    let resources = doc.resolve_entry(&page, "Resources").unwrap().unwrap();
    let xobjects = resources
        .as_dict()
        .unwrap()
        .get("XObject")
        .unwrap()
        .as_dict()
        .unwrap()
        .clone();
    assert!(xobjects.contains_key("Im1"));
}

#[test]
fn multi_stream_page_is_consolidated() {
    let mut builder = TestPdf::default();
    builder.content_streams = vec![
        b"q".to_vec(),
        b"BT /F1 12 Tf 100 700 Td (SECRET) Tj ET".to_vec(),
        b"Q".to_vec(),
    ];
    let mut doc = PdfDocument::from_bytes(builder.build()).unwrap();

    // Concatenating the three streams parses to the same operation list
    // the document hands the redactor.
    let consolidated = doc.page_contents(0).unwrap();
    assert_eq!(consolidated, b"q\nBT /F1 12 Tf 100 700 Td (SECRET) Tj ET\nQ");

    let mut redactor = Redactor::new();
    let result = redactor.redact_area(&mut doc, 0, secret_rect_px()).unwrap();
    assert_eq!(result.mode, RedactionMode::TrueRedaction);

    // After redaction /Contents is a single indirect stream.
    let page = doc.page_dict(0).unwrap();
    assert!(page.get("Contents").unwrap().as_reference().is_some());

    let mut reopened = PdfDocument::from_bytes(doc.to_bytes().unwrap()).unwrap();
    let content = reopened.page_contents(0).unwrap();
    let parsed = parse_content(&content, 792.0).unwrap();
    assert!(!parsed
        .operations
        .iter()
        .any(|op| matches!(op, Operation::Text { text, .. } if !text.is_empty())));
}

#[test]
fn redaction_is_idempotent() {
    let mut doc = PdfDocument::from_bytes(secret_page()).unwrap();
    let mut redactor = Redactor::new();

    let first = redactor.redact_area(&mut doc, 0, secret_rect_px()).unwrap();
    assert_eq!(first.mode, RedactionMode::TrueRedaction);
    assert_eq!(first.text_removed, 1);

    // The second pass over the same rectangle finds nothing left to remove.
    let second = redactor.redact_area(&mut doc, 0, secret_rect_px()).unwrap();
    assert_eq!(second.mode, RedactionMode::VisualOnly);
    assert_eq!(second.text_removed, 0);
    assert!(!second.content_removed);
}

#[test]
fn out_of_range_page_index_is_invalid_argument() {
    let mut doc = PdfDocument::from_bytes(secret_page()).unwrap();
    let mut redactor = Redactor::new();
    let err = redactor.redact_area(&mut doc, 7, secret_rect_px()).unwrap_err();
    assert!(matches!(err, pdf_redact::Error::InvalidArgument(_)));
}

#[test]
fn overlay_has_deterministic_shape_in_saved_file() {
    let mut doc = PdfDocument::from_bytes(secret_page()).unwrap();
    let mut redactor = Redactor::new();
    redactor.redact_area(&mut doc, 0, secret_rect_px()).unwrap();

    let mut reopened = PdfDocument::from_bytes(doc.to_bytes().unwrap()).unwrap();
    let content = reopened.page_contents(0).unwrap();
    let text = String::from_utf8_lossy(&content);
    assert!(text.contains("q\n0 0 0 rg\n99.84 688.32 60.00 12.00 re\nf\nQ"));
}
