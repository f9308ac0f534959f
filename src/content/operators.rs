//! The typed operation model the parser emits.
//!
//! `Operation` is a sum type, not a class tree: the spatial filter matches
//! on the variant, and everything it does not understand rides along as
//! `Opaque` bytes that are re-emitted verbatim. Every record points back
//! into the consolidated source stream via [`RawSpan`], which is what makes
//! byte-exact rebuilds possible.

use crate::geometry::Rect;

/// A byte range in the consolidated content stream an operation was parsed
/// from (operands through operator keyword).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSpan {
    /// Start offset
    pub offset: usize,
    /// Length in bytes
    pub len: usize,
}

impl RawSpan {
    /// Slice the span out of the source buffer.
    pub fn bytes<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        &source[self.offset..self.offset + self.len]
    }
}

/// How a path is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPaint {
    /// Stroked (`S`, `s`)
    Stroke,
    /// Filled (`f`, `F`, `f*`)
    Fill,
    /// Filled and stroked (`B`, `B*`, `b`, `b*`)
    FillStroke,
    /// Consumed without painting (`n`, clip-only paths)
    Clip,
}

/// One interpreted content-stream operation.
///
/// Bounding boxes are axis-aligned, in top-left-origin PDF points: native
/// coordinates transformed through the CTM (and text matrix for text), then
/// Y-flipped through the page height.
#[derive(Debug, Clone)]
pub enum Operation {
    /// A text-showing operator (`Tj`, `TJ`, `'`, `"`)
    Text {
        /// Best-effort decoded text (used for the redacted-terms log)
        text: String,
        /// Font resource name active at the show
        font_name: Option<String>,
        /// Font size active at the show
        font_size: f64,
        /// Bounding box in top-left PDF points
        bbox_top_left: Rect,
        /// Source byte range
        raw: RawSpan,
    },
    /// A painted path (construction operators through the painting operator)
    Path {
        /// How the path was painted
        kind: PathPaint,
        /// Bounding box in top-left PDF points
        bbox_top_left: Rect,
        /// Fill color in effect when painted
        fill_rgb: [f64; 3],
        /// True when every subpath came from `re`
        from_rect: bool,
        /// Source byte range
        raw: RawSpan,
    },
    /// An XObject invocation (`Do`), treated as an image placement
    ImageXObject {
        /// Resource name after `/`
        resource_name: String,
        /// Bounding box in top-left PDF points (CTM image of the unit square)
        bbox_top_left: Rect,
        /// Source byte range
        raw: RawSpan,
    },
    /// An inline image (`BI ... ID ... EI`)
    InlineImage {
        /// /W entry of the image dictionary
        width: i64,
        /// /H entry of the image dictionary
        height: i64,
        /// Bounding box in top-left PDF points (CTM image of the unit square)
        bbox_top_left: Rect,
        /// Source byte range
        raw: RawSpan,
    },
    /// Any operator preserved verbatim (state, color, CTM, text position...)
    Opaque {
        /// Source byte range
        raw: RawSpan,
    },
}

impl Operation {
    /// The operation's bounding box; `None` for `Opaque`.
    pub fn bbox_top_left(&self) -> Option<Rect> {
        match self {
            Operation::Text { bbox_top_left, .. }
            | Operation::Path { bbox_top_left, .. }
            | Operation::ImageXObject { bbox_top_left, .. }
            | Operation::InlineImage { bbox_top_left, .. } => Some(*bbox_top_left),
            Operation::Opaque { .. } => None,
        }
    }

    /// The source byte range.
    pub fn raw(&self) -> RawSpan {
        match self {
            Operation::Text { raw, .. }
            | Operation::Path { raw, .. }
            | Operation::ImageXObject { raw, .. }
            | Operation::InlineImage { raw, .. }
            | Operation::Opaque { raw } => *raw,
        }
    }

    /// True for the `Opaque` variant.
    pub fn is_opaque(&self) -> bool {
        matches!(self, Operation::Opaque { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_span_slicing() {
        let source = b"q 1 0 0 1 5 5 cm Q";
        let span = RawSpan { offset: 2, len: 14 };
        assert_eq!(span.bytes(source), b"1 0 0 1 5 5 cm");
    }

    #[test]
    fn test_opaque_has_no_bbox() {
        let op = Operation::Opaque {
            raw: RawSpan { offset: 0, len: 1 },
        };
        assert!(op.bbox_top_left().is_none());
        assert!(op.is_opaque());
    }

    #[test]
    fn test_text_bbox_accessor() {
        let op = Operation::Text {
            text: "hi".to_string(),
            font_name: Some("F1".to_string()),
            font_size: 12.0,
            bbox_top_left: Rect::new(1.0, 2.0, 3.0, 4.0),
            raw: RawSpan { offset: 0, len: 0 },
        };
        assert_eq!(op.bbox_top_left(), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
        assert!(!op.is_opaque());
    }
}
