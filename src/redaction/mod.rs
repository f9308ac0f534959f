//! The redaction pipeline.
//!
//! [`redactor::Redactor`] drives the flow for one request: convert
//! coordinates, parse the page, filter operations against the rectangle,
//! rebuild and replace the content stream, paint the opaque overlay, clean
//! orphaned resources, and log removed text. [`verifier`] re-parses saved
//! output and reports any text that still intersects an overlay rectangle.

pub mod filter;
pub mod metadata;
pub mod overlay;
pub mod redactor;
pub mod resources;
pub mod verifier;

mod rebuild;

pub use filter::{filter_operations, FilterOutcome};
pub use metadata::{remove_all_metadata, sanitize_metadata};
pub use redactor::Redactor;
pub use verifier::{verify, verify_file};

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// What a redaction call actually achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedactionMode {
    /// Content operators were removed; the overlay is cosmetic
    TrueRedaction,
    /// Nothing intersected the rectangle; only the overlay was drawn
    VisualOnly,
    /// The page could not be redacted; the file was not modified
    Failed,
}

/// Structured outcome of one redaction call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionResult {
    /// Outcome class
    pub mode: RedactionMode,
    /// True when at least one operation was removed
    pub content_removed: bool,
    /// True when the opaque overlay was appended
    pub visual_drawn: bool,
    /// Number of text operations removed
    pub text_removed: u32,
    /// Number of image operations removed (XObject and inline)
    pub image_removed: u32,
    /// Number of path operations removed
    pub graphics_removed: u32,
}

impl RedactionResult {
    /// A failure result: nothing removed, nothing drawn.
    pub fn failed() -> Self {
        Self {
            mode: RedactionMode::Failed,
            content_removed: false,
            visual_drawn: false,
            text_removed: 0,
            image_removed: 0,
            graphics_removed: 0,
        }
    }
}

/// Options for [`Redactor::redact_with_options`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionOptions {
    /// Scrub session redacted terms from document metadata afterwards
    pub sanitize_metadata: bool,
    /// Replace the Info dictionary and delete the XMP stream afterwards
    pub remove_all_metadata: bool,
    /// Overlay fill color, RGBA (alpha is accepted for API symmetry; the
    /// painted rectangle is always opaque). The verifier recognizes the
    /// overlay by its fixed byte shape, so any color is safe to use.
    pub fill_color: [u8; 4],
}

impl Default for RedactionOptions {
    fn default() -> Self {
        Self {
            sanitize_metadata: false,
            remove_all_metadata: false,
            fill_color: [0, 0, 0, 255],
        }
    }
}

/// A text operation that survived in the overlap of an overlay rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationLeak {
    /// Page the leak was found on
    pub page_index: usize,
    /// Decoded text of the leaking operation
    pub text: String,
    /// Bounding box in top-left PDF points
    pub bbox_top_left: Rect,
}

/// Result of a post-hoc verification pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True when no leaks were found
    pub passed: bool,
    /// Every text operation intersecting an overlay rectangle
    pub leaks: Vec<VerificationLeak>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_opaque_black() {
        let options = RedactionOptions::default();
        assert!(!options.sanitize_metadata);
        assert!(!options.remove_all_metadata);
        assert_eq!(options.fill_color, [0, 0, 0, 255]);
    }

    #[test]
    fn test_failed_result_shape() {
        let result = RedactionResult::failed();
        assert_eq!(result.mode, RedactionMode::Failed);
        assert!(!result.content_removed);
        assert!(!result.visual_drawn);
    }

    #[test]
    fn test_report_serializes() {
        let report = VerificationReport {
            passed: false,
            leaks: vec![VerificationLeak {
                page_index: 0,
                text: "oops".to_string(),
                bbox_top_left: Rect::new(1.0, 2.0, 3.0, 4.0),
            }],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"passed\":false"));
        assert!(json.contains("oops"));
    }
}
