//! Spatial keep/remove decisions.
//!
//! Given the ordered operation list, a redaction rectangle in top-left PDF
//! points, and the page's letter index, decide the fate of each operation:
//!
//! 1. `Opaque` operations are always kept; removing a state or color setter
//!    would change what every later kept operation means.
//! 2. `Text` operations are judged letter by letter where the index has
//!    letters for them (center-inside, strict edges), falling back to
//!    bounding-box intersection otherwise.
//! 3. Paths and images are removed on bounding-box intersection, half-open.

use crate::content::Operation;
use crate::extractors::LetterIndex;
use crate::geometry::coords::rect_top_left_to_bottom_left;
use crate::geometry::Rect;

/// Tolerance in points when associating letters with a text operation's
/// bounding box; absorbs approximate font metrics.
const LETTER_MATCH_TOLERANCE_PT: f64 = 5.0;

/// Result of filtering one page against one rectangle.
#[derive(Debug, Default)]
pub struct FilterOutcome {
    /// Operations to keep, in original order
    pub kept: Vec<Operation>,
    /// Operations that were removed
    pub removed: Vec<Operation>,
    /// Decoded text of every removed text operation
    pub removed_text: Vec<String>,
    /// Count of removed text operations
    pub text_removed: u32,
    /// Count of removed image operations (XObject + inline)
    pub image_removed: u32,
    /// Count of removed path operations
    pub graphics_removed: u32,
}

impl FilterOutcome {
    /// True when nothing was removed.
    pub fn nothing_removed(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Partition operations into kept and removed against `rect_top_left`.
///
/// `source` is the consolidated stream the operations were parsed from; the
/// filter needs it to recognize overlay rectangles this system painted on a
/// previous pass (kept, so re-redacting the same area removes nothing).
pub fn filter_operations(
    operations: Vec<Operation>,
    source: &[u8],
    rect_top_left: &Rect,
    letters: &LetterIndex,
    page_height: f64,
) -> FilterOutcome {
    let rect_bottom_left = rect_top_left_to_bottom_left(rect_top_left, page_height);
    let mut outcome = FilterOutcome::default();

    for operation in operations {
        let remove = match &operation {
            Operation::Opaque { .. } => false,
            Operation::Text { bbox_top_left, .. } => text_intersects(
                bbox_top_left,
                rect_top_left,
                &rect_bottom_left,
                letters,
                page_height,
            ),
            // Clip-only paths paint nothing, but their geometry is still
            // recoverable from the stream; they follow the same bbox rule.
            Operation::Path {
                bbox_top_left, raw, ..
            } => {
                bbox_top_left.intersects(rect_top_left)
                    && !crate::redaction::overlay::is_overlay_span(raw.bytes(source))
            },
            Operation::ImageXObject { bbox_top_left, .. }
            | Operation::InlineImage { bbox_top_left, .. } => {
                bbox_top_left.intersects(rect_top_left)
            },
        };

        if remove {
            match &operation {
                Operation::Text { text, .. } => {
                    outcome.text_removed += 1;
                    if !text.is_empty() {
                        outcome.removed_text.push(text.clone());
                    }
                },
                Operation::Path { .. } => outcome.graphics_removed += 1,
                Operation::ImageXObject { .. } | Operation::InlineImage { .. } => {
                    outcome.image_removed += 1;
                },
                Operation::Opaque { .. } => unreachable!("opaque is never removed"),
            }
            outcome.removed.push(operation);
        } else {
            outcome.kept.push(operation);
        }
    }

    outcome
}

/// Character-level decision for a text operation.
///
/// When the letter index associates letters with this operation (letter
/// center inside the tolerance-expanded bbox), the operation is removed iff
/// any such letter's center lies strictly inside the redaction rectangle.
/// With no associated letters the bbox-intersection fallback applies.
fn text_intersects(
    bbox_top_left: &Rect,
    rect_top_left: &Rect,
    rect_bottom_left: &Rect,
    letters: &LetterIndex,
    page_height: f64,
) -> bool {
    let association_region = bbox_top_left.expand(LETTER_MATCH_TOLERANCE_PT);
    let mut any_matched = false;

    for letter in letters.letters_in_region(&association_region, page_height) {
        any_matched = true;
        if rect_bottom_left.contains_point(&letter.glyph_rect.center()) {
            return true;
        }
    }

    if any_matched {
        // Letters were associated and none fell inside the rectangle.
        return false;
    }
    bbox_top_left.intersects(rect_top_left)
}
