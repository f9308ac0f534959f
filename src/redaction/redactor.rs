//! The redaction orchestrator.
//!
//! One [`Redactor`] instance owns one session: the render DPI its callers
//! select regions at, and the log of text removed so far (consumed by the
//! metadata sanitizer). Two callers with two instances never see each
//! other's terms.
//!
//! Per call, the flow is: resolve rotation → convert coordinates → validate
//! (warn only) → parse → filter → rebuild → replace → paint overlay → clean
//! resources → record terms. A parse failure stops the call before any
//! mutation; the one thing this module never does is draw a cosmetic
//! rectangle over content it failed to remove.

use crate::document::PdfDocument;
use crate::error::{Error, Result};
use crate::extractors::{letters_from_glyphs, LetterIndex};
use crate::geometry::coords::{
    image_rect_to_pdf_rect, is_valid_for_page, pdf_pt_to_image_px, transform_for_rotation,
};
use crate::geometry::Rect;
use crate::redaction::rebuild::rebuild_stream;
use crate::redaction::{
    filter_operations, metadata, overlay, resources, RedactionMode, RedactionOptions,
    RedactionResult,
};

/// Default render DPI for selection rectangles.
pub const DEFAULT_RENDER_DPI: f64 = 150.0;

/// Tolerance in points for the page-bounds sanity warning.
const PAGE_BOUNDS_TOLERANCE_PT: f64 = 50.0;

/// Session-scoped redaction driver.
#[derive(Debug)]
pub struct Redactor {
    render_dpi: f64,
    redacted_terms: Vec<String>,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Redactor {
    /// A redactor at the default 150 DPI.
    pub fn new() -> Self {
        Self {
            render_dpi: DEFAULT_RENDER_DPI,
            redacted_terms: Vec::new(),
        }
    }

    /// A redactor for selections made at a specific render DPI.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `render_dpi` is zero or negative.
    pub fn with_dpi(render_dpi: f64) -> Result<Self> {
        if render_dpi <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "render_dpi must be positive, got {}",
                render_dpi
            )));
        }
        Ok(Self {
            render_dpi,
            redacted_terms: Vec::new(),
        })
    }

    /// Text removed so far in this session.
    pub fn redacted_terms(&self) -> &[String] {
        &self.redacted_terms
    }

    /// Clear the session term log.
    pub fn clear_redacted_terms(&mut self) {
        self.redacted_terms.clear();
    }

    /// Redact one rectangle (image-pixel space) on one page.
    pub fn redact_area(
        &mut self,
        doc: &mut PdfDocument,
        page_index: usize,
        rect_image_px: Rect,
    ) -> Result<RedactionResult> {
        self.redact_area_with_color(doc, page_index, rect_image_px, [0, 0, 0])
    }

    /// Redact several rectangles on one page.
    pub fn redact_areas(
        &mut self,
        doc: &mut PdfDocument,
        page_index: usize,
        rects_image_px: &[Rect],
    ) -> Result<Vec<RedactionResult>> {
        rects_image_px
            .iter()
            .map(|rect| self.redact_area(doc, page_index, *rect))
            .collect()
    }

    /// Redact rectangles, then apply the metadata options.
    ///
    /// The session term log is cleared at the start, so the sanitizer sees
    /// exactly the terms this batch removed.
    pub fn redact_with_options(
        &mut self,
        doc: &mut PdfDocument,
        page_index: usize,
        rects_image_px: &[Rect],
        options: &RedactionOptions,
    ) -> Result<Vec<RedactionResult>> {
        self.clear_redacted_terms();

        let fill = [options.fill_color[0], options.fill_color[1], options.fill_color[2]];
        let results: Vec<RedactionResult> = rects_image_px
            .iter()
            .map(|rect| self.redact_area_with_color(doc, page_index, *rect, fill))
            .collect::<Result<_>>()?;

        if options.remove_all_metadata {
            metadata::remove_all_metadata(doc)?;
        } else if options.sanitize_metadata {
            metadata::sanitize_metadata(doc, &self.redacted_terms)?;
        }
        Ok(results)
    }

    /// Scrub the current session's terms from document metadata.
    pub fn sanitize_document_metadata(&self, doc: &mut PdfDocument) -> Result<()> {
        metadata::sanitize_metadata(doc, &self.redacted_terms)
    }

    fn redact_area_with_color(
        &mut self,
        doc: &mut PdfDocument,
        page_index: usize,
        rect_image_px: Rect,
        fill_rgb: [u8; 3],
    ) -> Result<RedactionResult> {
        if rect_image_px.width < 0.0 || rect_image_px.height < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "redaction rectangle has negative dimensions: {}x{}",
                rect_image_px.width, rect_image_px.height
            )));
        }

        let page_width = doc.page_width_points(page_index)?;
        let page_height = doc.page_height_points(page_index)?;

        // 1. Resolve rotation. The selection was made against the rotated
        // rendering, so pre-rotate it back into unrotated page space using
        // pixel dimensions.
        let rotation = doc.page_rotation(page_index)?;
        let rect_image_px = if rotation != 0 {
            let page_width_px = pdf_pt_to_image_px(page_width, self.render_dpi)?;
            let page_height_px = pdf_pt_to_image_px(page_height, self.render_dpi)?;
            transform_for_rotation(&rect_image_px, rotation, page_width_px, page_height_px)
        } else {
            rect_image_px
        };

        // 2. Convert to top-left PDF points.
        let area = image_rect_to_pdf_rect(&rect_image_px, self.render_dpi)?;

        // 3. Sanity check; a warning, not a gate.
        if !is_valid_for_page(&area, page_width, page_height, PAGE_BOUNDS_TOLERANCE_PT) {
            log::warn!(
                "redaction area {:?} is outside page {} ({}x{} pt)",
                area,
                page_index,
                page_width,
                page_height
            );
        }

        // 4. Parse. A stream we cannot fully interpret means no redaction
        // happens at all; visual-only fallback here would hide live content
        // under a rectangle.
        let content = doc.page_contents(page_index)?;
        let parsed = match crate::content::parse_content(&content, page_height) {
            Ok(parsed) => parsed,
            Err(e @ Error::MalformedContent { .. }) => {
                log::error!("page {} content is malformed, refusing to redact: {}", page_index, e);
                return Ok(RedactionResult::failed());
            },
            Err(e) => return Err(e),
        };
        let letters = LetterIndex::from_letters(letters_from_glyphs(parsed.glyphs));

        // 5. Filter.
        let outcome =
            filter_operations(parsed.operations, &content, &area, &letters, page_height);

        if outcome.nothing_removed() {
            // Either the area was empty or the coordinates were wrong;
            // draw the overlay and say so honestly.
            log::warn!(
                "redaction area on page {} removed no operations; drawing overlay only",
                page_index
            );
            let mut unchanged = content;
            overlay::append_overlay(&mut unchanged, &area, page_height, fill_rgb);
            doc.set_page_contents(page_index, unchanged)?;
            return Ok(RedactionResult {
                mode: RedactionMode::VisualOnly,
                content_removed: false,
                visual_drawn: true,
                text_removed: 0,
                image_removed: 0,
                graphics_removed: 0,
            });
        }

        // 6. Rebuild, paint the overlay, and replace atomically.
        let mut rebuilt = rebuild_stream(&content, &outcome.kept);
        overlay::append_overlay(&mut rebuilt, &area, page_height, fill_rgb);
        doc.set_page_contents(page_index, rebuilt)
            .map_err(|e| Error::RedactionFailed(format!("content replace failed: {}", e)))?;

        // 7. Clean orphaned image resources.
        resources::clean_unused_xobjects(doc, page_index, &outcome.removed, &outcome.kept)?;

        // 8. Record removed text for the metadata sanitizer.
        self.redacted_terms.extend(outcome.removed_text.iter().cloned());

        Ok(RedactionResult {
            mode: RedactionMode::TrueRedaction,
            content_removed: true,
            visual_drawn: true,
            text_removed: outcome.text_removed,
            image_removed: outcome.image_removed,
            graphics_removed: outcome.graphics_removed,
        })
    }
}
