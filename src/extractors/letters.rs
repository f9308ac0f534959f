//! Per-character layout: the letter index.
//!
//! An independent text-layout pass over a page's content produces one
//! [`Letter`] per shown glyph, with its extent in PDF-native bottom-left
//! points. The spatial filter consults this index to make character-level
//! keep/remove decisions when a text operation only partially overlaps a
//! redaction rectangle.

use crate::content::parse_content;
use crate::error::Result;
use crate::geometry::{Point, Rect};

/// One laid-out character on a page.
#[derive(Debug, Clone)]
pub struct Letter {
    /// The character, best-effort decoded (U+FFFD when the byte code has no
    /// ASCII mapping)
    pub ch: char,
    /// Glyph extent in PDF-native bottom-left points
    pub glyph_rect: Rect,
    /// Baseline start point of the glyph
    pub baseline_start: Point,
}

/// Run the text-layout pass over decoded content bytes.
pub fn extract_letters(content: &[u8], page_height: f64) -> Result<Vec<Letter>> {
    let parsed = parse_content(content, page_height)?;
    Ok(letters_from_glyphs(parsed.glyphs))
}

/// Convert the parser's per-glyph geometry into letters.
///
/// Callers that already hold a parse result use this instead of paying for
/// a second pass.
pub fn letters_from_glyphs(glyphs: Vec<crate::content::GlyphBox>) -> Vec<Letter> {
    glyphs
        .into_iter()
        .map(|glyph| Letter {
            ch: if (0x20..=0x7E).contains(&glyph.code) {
                glyph.code as char
            } else {
                '\u{FFFD}'
            },
            glyph_rect: glyph.rect,
            baseline_start: glyph.baseline_start,
        })
        .collect()
}

/// Queryable per-page letter table, built once per page per request.
#[derive(Debug, Default)]
pub struct LetterIndex {
    letters: Vec<Letter>,
}

impl LetterIndex {
    /// Build the index from decoded content bytes.
    pub fn build(content: &[u8], page_height: f64) -> Result<Self> {
        Ok(Self {
            letters: extract_letters(content, page_height)?,
        })
    }

    /// Wrap an existing letter list (e.g. from another extraction service).
    pub fn from_letters(letters: Vec<Letter>) -> Self {
        Self { letters }
    }

    /// All letters in layout order.
    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    /// True when the page produced no letters at all.
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Letters whose center falls inside `region_top_left` (top-left PDF
    /// points), the association rule used to match letters to a text
    /// operation's bounding box.
    pub fn letters_in_region<'a>(
        &'a self,
        region_top_left: &Rect,
        page_height: f64,
    ) -> impl Iterator<Item = &'a Letter> {
        let region = *region_top_left;
        self.letters.iter().filter(move |letter| {
            let center = letter.glyph_rect.center();
            let center_top_left = Point::new(center.x, page_height - center.y);
            region.contains_point(&center_top_left)
        })
    }
}
