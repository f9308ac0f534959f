//! Extraction passes over page content.
//!
//! Only the text-layout pass survives in this crate: it feeds the letter
//! index that character-level redaction decisions are made against.

pub mod letters;

pub use letters::{extract_letters, letters_from_glyphs, Letter, LetterIndex};
