// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::match_like_matches_macro)]

//! # pdf_redact
//!
//! True PDF redaction: remove (not merely cover) text, vector graphics,
//! and images from selected page regions, so copy/paste, search, indexing,
//! and forensic extraction cannot recover the content. Document metadata
//! that might echo redacted terms is scrubbed, and a verifier re-parses the
//! output to prove no text survived under an overlay.
//!
//! ## Pipeline
//!
//! content-stream parser → graphics-state tracker → spatial filter →
//! stream rebuilder → opaque-overlay painter → leakage verifier, glued by a
//! coordinate converter (image pixels, top-left points, bottom-left points
//! all meet here, and a sign error is a security hole, not a rendering
//! glitch).
//!
//! ## Quick start
//!
//! ```no_run
//! use pdf_redact::{PdfDocument, Redactor};
//! use pdf_redact::geometry::Rect;
//!
//! # fn main() -> Result<(), pdf_redact::Error> {
//! let mut doc = PdfDocument::open("report.pdf")?;
//! let mut redactor = Redactor::new(); // selections made at 150 dpi
//!
//! // Rectangle in image-pixel space over the rendered page.
//! let area = Rect::new(208.0, 191.0, 125.0, 25.0);
//! let result = redactor.redact_area(&mut doc, 0, area)?;
//! println!("removed {} text operations", result.text_removed);
//!
//! doc.save("report.redacted.pdf")?;
//! let report = pdf_redact::verify_file("report.redacted.pdf")?;
//! assert!(report.passed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees
//!
//! - A content stream that cannot be fully parsed is never redacted: the
//!   call reports failure instead of drawing a cosmetic rectangle.
//! - Kept operations are re-emitted byte-exact, in original order.
//! - The overlay has a fixed, locale-independent byte shape.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Core PDF parsing
pub mod document;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod xref;

// Stream decoders
pub mod decoders;

// Geometry and coordinate conversion
pub mod geometry;

// Content-stream interpretation
pub mod content;

// Per-character layout (letter index)
pub mod extractors;

// The redaction pipeline
pub mod redaction;

// Shared bitmap cache for the rendering collaborator
pub mod render_cache;

// PDF writing
pub mod writer;

// Re-exports
pub use document::PdfDocument;
pub use error::{Error, Result};
pub use redaction::{
    remove_all_metadata, sanitize_metadata, verify, verify_file, RedactionMode, RedactionOptions,
    RedactionResult, Redactor, VerificationLeak, VerificationReport,
};

#[cfg(test)]
pub(crate) mod testutil;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
