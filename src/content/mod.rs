//! Content-stream interpretation.
//!
//! [`parser`] turns a page's consolidated content-stream bytes into typed
//! [`operators::Operation`] records with top-left bounding boxes, tracking
//! the full graphics and text state as it goes. The records carry raw byte
//! spans back into the source buffer so a rebuild can re-emit kept
//! operations byte-exact.

pub mod graphics_state;
pub mod metrics;
pub mod operators;
pub mod parser;

pub use graphics_state::{GraphicsState, GraphicsStateStack, Matrix};
pub use operators::{Operation, PathPaint, RawSpan};
pub use parser::{parse_content, GlyphBox, ParsedContent};
