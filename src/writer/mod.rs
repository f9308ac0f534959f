//! PDF writing.
//!
//! A full-rewrite serializer: every reachable object is emitted into a fresh
//! body with a classic cross-reference table. Incremental update is
//! deliberately not offered, because appending to a redacted file would
//! leave the previous generation of every stream recoverable from the tail.

mod object_serializer;
mod pdf_writer;

pub use object_serializer::{serialize_indirect_object, serialize_object};
pub use pdf_writer::write_document;
