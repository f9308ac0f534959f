//! Error types for the redaction library.
//!
//! One `Error` enum covers the document layer (header, xref, object
//! resolution) and the redaction core (coordinate validation, content-stream
//! parsing, rebuild/replace). The taxonomy matters operationally: a
//! `MalformedContent` during a redaction pass is a hard stop, never a silent
//! fallback to drawing an overlay over content that is still in the file.

/// Result type alias for redaction library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, redacting, or saving a PDF.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid PDF header (expected '%PDF-')
    #[error("Invalid PDF header: expected '%PDF-', found '{0}'")]
    InvalidHeader(String),

    /// Parse error at specific byte offset in the document body
    #[error("Failed to parse object at byte {offset}: {reason}")]
    ParseError {
        /// Byte offset where the error occurred
        offset: usize,
        /// Reason for the parse failure
        reason: String,
    },

    /// Invalid or unlocatable cross-reference table
    #[error("Invalid cross-reference table")]
    InvalidXref,

    /// Referenced object not found in the cross-reference table
    #[error("Object not found: {0} {1} R")]
    ObjectNotFound(u32, u16),

    /// Object has wrong type
    #[error("Invalid object type: expected {expected}, found {found}")]
    InvalidObjectType {
        /// Expected object type
        expected: String,
        /// Actual object type found
        found: String,
    },

    /// Unexpected end of file
    #[error("End of file reached unexpectedly")]
    UnexpectedEof,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stream decoding error
    #[error("Stream decoding error: {0}")]
    Decode(String),

    /// Unsupported stream filter
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// Unsupported feature (encrypted input, exotic structures)
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Caller handed us something unusable: bad DPI, negative rectangle,
    /// out-of-range page index.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A page content stream the parser cannot continue through.
    ///
    /// Unbalanced `q`/`Q`, an unterminated string, bytes that lex as nothing.
    /// The orchestrator treats this as a hard failure: no redacted file is
    /// produced from a stream we could not fully interpret.
    #[error("Malformed content stream at byte {offset}: {reason}")]
    MalformedContent {
        /// Offset into the consolidated page content stream
        offset: usize,
        /// Reason the interpreter stopped
        reason: String,
    },

    /// Parsing succeeded but the rebuilt stream could not be written back.
    /// The caller is told redaction did not occur.
    #[error("Redaction failed: {0}")]
    RedactionFailed(String),
}
