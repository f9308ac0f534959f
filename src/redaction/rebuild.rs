//! Stream rebuilding.
//!
//! Kept operations are re-emitted from their raw spans in original order,
//! joined by single newlines. Because spans run from first operand through
//! operator keyword, the output is valid content-stream syntax and
//! byte-identical to the source modulo inter-operator whitespace.

use crate::content::Operation;

/// Serialize kept operations back into one consolidated content stream.
pub fn rebuild_stream(source: &[u8], kept: &[Operation]) -> Vec<u8> {
    let total: usize = kept.iter().map(|op| op.raw().len + 1).sum();
    let mut out = Vec::with_capacity(total);
    for (i, op) in kept.iter().enumerate() {
        if i > 0 {
            out.push(b'\n');
        }
        out.extend_from_slice(op.raw().bytes(source));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_content;

    #[test]
    fn test_full_rebuild_is_reparseable_and_equivalent() {
        let source = b"q 1 0 0 1 5 5 cm BT /F1 12 Tf 100 700 Td (Hello) Tj ET Q";
        let parsed = parse_content(source, 792.0).unwrap();
        let rebuilt = rebuild_stream(source, &parsed.operations);

        let reparsed = parse_content(&rebuilt, 792.0).unwrap();
        assert_eq!(reparsed.operations.len(), parsed.operations.len());

        // Byte-identical modulo whitespace.
        let strip = |b: &[u8]| {
            b.iter()
                .filter(|c| !c.is_ascii_whitespace())
                .copied()
                .collect::<Vec<u8>>()
        };
        assert_eq!(strip(&rebuilt), strip(source));
    }

    #[test]
    fn test_partial_rebuild_drops_removed_spans() {
        let source = b"BT (keep) Tj ET 10 10 50 50 re f";
        let parsed = parse_content(source, 792.0).unwrap();
        let kept: Vec<_> = parsed
            .operations
            .into_iter()
            .filter(|op| !matches!(op, crate::content::Operation::Path { .. }))
            .collect();
        let rebuilt = rebuild_stream(source, &kept);
        let text = String::from_utf8_lossy(&rebuilt);
        assert!(text.contains("(keep) Tj"));
        assert!(!text.contains("re"));
    }

    #[test]
    fn test_empty_keep_list() {
        assert!(rebuild_stream(b"whatever", &[]).is_empty());
    }
}
