//! Whole-document emission: header, body, xref table, trailer.

use crate::document::PdfDocument;
use crate::error::Result;
use crate::object::{Object, ObjectRef};
use crate::writer::serialize_indirect_object;
use std::collections::HashMap;

/// Trailer keys that describe the previous file layout and must not survive
/// a full rewrite.
const STALE_TRAILER_KEYS: &[&str] = &["Prev", "XRefStm", "Type", "W", "Index", "Length", "Filter", "DecodeParms"];

/// Serialize `doc` into a complete PDF file.
///
/// The header preserves the version detected at load time. Objects that
/// lived in object streams come out as regular indirect objects; the
/// dissolved containers are skipped by [`PdfDocument::all_object_ids`].
pub fn write_document(doc: &mut PdfDocument) -> Result<Vec<u8>> {
    let (major, minor) = doc.version();
    let mut out = format!("%PDF-{}.{}\n", major, minor).into_bytes();
    // Binary marker comment so transfer tools treat the file as binary.
    out.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

    let ids = doc.all_object_ids()?;
    let mut offsets: HashMap<u32, usize> = HashMap::with_capacity(ids.len());

    for id in &ids {
        let object = doc.load_object(ObjectRef::new(*id, 0))?;
        offsets.insert(*id, out.len());
        out.extend_from_slice(&serialize_indirect_object(*id, 0, &object));
    }

    let max_id = ids.iter().copied().max().unwrap_or(0);
    let xref_offset = out.len();

    out.extend_from_slice(format!("xref\n0 {}\n", max_id + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for id in 1..=max_id {
        match offsets.get(&id) {
            Some(offset) => {
                out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
            },
            None => {
                out.extend_from_slice(b"0000000000 65535 f \n");
            },
        }
    }

    out.extend_from_slice(b"trailer\n");
    let mut trailer = doc.trailer().clone();
    for key in STALE_TRAILER_KEYS {
        trailer.shift_remove(*key);
    }
    trailer.insert("Size".to_string(), Object::Integer(max_id as i64 + 1));
    let mut trailer_bytes = Vec::new();
    crate::writer::serialize_object(&Object::Dictionary(trailer), &mut trailer_bytes);
    out.extend_from_slice(&trailer_bytes);
    out.extend_from_slice(format!("\nstartxref\n{}\n%%EOF\n", xref_offset).as_bytes());

    Ok(out)
}
