//! Document-level metadata sanitization.
//!
//! Redacting page content is not enough when the redacted term also sits in
//! the Info dictionary, the XMP packet, an outline title, or a name-tree
//! label. [`sanitize_metadata`] scrubs a term list from all of those;
//! [`remove_all_metadata`] is the blunt mode that empties the Info
//! dictionary and deletes the XMP stream outright.

use crate::document::PdfDocument;
use crate::error::Result;
use crate::object::{Dict, Object, ObjectRef};
use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};
use regex::Regex;
use std::collections::HashSet;

/// Info dictionary keys that can carry free text.
const INFO_TEXT_KEYS: &[&str] = &["Title", "Author", "Subject", "Keywords", "Producer", "Creator"];

/// Scrub every term from the document's metadata surfaces.
///
/// Matching is case-insensitive and literal (terms are regex-escaped).
/// Occurrences are stripped, not masked, so no length information survives.
pub fn sanitize_metadata(doc: &mut PdfDocument, terms: &[String]) -> Result<()> {
    let patterns = build_patterns(terms);
    if patterns.is_empty() {
        return Ok(());
    }

    sanitize_info(doc, &patterns)?;
    sanitize_xmp(doc, &patterns)?;
    sanitize_outlines(doc, &patterns)?;
    sanitize_name_trees(doc, &patterns)?;
    Ok(())
}

/// Replace the Info dictionary with an empty one and delete the XMP stream.
pub fn remove_all_metadata(doc: &mut PdfDocument) -> Result<()> {
    doc.set_info_dict(Dict::new())?;

    let catalog = doc.catalog()?;
    if catalog.contains_key("Metadata") {
        match doc.catalog_ref() {
            Some(catalog_ref) => {
                let mut catalog = catalog;
                catalog.shift_remove("Metadata");
                doc.set_object(catalog_ref.id, Object::Dictionary(catalog));
            },
            None => log::warn!("catalog is a direct object, cannot delete /Metadata"),
        }
    }
    Ok(())
}

fn build_patterns(terms: &[String]) -> Vec<Regex> {
    terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .filter_map(|term| {
            regex::RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
                .ok()
        })
        .collect()
}

/// Remove every pattern occurrence from `text`.
fn scrub_text(text: &str, patterns: &[Regex]) -> String {
    let mut result = text.to_string();
    for pattern in patterns {
        result = pattern.replace_all(&result, "").into_owned();
    }
    result
}

/// Decode a PDF text string: UTF-16BE with BOM, else Latin-1.
fn pdf_string_to_text(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let code_units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&code_units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

/// Encode text back into a PDF string: Latin-1 when possible, UTF-16BE
/// with BOM otherwise.
fn text_to_pdf_string(text: &str) -> Vec<u8> {
    if text.chars().all(|c| (c as u32) <= 0xFF) {
        text.chars().map(|c| c as u8).collect()
    } else {
        let mut out = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            out.extend_from_slice(&unit.to_be_bytes());
        }
        out
    }
}

/// Scrub a string-valued object in place; true when it changed.
fn scrub_string_object(object: &mut Object, patterns: &[Regex]) -> bool {
    if let Object::String(bytes) = object {
        let text = pdf_string_to_text(bytes);
        let cleaned = scrub_text(&text, patterns);
        if cleaned != text {
            *object = Object::String(text_to_pdf_string(&cleaned));
            return true;
        }
    }
    false
}

fn sanitize_info(doc: &mut PdfDocument, patterns: &[Regex]) -> Result<()> {
    let mut info = match doc.info_dict()? {
        Some(d) => d,
        None => return Ok(()),
    };

    let mut changed = false;
    for key in INFO_TEXT_KEYS {
        if let Some(value) = info.get_mut(*key) {
            changed |= scrub_string_object(value, patterns);
        }
    }
    if changed {
        doc.set_info_dict(info)?;
    }
    Ok(())
}

fn sanitize_xmp(doc: &mut PdfDocument, patterns: &[Regex]) -> Result<()> {
    let catalog = doc.catalog()?;
    let metadata_ref = match catalog.get("Metadata").and_then(|o| o.as_reference()) {
        Some(r) => r,
        None => return Ok(()),
    };
    let stream = doc.load_object(metadata_ref)?;
    let (mut dict, data) = match &stream {
        Object::Stream { dict, .. } => (dict.clone(), stream.decode_stream_data()?),
        _ => return Ok(()),
    };

    let cleaned = scrub_xmp_packet(&data, patterns);
    if cleaned == data {
        return Ok(());
    }

    // Rewritten packets go back uncompressed.
    dict.shift_remove("Filter");
    dict.shift_remove("DecodeParms");
    dict.insert("Length".to_string(), Object::Integer(cleaned.len() as i64));
    doc.set_object(
        metadata_ref.id,
        Object::Stream {
            dict,
            data: bytes::Bytes::from(cleaned),
        },
    );
    Ok(())
}

/// Rewrite an XMP packet with every text node scrubbed.
///
/// Falls back to a whole-packet textual scrub when the XML does not parse;
/// leaking a term because the packet was malformed is not acceptable.
fn scrub_xmp_packet(xml: &[u8], patterns: &[Regex]) -> Vec<u8> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Text(text_event)) => {
                let text = match text_event.unescape() {
                    Ok(cow) => cow.into_owned(),
                    Err(_) => return scrub_packet_textually(xml, patterns),
                };
                let cleaned = scrub_text(&text, patterns);
                if writer.write_event(Event::Text(BytesText::new(&cleaned))).is_err() {
                    return scrub_packet_textually(xml, patterns);
                }
            },
            Ok(event) => {
                if writer.write_event(event).is_err() {
                    return scrub_packet_textually(xml, patterns);
                }
            },
            Err(e) => {
                log::warn!("XMP packet does not parse as XML ({}), scrubbing textually", e);
                return scrub_packet_textually(xml, patterns);
            },
        }
        buf.clear();
    }
    writer.into_inner()
}

fn scrub_packet_textually(xml: &[u8], patterns: &[Regex]) -> Vec<u8> {
    let text = String::from_utf8_lossy(xml);
    scrub_text(&text, patterns).into_bytes()
}

/// Walk the outline tree and scrub every /Title.
fn sanitize_outlines(doc: &mut PdfDocument, patterns: &[Regex]) -> Result<()> {
    let catalog = doc.catalog()?;
    let outlines_ref = match catalog.get("Outlines").and_then(|o| o.as_reference()) {
        Some(r) => r,
        None => return Ok(()),
    };

    let mut queue: Vec<ObjectRef> = vec![outlines_ref];
    let mut visited: HashSet<ObjectRef> = HashSet::new();

    while let Some(node_ref) = queue.pop() {
        if !visited.insert(node_ref) {
            continue;
        }
        let node = doc.load_object(node_ref)?;
        let mut dict = match node.as_dict() {
            Some(d) => d.clone(),
            None => continue,
        };

        let mut changed = false;
        if let Some(title) = dict.get_mut("Title") {
            changed = scrub_string_object(title, patterns);
        }
        if changed {
            doc.set_object(node_ref.id, Object::Dictionary(dict.clone()));
        }

        for link in ["First", "Next"] {
            if let Some(child) = dict.get(link).and_then(|o| o.as_reference()) {
                queue.push(child);
            }
        }
    }
    Ok(())
}

/// Scrub destination labels and embedded-file names in the /Names trees.
fn sanitize_name_trees(doc: &mut PdfDocument, patterns: &[Regex]) -> Result<()> {
    let catalog = doc.catalog()?;
    let names = match doc.resolve_entry(&catalog, "Names")? {
        Some(Object::Dictionary(d)) => d,
        _ => return Ok(()),
    };

    for tree_key in ["Dests", "EmbeddedFiles"] {
        let root_ref = names.get(tree_key).and_then(|o| o.as_reference());
        let root = match root_ref {
            Some(r) => r,
            None => continue,
        };
        let mut queue = vec![root];
        let mut visited: HashSet<ObjectRef> = HashSet::new();

        while let Some(node_ref) = queue.pop() {
            if !visited.insert(node_ref) {
                continue;
            }
            let node = doc.load_object(node_ref)?;
            let mut dict = match node.as_dict() {
                Some(d) => d.clone(),
                None => continue,
            };

            if let Some(Object::Array(kids)) = dict.get("Kids") {
                for kid in kids {
                    if let Some(kid_ref) = kid.as_reference() {
                        queue.push(kid_ref);
                    }
                }
            }

            let mut changed = false;
            if let Some(Object::Array(pairs)) = dict.get_mut("Names") {
                // Flat [key value key value ...] pairs; keys are labels.
                for entry in pairs.iter_mut().step_by(2) {
                    changed |= scrub_string_object(entry, patterns);
                }
                // Embedded-file values are filespec dictionaries with their
                // own /F and /UF names.
                if tree_key == "EmbeddedFiles" {
                    let value_refs: Vec<ObjectRef> = pairs
                        .iter()
                        .skip(1)
                        .step_by(2)
                        .filter_map(|v| v.as_reference())
                        .collect();
                    for spec_ref in value_refs {
                        sanitize_filespec(doc, spec_ref, patterns)?;
                    }
                }
            }
            if changed {
                doc.set_object(node_ref.id, Object::Dictionary(dict));
            }
        }
    }
    Ok(())
}

fn sanitize_filespec(doc: &mut PdfDocument, spec_ref: ObjectRef, patterns: &[Regex]) -> Result<()> {
    let spec = doc.load_object(spec_ref)?;
    let mut dict = match spec.as_dict() {
        Some(d) => d.clone(),
        None => return Ok(()),
    };
    let mut changed = false;
    for key in ["F", "UF", "Desc"] {
        if let Some(value) = dict.get_mut(key) {
            changed |= scrub_string_object(value, patterns);
        }
    }
    if changed {
        doc.set_object(spec_ref.id, Object::Dictionary(dict));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(terms: &[&str]) -> Vec<Regex> {
        build_patterns(&terms.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_scrub_text_case_insensitive() {
        let p = patterns(&["SECRET"]);
        assert_eq!(scrub_text("Meeting notes about Secret project", &p), "Meeting notes about  project");
        assert_eq!(scrub_text("no match here", &p), "no match here");
    }

    #[test]
    fn test_scrub_escapes_regex_metacharacters() {
        let p = patterns(&["a.b(c)"]);
        assert_eq!(scrub_text("x a.b(c) y", &p), "x  y");
        assert_eq!(scrub_text("axbzc", &p), "axbzc");
    }

    #[test]
    fn test_pdf_string_latin1_round_trip() {
        let bytes = b"caf\xe9".to_vec();
        let text = pdf_string_to_text(&bytes);
        assert_eq!(text, "café");
        assert_eq!(text_to_pdf_string(&text), bytes);
    }

    #[test]
    fn test_pdf_string_utf16_decode() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "Grüße".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(pdf_string_to_text(&bytes), "Grüße");
    }

    #[test]
    fn test_scrub_string_object() {
        let p = patterns(&["SECRET"]);
        let mut obj = Object::String(b"the SECRET plan".to_vec());
        assert!(scrub_string_object(&mut obj, &p));
        assert_eq!(obj.as_string(), Some(&b"the  plan"[..]));

        let mut untouched = Object::String(b"public".to_vec());
        assert!(!scrub_string_object(&mut untouched, &p));
    }

    #[test]
    fn test_xmp_packet_scrub_preserves_structure() {
        let xml = br#"<?xpacket begin=""?><x:xmpmeta xmlns:x="adobe:ns:meta/"><dc:title>About SECRET things</dc:title></x:xmpmeta>"#;
        let cleaned = scrub_xmp_packet(xml, &patterns(&["SECRET"]));
        let text = String::from_utf8(cleaned).unwrap();
        assert!(!text.to_lowercase().contains("secret"));
        assert!(text.contains("<dc:title>"));
        assert!(text.contains("About  things"));
    }

    #[test]
    fn test_malformed_xmp_still_scrubbed() {
        let xml = b"<unclosed>SECRET data";
        let cleaned = scrub_xmp_packet(xml, &patterns(&["SECRET"]));
        assert!(!String::from_utf8_lossy(&cleaned).contains("SECRET"));
    }

    #[test]
    fn test_empty_terms_no_patterns() {
        assert!(build_patterns(&["".to_string(), "  ".to_string()]).is_empty());
    }
}
