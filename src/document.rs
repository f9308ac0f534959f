//! PDF document model.
//!
//! The whole file is held in memory: redaction needs raw byte access for
//! span-exact rebuilds, and no parse is allowed to suspend for I/O halfway
//! through a content stream. Object loading goes through the xref table with
//! a cache; edits land in an overlay map so the original buffer stays
//! untouched until [`PdfDocument::save`] rewrites the file.

use crate::error::{Error, Result};
use crate::object::{Dict, Object, ObjectRef};
use crate::parser::{parse_object, parse_object_at};
use crate::xref::{find_startxref, parse_xref, CrossRefTable, XrefEntry};
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Maximum reference-chain length before we declare a cycle.
const MAX_RESOLVE_DEPTH: u32 = 64;

/// An open PDF document.
///
/// # Example
///
/// ```no_run
/// use pdf_redact::document::PdfDocument;
///
/// let mut doc = PdfDocument::open("sample.pdf")?;
/// println!("PDF version: {}.{}", doc.version().0, doc.version().1);
/// println!("Page count: {}", doc.page_count());
/// # Ok::<(), pdf_redact::error::Error>(())
/// ```
pub struct PdfDocument {
    /// The raw file bytes
    buffer: Bytes,
    /// PDF version (major, minor), preserved on save
    version: (u8, u8),
    /// Cross-reference table
    xref: CrossRefTable,
    /// Cache of objects parsed from the buffer
    object_cache: HashMap<u32, Object>,
    /// Edit overlay: replaces the stored object on access and on save
    modified: HashMap<u32, Object>,
    /// Next object number for allocations
    next_id: u32,
    /// Page references in document order
    page_refs: Vec<ObjectRef>,
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("version", &self.version)
            .field("xref_entries", &self.xref.len())
            .field("pages", &self.page_refs.len())
            .field("modified_objects", &self.modified.len())
            .finish_non_exhaustive()
    }
}

impl PdfDocument {
    /// Open a PDF document from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Open a PDF document from bytes already in memory.
    ///
    /// # Errors
    ///
    /// Fails on a bad header, an unlocatable/invalid xref chain, or an
    /// encrypted document (out of scope, refused rather than half-read).
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let buffer = Bytes::from(data);
        let version = parse_header(&buffer)?;
        let startxref = find_startxref(&buffer)?;
        let xref = parse_xref(&buffer, startxref)?;

        if xref.trailer().contains_key("Encrypt") {
            return Err(Error::Unsupported(
                "encrypted documents cannot be redacted".to_string(),
            ));
        }

        let next_id = xref.max_id() + 1;
        let mut document = Self {
            buffer,
            version,
            xref,
            object_cache: HashMap::new(),
            modified: HashMap::new(),
            next_id,
            page_refs: Vec::new(),
        };
        document.page_refs = document.collect_pages()?;
        Ok(document)
    }

    /// PDF version (major, minor) from the header.
    pub fn version(&self) -> (u8, u8) {
        self.version
    }

    /// The trailer dictionary.
    pub fn trailer(&self) -> &Dict {
        self.xref.trailer()
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_refs.len()
    }

    /// Reference to page `index`.
    pub fn page_ref(&self, index: usize) -> Result<ObjectRef> {
        self.page_refs.get(index).copied().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "page index {} out of range (document has {} pages)",
                index,
                self.page_refs.len()
            ))
        })
    }

    /// Load an object by reference, consulting the edit overlay first.
    pub fn load_object(&mut self, obj_ref: ObjectRef) -> Result<Object> {
        self.load_object_by_id(obj_ref.id, obj_ref.gen)
    }

    fn load_object_by_id(&mut self, id: u32, gen: u16) -> Result<Object> {
        if let Some(obj) = self.modified.get(&id) {
            return Ok(obj.clone());
        }
        if let Some(obj) = self.object_cache.get(&id) {
            return Ok(obj.clone());
        }

        let entry = self.xref.get(id).ok_or(Error::ObjectNotFound(id, gen))?;
        let object = match entry {
            XrefEntry::Free => return Err(Error::ObjectNotFound(id, gen)),
            XrefEntry::InFile { offset, .. } => {
                let (parsed_ref, object) = parse_object_at(&self.buffer, offset)?;
                if parsed_ref.id != id {
                    log::warn!(
                        "xref points object {} at an object numbered {}, using it anyway",
                        id,
                        parsed_ref.id
                    );
                }
                object
            },
            XrefEntry::InStream { stream_id, index } => {
                self.load_from_object_stream(stream_id, index)?
            },
        };

        self.object_cache.insert(id, object.clone());
        Ok(object)
    }

    /// Extract an object from an object stream (/Type /ObjStm).
    fn load_from_object_stream(&mut self, stream_id: u32, index: usize) -> Result<Object> {
        let container = self.load_object_by_id(stream_id, 0)?;
        let dict = container
            .as_dict()
            .ok_or_else(|| Error::InvalidObjectType {
                expected: "Stream".to_string(),
                found: container.type_name().to_string(),
            })?
            .clone();
        let data = container.decode_stream_data()?;

        let count = dict
            .get("N")
            .and_then(|o| o.as_integer())
            .ok_or(Error::InvalidXref)? as usize;
        let first = dict
            .get("First")
            .and_then(|o| o.as_integer())
            .ok_or(Error::InvalidXref)? as usize;

        // Header: N pairs of "object-number offset".
        let mut pairs = Vec::with_capacity(count);
        let mut input = &data[..first.min(data.len())];
        for _ in 0..count {
            let (rest, id_tok) = crate::lexer::token(input).map_err(|_| Error::InvalidXref)?;
            let (rest, off_tok) = crate::lexer::token(rest).map_err(|_| Error::InvalidXref)?;
            match (id_tok, off_tok) {
                (crate::lexer::Token::Integer(id), crate::lexer::Token::Integer(off)) => {
                    pairs.push((id as u32, off as usize));
                },
                _ => return Err(Error::InvalidXref),
            }
            input = rest;
        }

        let (_, offset) = *pairs.get(index).ok_or(Error::InvalidXref)?;
        let start = first + offset;
        if start >= data.len() {
            return Err(Error::InvalidXref);
        }
        let (_, object) = parse_object(&data[start..]).map_err(|_| Error::ParseError {
            offset: start,
            reason: format!("invalid object in object stream {}", stream_id),
        })?;
        Ok(object)
    }

    /// Follow reference chains until a direct object is reached.
    pub fn resolve(&mut self, object: &Object) -> Result<Object> {
        let mut current = object.clone();
        let mut depth = 0;
        while let Object::Reference(obj_ref) = current {
            depth += 1;
            if depth > MAX_RESOLVE_DEPTH {
                return Err(Error::ParseError {
                    offset: 0,
                    reason: format!("reference chain exceeds {} hops", MAX_RESOLVE_DEPTH),
                });
            }
            current = self.load_object(obj_ref)?;
        }
        Ok(current)
    }

    /// Resolve a dictionary entry to a direct object.
    pub fn resolve_entry(&mut self, dict: &Dict, key: &str) -> Result<Option<Object>> {
        match dict.get(key) {
            Some(obj) => Ok(Some(self.resolve(obj)?)),
            None => Ok(None),
        }
    }

    /// The catalog (/Root) dictionary.
    pub fn catalog(&mut self) -> Result<Dict> {
        let root = self
            .trailer()
            .get("Root")
            .cloned()
            .ok_or_else(|| Error::ParseError {
                offset: 0,
                reason: "trailer has no /Root".to_string(),
            })?;
        match self.resolve(&root)? {
            Object::Dictionary(d) => Ok(d),
            other => Err(Error::InvalidObjectType {
                expected: "Dictionary".to_string(),
                found: other.type_name().to_string(),
            }),
        }
    }

    /// The catalog's object reference, if indirect.
    pub fn catalog_ref(&self) -> Option<ObjectRef> {
        self.trailer().get("Root").and_then(|o| o.as_reference())
    }

    /// Walk the page tree and return leaf pages in document order.
    fn collect_pages(&mut self) -> Result<Vec<ObjectRef>> {
        let catalog = self.catalog()?;
        let pages_root = catalog
            .get("Pages")
            .and_then(|o| o.as_reference())
            .ok_or_else(|| Error::ParseError {
                offset: 0,
                reason: "catalog has no /Pages reference".to_string(),
            })?;

        let mut pages = Vec::new();
        let mut visited = HashSet::new();
        self.walk_page_node(pages_root, &mut pages, &mut visited)?;
        Ok(pages)
    }

    fn walk_page_node(
        &mut self,
        node_ref: ObjectRef,
        pages: &mut Vec<ObjectRef>,
        visited: &mut HashSet<ObjectRef>,
    ) -> Result<()> {
        if !visited.insert(node_ref) {
            log::warn!("page tree cycle at {}, skipping", node_ref);
            return Ok(());
        }
        let node = self.load_object(node_ref)?;
        let dict = match node.as_dict() {
            Some(d) => d.clone(),
            None => return Ok(()),
        };
        match dict.get("Type").and_then(|o| o.as_name()) {
            Some("Page") => pages.push(node_ref),
            _ => {
                // Treat as an intermediate /Pages node.
                let kids = self.resolve_entry(&dict, "Kids")?;
                if let Some(Object::Array(kids)) = kids {
                    for kid in kids {
                        if let Some(kid_ref) = kid.as_reference() {
                            self.walk_page_node(kid_ref, pages, visited)?;
                        }
                    }
                }
            },
        }
        Ok(())
    }

    /// Load page `index`'s dictionary.
    pub fn page_dict(&mut self, index: usize) -> Result<Dict> {
        let page_ref = self.page_ref(index)?;
        let page = self.load_object(page_ref)?;
        page.as_dict().cloned().ok_or_else(|| Error::InvalidObjectType {
            expected: "Dictionary".to_string(),
            found: page.type_name().to_string(),
        })
    }

    /// Look up a page attribute, walking /Parent links for inheritable keys.
    fn inherited_page_attr(&mut self, index: usize, key: &str) -> Result<Option<Object>> {
        let mut dict = self.page_dict(index)?;
        let mut depth = 0;
        loop {
            if let Some(value) = dict.get(key) {
                return Ok(Some(self.resolve(&value.clone())?));
            }
            let parent = match dict.get("Parent").and_then(|o| o.as_reference()) {
                Some(p) => p,
                None => return Ok(None),
            };
            depth += 1;
            if depth > MAX_RESOLVE_DEPTH {
                return Ok(None);
            }
            let parent_obj = self.load_object(parent)?;
            dict = match parent_obj.as_dict() {
                Some(d) => d.clone(),
                None => return Ok(None),
            };
        }
    }

    /// Page MediaBox as (x0, y0, x1, y1) in PDF points.
    fn media_box(&mut self, index: usize) -> Result<(f64, f64, f64, f64)> {
        let media_box = self
            .inherited_page_attr(index, "MediaBox")?
            .ok_or_else(|| Error::ParseError {
                offset: 0,
                reason: format!("page {} has no MediaBox", index),
            })?;
        let values: Vec<f64> = match media_box.as_array() {
            Some(arr) => arr.iter().filter_map(|o| o.as_number()).collect(),
            None => Vec::new(),
        };
        if values.len() != 4 {
            return Err(Error::ParseError {
                offset: 0,
                reason: format!("page {} MediaBox is not four numbers", index),
            });
        }
        Ok((values[0], values[1], values[2], values[3]))
    }

    /// Page width in PDF points.
    pub fn page_width_points(&mut self, index: usize) -> Result<f64> {
        let (x0, _, x1, _) = self.media_box(index)?;
        Ok((x1 - x0).abs())
    }

    /// Page height in PDF points.
    pub fn page_height_points(&mut self, index: usize) -> Result<f64> {
        let (_, y0, _, y1) = self.media_box(index)?;
        Ok((y1 - y0).abs())
    }

    /// Page /Rotate value, normalized to 0, 90, 180, or 270.
    pub fn page_rotation(&mut self, index: usize) -> Result<i32> {
        let rotation = self
            .inherited_page_attr(index, "Rotate")?
            .and_then(|o| o.as_integer())
            .unwrap_or(0) as i32;
        Ok(rotation.rem_euclid(360) / 90 * 90)
    }

    /// Set a page's /Rotate entry.
    pub fn rotate_page(&mut self, index: usize, degrees: i32) -> Result<()> {
        if !matches!(degrees, 0 | 90 | 180 | 270) {
            return Err(Error::InvalidArgument(format!(
                "rotation must be 0, 90, 180 or 270, got {}",
                degrees
            )));
        }
        let page_ref = self.page_ref(index)?;
        let mut dict = self.page_dict(index)?;
        dict.insert("Rotate".to_string(), Object::Integer(degrees as i64));
        self.set_object(page_ref.id, Object::Dictionary(dict));
        Ok(())
    }

    /// Concatenated, decoded content-stream bytes for a page.
    ///
    /// A /Contents array of streams is joined with a newline between parts,
    /// which is exactly the whitespace the spec puts between them.
    pub fn page_contents(&mut self, index: usize) -> Result<Vec<u8>> {
        let dict = self.page_dict(index)?;
        let contents = match dict.get("Contents") {
            Some(c) => c.clone(),
            None => return Ok(Vec::new()),
        };

        let mut parts: Vec<Vec<u8>> = Vec::new();
        match self.resolve(&contents)? {
            stream @ Object::Stream { .. } => parts.push(stream.decode_stream_data()?),
            Object::Array(items) => {
                for item in items {
                    let stream = self.resolve(&item)?;
                    match stream {
                        Object::Stream { .. } => parts.push(stream.decode_stream_data()?),
                        other => {
                            log::warn!(
                                "page {} /Contents array holds a {}, skipping",
                                index,
                                other.type_name()
                            );
                        },
                    }
                }
            },
            other => {
                return Err(Error::InvalidObjectType {
                    expected: "Stream or Array".to_string(),
                    found: other.type_name().to_string(),
                })
            },
        }
        Ok(parts.join(&b"\n"[..]))
    }

    /// Atomically replace a page's content with a single uncompressed stream.
    ///
    /// When the existing /Contents is one indirect stream its object number
    /// is reused; otherwise a new object is allocated and the page entry is
    /// rewritten to that single reference.
    pub fn set_page_contents(&mut self, index: usize, content: Vec<u8>) -> Result<()> {
        let page_ref = self.page_ref(index)?;
        let mut page = self.page_dict(index)?;

        let mut stream_dict = Dict::new();
        stream_dict.insert("Length".to_string(), Object::Integer(content.len() as i64));
        let stream = Object::Stream {
            dict: stream_dict,
            data: Bytes::from(content),
        };

        let target = match page.get("Contents").and_then(|o| o.as_reference()) {
            Some(existing) => existing,
            None => {
                let new_ref = self.allocate_object_id();
                page.insert("Contents".to_string(), Object::Reference(new_ref));
                new_ref
            },
        };

        self.set_object(target.id, stream);
        self.set_object(page_ref.id, Object::Dictionary(page));
        Ok(())
    }

    /// Replace or create an object in the edit overlay.
    pub fn set_object(&mut self, id: u32, object: Object) {
        self.modified.insert(id, object);
    }

    /// Allocate a fresh object number.
    pub fn allocate_object_id(&mut self) -> ObjectRef {
        let id = self.next_id;
        self.next_id += 1;
        ObjectRef::new(id, 0)
    }

    /// The document Information dictionary, if present.
    pub fn info_dict(&mut self) -> Result<Option<Dict>> {
        let info = match self.trailer().get("Info").cloned() {
            Some(i) => i,
            None => return Ok(None),
        };
        match self.resolve(&info)? {
            Object::Dictionary(d) => Ok(Some(d)),
            _ => Ok(None),
        }
    }

    /// Replace the Information dictionary.
    ///
    /// When the trailer /Info is indirect the object is replaced in place;
    /// a direct or missing /Info becomes an allocated object on save.
    pub fn set_info_dict(&mut self, dict: Dict) -> Result<()> {
        match self.trailer().get("Info").and_then(|o| o.as_reference()) {
            Some(info_ref) => {
                self.set_object(info_ref.id, Object::Dictionary(dict));
                Ok(())
            },
            None => {
                let info_ref = self.allocate_object_id();
                self.set_object(info_ref.id, Object::Dictionary(dict));
                // Remember the reference for the writer's trailer.
                self.xref_trailer_set("Info", Object::Reference(info_ref));
                Ok(())
            },
        }
    }

    // The trailer lives inside the xref table; edits go through this
    // narrow door so the writer sees them.
    fn xref_trailer_set(&mut self, key: &str, value: Object) {
        self.xref.trailer_set(key, value);
    }

    /// All object ids that must survive a full rewrite: everything the xref
    /// knows plus everything edited or allocated, except containers that the
    /// rewrite dissolves (object streams and xref streams).
    pub fn all_object_ids(&mut self) -> Result<Vec<u32>> {
        let mut ids: Vec<u32> = self
            .xref
            .iter()
            .filter(|(_, entry)| !matches!(entry, XrefEntry::Free))
            .map(|(id, _)| id)
            .collect();
        ids.extend(self.modified.keys().copied());
        ids.sort_unstable();
        ids.dedup();

        let mut kept = Vec::with_capacity(ids.len());
        for id in ids {
            if id == 0 {
                continue;
            }
            match self.load_object_by_id(id, 0) {
                Ok(obj) => {
                    let type_name = obj.as_dict().and_then(|d| d.get("Type")).and_then(|t| t.as_name());
                    if matches!(type_name, Some("ObjStm") | Some("XRef")) {
                        continue;
                    }
                    kept.push(id);
                },
                Err(e) => {
                    log::warn!("dropping unloadable object {}: {}", id, e);
                },
            }
        }
        Ok(kept)
    }

    /// Serialize the document and write it to `path`.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Serialize the document to bytes (full rewrite, classic xref table).
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        crate::writer::write_document(self)
    }
}

/// Parse the `%PDF-M.N` header.
fn parse_header(buffer: &[u8]) -> Result<(u8, u8)> {
    let prefix = b"%PDF-";
    if buffer.len() < prefix.len() + 3 || !buffer.starts_with(prefix) {
        let shown = String::from_utf8_lossy(&buffer[..buffer.len().min(8)]).to_string();
        return Err(Error::InvalidHeader(shown));
    }
    let rest = &buffer[prefix.len()..];
    let major = rest[0];
    let minor = rest[2];
    if !major.is_ascii_digit() || rest[1] != b'.' || !minor.is_ascii_digit() {
        return Err(Error::InvalidHeader(
            String::from_utf8_lossy(&buffer[..buffer.len().min(8)]).to_string(),
        ));
    }
    Ok((major - b'0', minor - b'0'))
}
