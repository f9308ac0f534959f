//! Shared helpers for integration tests: assemble small classic-xref PDFs
//! with computed offsets, so every test works on a structurally honest file.

#![allow(dead_code)]

/// Builder for single-page test documents.
///
/// Object layout: 1 catalog, 2 page tree, 3 page, 4.. content streams,
/// then extra objects, then (optionally) the Info dictionary.
#[derive(Default)]
pub struct TestPdf {
    pub catalog_extra: String,
    pub page_extra: String,
    pub content_streams: Vec<Vec<u8>>,
    pub extra_objects: Vec<Vec<u8>>,
    pub info: Option<String>,
}

impl TestPdf {
    pub fn with_content(content: &[u8]) -> Self {
        Self {
            content_streams: vec![content.to_vec()],
            ..Self::default()
        }
    }

    /// Object id of the first extra object, for cross-references.
    pub fn first_extra_id(&self) -> usize {
        4 + self.content_streams.len()
    }

    pub fn build(&self) -> Vec<u8> {
        assert!(!self.content_streams.is_empty(), "need at least one content stream");

        let mut bodies: Vec<Vec<u8>> = Vec::new();
        bodies.push(
            format!("<< /Type /Catalog /Pages 2 0 R {} >>", self.catalog_extra).into_bytes(),
        );
        bodies.push(
            b"<< /Type /Pages /Kids [3 0 R] /Count 1 /MediaBox [0 0 612 792] >>".to_vec(),
        );

        let contents_entry = if self.content_streams.len() == 1 {
            "4 0 R".to_string()
        } else {
            let refs: Vec<String> = (0..self.content_streams.len())
                .map(|i| format!("{} 0 R", 4 + i))
                .collect();
            format!("[{}]", refs.join(" "))
        };
        bodies.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /Contents {} {} >>",
                contents_entry, self.page_extra
            )
            .into_bytes(),
        );

        for content in &self.content_streams {
            let mut body =
                format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
            body.extend_from_slice(content);
            body.extend_from_slice(b"\nendstream");
            bodies.push(body);
        }

        bodies.extend(self.extra_objects.iter().cloned());

        let info_ref = self.info.as_ref().map(|info_body| {
            bodies.push(info_body.clone().into_bytes());
            bodies.len()
        });

        let trailer_extra = match info_ref {
            Some(id) => format!(" /Info {} 0 R", id),
            None => String::new(),
        };
        assemble(&bodies, &trailer_extra)
    }
}

/// Assemble numbered object bodies (1..=n) into a classic-xref PDF.
pub fn assemble(bodies: &[Vec<u8>], trailer_extra: &str) -> Vec<u8> {
    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, body) in bodies.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }
    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", bodies.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R{} >>\nstartxref\n{}\n%%EOF\n",
            bodies.len() + 1,
            trailer_extra,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

/// The canonical one-text-op page: `(SECRET)` at 12pt, baseline (100, 700).
pub fn secret_page() -> Vec<u8> {
    TestPdf::with_content(b"BT /F1 12 Tf 100 700 Td (SECRET) Tj ET").build()
}

/// The image-pixel rectangle that covers "SECRET" at 150 dpi.
pub fn secret_rect_px() -> pdf_redact::geometry::Rect {
    pdf_redact::geometry::Rect::new(208.0, 191.0, 125.0, 25.0)
}
