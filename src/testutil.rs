//! Unit-test fixtures: assemble classic-xref PDFs with computed offsets.

/// Assemble numbered object bodies (1..=n) into a classic-xref PDF with
/// `/Root 1 0 R`.
pub(crate) fn build_pdf(bodies: &[Vec<u8>]) -> Vec<u8> {
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
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            bodies.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

/// A one-page 612x792 document with the given content-stream bytes.
pub(crate) fn one_page_pdf(content: &[u8]) -> Vec<u8> {
    one_page_pdf_with(content, "", &[])
}

/// A one-page document with extra page-dictionary entries and extra
/// objects (numbered from 5).
pub(crate) fn one_page_pdf_with(
    content: &[u8],
    page_extra: &str,
    extra_objects: &[Vec<u8>],
) -> Vec<u8> {
    let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
    stream.extend_from_slice(content);
    stream.extend_from_slice(b"\nendstream");

    let mut bodies: Vec<Vec<u8>> = vec![
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        b"<< /Type /Pages /Kids [3 0 R] /Count 1 /MediaBox [0 0 612 792] >>".to_vec(),
        format!("<< /Type /Page /Parent 2 0 R /Contents 4 0 R {} >>", page_extra).into_bytes(),
        stream,
    ];
    bodies.extend(extra_objects.iter().cloned());
    build_pdf(&bodies)
}
