//! Resource cleanup after filtering.
//!
//! An image XObject whose name appears only in removed operations is
//! dropped from the page's `/Resources /XObject` dictionary, so the image
//! bytes cannot be recovered from the resource tree after the operator that
//! placed them is gone. A name any kept operation still references stays.

use crate::content::Operation;
use crate::document::PdfDocument;
use crate::error::Result;
use crate::object::{Dict, Object};
use std::collections::HashSet;

/// Names referenced by `Do` operations in a list.
fn xobject_names(operations: &[Operation]) -> HashSet<String> {
    operations
        .iter()
        .filter_map(|op| match op {
            Operation::ImageXObject { resource_name, .. } => Some(resource_name.clone()),
            _ => None,
        })
        .collect()
}

/// Remove orphaned XObject entries from the page resources.
///
/// Returns the number of entries removed.
pub fn clean_unused_xobjects(
    doc: &mut PdfDocument,
    page_index: usize,
    removed: &[Operation],
    kept: &[Operation],
) -> Result<u32> {
    let removed_names = xobject_names(removed);
    if removed_names.is_empty() {
        return Ok(0);
    }
    let kept_names = xobject_names(kept);
    let orphaned: Vec<String> = removed_names.difference(&kept_names).cloned().collect();
    if orphaned.is_empty() {
        return Ok(0);
    }

    let page_ref = doc.page_ref(page_index)?;
    let mut page = doc.page_dict(page_index)?;

    // Resources and the XObject subdictionary may each be direct or
    // indirect; edits are written back to wherever the dictionary lives.
    let resources_target = page.get("Resources").and_then(|o| o.as_reference());
    let mut resources: Dict = match doc.resolve_entry(&page, "Resources")? {
        Some(Object::Dictionary(d)) => d,
        _ => return Ok(0),
    };

    let xobject_target = resources.get("XObject").and_then(|o| o.as_reference());
    let mut xobjects: Dict = match doc.resolve_entry(&resources, "XObject")? {
        Some(Object::Dictionary(d)) => d,
        _ => return Ok(0),
    };

    let mut removed_count = 0;
    for name in &orphaned {
        if xobjects.shift_remove(name).is_some() {
            log::debug!("removed orphaned XObject /{} from page {}", name, page_index);
            removed_count += 1;
        }
    }
    if removed_count == 0 {
        return Ok(0);
    }

    match xobject_target {
        Some(xobj_ref) => {
            doc.set_object(xobj_ref.id, Object::Dictionary(xobjects));
        },
        None => {
            resources.insert("XObject".to_string(), Object::Dictionary(xobjects));
            match resources_target {
                Some(res_ref) => doc.set_object(res_ref.id, Object::Dictionary(resources)),
                None => {
                    page.insert("Resources".to_string(), Object::Dictionary(resources));
                    doc.set_object(page_ref.id, Object::Dictionary(page));
                },
            }
        },
    }

    Ok(removed_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{parse_content, Operation};

    fn ops(content: &[u8]) -> Vec<Operation> {
        parse_content(content, 792.0).unwrap().operations
    }

    fn image_pdf() -> Vec<u8> {
        // Page with two image XObjects, both placed via Do.
        crate::testutil::one_page_pdf_with(
            b"q 100 0 0 50 100 600 cm /Im1 Do Q\nq 100 0 0 50 300 600 cm /Im2 Do Q",
            "/Resources << /XObject << /Im1 5 0 R /Im2 6 0 R >> >>",
            &[
                b"<< /Subtype /Image /Width 1 /Height 1 /Length 1 >>\nstream\nA\nendstream"
                    .to_vec(),
                b"<< /Subtype /Image /Width 1 /Height 1 /Length 1 >>\nstream\nB\nendstream"
                    .to_vec(),
            ],
        )
    }

    #[test]
    fn test_orphaned_xobject_removed() {
        let mut doc = PdfDocument::from_bytes(image_pdf()).unwrap();
        let content = doc.page_contents(0).unwrap();
        let all = ops(&content);
        let (removed, kept): (Vec<_>, Vec<_>) = all.into_iter().partition(|op| {
            matches!(op, Operation::ImageXObject { resource_name, .. } if resource_name == "Im1")
        });

        let count = clean_unused_xobjects(&mut doc, 0, &removed, &kept).unwrap();
        assert_eq!(count, 1);

        let page = doc.page_dict(0).unwrap();
        let resources = doc.resolve_entry(&page, "Resources").unwrap().unwrap();
        let xobjects = resources.as_dict().unwrap().get("XObject").unwrap().as_dict().unwrap();
        assert!(!xobjects.contains_key("Im1"));
        assert!(xobjects.contains_key("Im2"));
    }

    #[test]
    fn test_referenced_name_kept() {
        let mut doc = PdfDocument::from_bytes(image_pdf()).unwrap();
        let content = doc.page_contents(0).unwrap();
        let all = ops(&content);
        // Same name in both lists: another kept operation still uses it.
        let removed: Vec<_> = all
            .iter()
            .filter(|op| matches!(op, Operation::ImageXObject { .. }))
            .cloned()
            .collect();
        let kept = all;

        let count = clean_unused_xobjects(&mut doc, 0, &removed, &kept).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_no_images_no_work() {
        let mut doc = PdfDocument::from_bytes(image_pdf()).unwrap();
        let count = clean_unused_xobjects(&mut doc, 0, &[], &[]).unwrap();
        assert_eq!(count, 0);
    }
}
