//! Page-set operations over `lopdf::Document`
//!
//! Merge is a pure concatenation: input file order, then page order within
//! each file. Split and extract produce one single-page document per
//! selected page; extraction follows the selector's expanded order, with
//! duplicates preserved.

use crate::pages::error::PageError;
use crate::pages::selector::parse_page_selector;
use lopdf::{dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::Path;

/// Load a PDF document fully into memory
pub fn load_document(path: &Path) -> Result<Document, PageError> {
    Ok(Document::load(path)?)
}

/// Write a document to disk
pub fn save_document(document: &mut Document, path: &Path) -> Result<(), PageError> {
    document.save(path).map_err(lopdf::Error::from)?;
    Ok(())
}

/// Concatenate the pages of several documents into one.
///
/// Object ids of each source are renumbered past the previous maximum, page
/// objects are reparented under a fresh page tree, and the sources' catalog
/// and page-tree nodes are discarded. Page order is fully determined by
/// input order then page order within each input.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document, PageError> {
    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;
        // get_pages is keyed by 1-based page number, so iteration order is
        // page order
        page_ids.extend(doc.get_pages().into_values());
        objects.extend(doc.objects);
    }

    if page_ids.is_empty() {
        return Err(PageError::NoValidPages);
    }

    let mut merged = Document::with_version("1.5");
    let pages_id: ObjectId = (max_id, 0);

    for page_id in &page_ids {
        if let Some(Object::Dictionary(dict)) = objects.get_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    // Carry every object except the sources' catalogs and page-tree nodes;
    // the merged document gets a single flat page tree.
    for (object_id, object) in objects {
        if is_page_tree_node(&object) {
            continue;
        }
        merged.objects.insert(object_id, object);
    }

    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => page_ids.len() as i64,
            "Kids" => page_ids
                .iter()
                .map(|id| Object::Reference(*id))
                .collect::<Vec<Object>>(),
        }),
    );
    merged.max_id = pages_id.0;

    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    merged.trailer.set("Root", Object::Reference(catalog_id));
    merged.renumber_objects();
    merged.compress();

    Ok(merged)
}

fn is_page_tree_node(object: &Object) -> bool {
    object
        .as_dict()
        .ok()
        .and_then(|dict| dict.get(b"Type").ok())
        .and_then(|t| t.as_name().ok())
        .map(|name| name == b"Catalog" || name == b"Pages")
        .unwrap_or(false)
}

/// Produce one single-page document per page, in document order.
pub fn split_document(document: &Document) -> Result<Vec<Document>, PageError> {
    let page_count = document.get_pages().len() as u32;
    (1..=page_count)
        .map(|page| single_page(document, page, page_count))
        .collect()
}

/// Extract the pages named by `selector`, in the selector's expanded order.
///
/// Out-of-range and malformed selector entries are skipped (the expansion
/// itself is bounded by the page count); if nothing survives, the operation
/// fails with [`PageError::NoValidPages`]. Each returned entry carries the
/// 1-based source page number for display naming.
pub fn extract_pages(
    document: &Document,
    selector: &str,
) -> Result<Vec<(u32, Document)>, PageError> {
    let page_count = document.get_pages().len() as u32;
    let selected = parse_page_selector(selector, page_count);

    if selected.is_empty() {
        return Err(PageError::NoValidPages);
    }

    selected
        .into_iter()
        .map(|page| single_page(document, page, page_count).map(|doc| (page, doc)))
        .collect()
}

/// Copy of `document` reduced to the given 1-based page
fn single_page(document: &Document, page: u32, page_count: u32) -> Result<Document, PageError> {
    let mut out = document.clone();
    let doomed: Vec<u32> = (1..=page_count).filter(|&n| n != page).collect();
    out.delete_pages(&doomed);
    out.prune_objects();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::Stream;

    /// Build a PDF with one page per label; each page's content stream shows
    /// its label, so pages stay distinguishable across merge/split.
    fn make_pdf(labels: &[&str]) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids: Vec<Object> = Vec::new();
        for label in labels {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new(
                        "Tf",
                        vec![Object::Name(b"F1".to_vec()), 24.into()],
                    ),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::string_literal(label.to_string())],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => Object::Reference(content_id),
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => Object::Reference(font_id) },
                },
            });
            kids.push(Object::Reference(page_id));
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => labels.len() as i64,
                "Kids" => kids,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc
    }

    /// The labels visible on each page, in page order
    fn page_labels(doc: &Document) -> Vec<String> {
        let mut labels = Vec::new();
        for (_, page_id) in doc.get_pages() {
            let content = doc.get_page_content(page_id).expect("page content");
            let text = String::from_utf8_lossy(&content);
            // content streams are tiny; the label is the only string literal
            let label = text
                .split('(')
                .nth(1)
                .and_then(|rest| rest.split(')').next())
                .unwrap_or_default()
                .to_string();
            labels.push(label);
        }
        labels
    }

    #[test]
    fn merge_concatenates_in_input_order() {
        let a = make_pdf(&["a1", "a2"]);
        let b = make_pdf(&["b1", "b2"]);

        let merged = merge_documents(vec![a, b]).unwrap();

        assert_eq!(merged.get_pages().len(), 4);
        assert_eq!(page_labels(&merged), vec!["a1", "a2", "b1", "b2"]);
    }

    #[test]
    fn merge_of_nothing_fails() {
        match merge_documents(vec![]) {
            Err(PageError::NoValidPages) => {}
            other => panic!("Expected NoValidPages, got: {:?}", other),
        }
    }

    #[test]
    fn split_produces_one_document_per_page() {
        let doc = make_pdf(&["p1", "p2", "p3"]);

        let parts = split_document(&doc).unwrap();

        assert_eq!(parts.len(), 3);
        for (i, part) in parts.iter().enumerate() {
            assert_eq!(part.get_pages().len(), 1);
            assert_eq!(page_labels(part), vec![format!("p{}", i + 1)]);
        }
    }

    #[test]
    fn split_then_merge_reconstructs_document() {
        let doc = make_pdf(&["p1", "p2", "p3"]);

        let parts = split_document(&doc).unwrap();
        let merged = merge_documents(parts).unwrap();

        assert_eq!(merged.get_pages().len(), 3);
        assert_eq!(page_labels(&merged), vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn extract_follows_selector_order_with_duplicates() {
        let doc = make_pdf(&["p1", "p2", "p3"]);

        let out = extract_pages(&doc, "2,1-1,2").unwrap();

        let pages: Vec<u32> = out.iter().map(|(n, _)| *n).collect();
        assert_eq!(pages, vec![2, 1, 2]);
        for (n, part) in &out {
            assert_eq!(page_labels(part), vec![format!("p{}", n)]);
        }
    }

    #[test]
    fn extract_skips_out_of_range_pages() {
        let doc = make_pdf(&["p1", "p2", "p3"]);

        let out = extract_pages(&doc, "2-99").unwrap();

        let pages: Vec<u32> = out.iter().map(|(n, _)| *n).collect();
        assert_eq!(pages, vec![2, 3]);
    }

    #[test]
    fn extract_tolerates_absurd_range_ends() {
        let doc = make_pdf(&["p1", "p2", "p3"]);

        let out = extract_pages(&doc, "1-4000000000").unwrap();

        let pages: Vec<u32> = out.iter().map(|(n, _)| *n).collect();
        assert_eq!(pages, vec![1, 2, 3]);
    }

    #[test]
    fn extract_with_no_valid_pages_fails() {
        let doc = make_pdf(&["p1", "p2", "p3"]);

        match extract_pages(&doc, "99") {
            Err(PageError::NoValidPages) => {}
            other => panic!("Expected NoValidPages, got: {:?}", other),
        }
    }

    #[test]
    fn merged_document_survives_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged.pdf");
        let mut merged =
            merge_documents(vec![make_pdf(&["x"]), make_pdf(&["y"])]).unwrap();

        save_document(&mut merged, &path).unwrap();
        let reloaded = load_document(&path).unwrap();

        assert_eq!(reloaded.get_pages().len(), 2);
    }
}
