//! Fixture documents for unit tests.

use super::PdfDocument;
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

/// Build an in-memory document with one page per entry, each page showing its text.
pub fn sample_document(texts: &[&str]) -> PdfDocument {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for text in texts {
        let content = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => font_id,
                },
            },
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    PdfDocument {
        doc,
        path: PathBuf::new(),
    }
}

/// A document whose page tree has no pages.
pub fn empty_document() -> PdfDocument {
    sample_document(&[])
}

/// Write a sample document to `dir/name` and return its path.
pub fn write_sample(dir: &Path, name: &str, texts: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut doc = sample_document(texts);
    doc.save(&path).expect("failed to write fixture");
    path
}

/// Text shown on a 1-based page, or "" for a page without text.
pub fn page_text(doc: &PdfDocument, page: u32) -> String {
    let page_id = doc.page_ids()[(page - 1) as usize];
    let content = doc.doc.get_page_content(page_id).unwrap_or_default();
    let content = String::from_utf8_lossy(&content);
    match (content.find('('), content.rfind(')')) {
        (Some(open), Some(close)) if open < close => content[open + 1..close].to_string(),
        _ => String::new(),
    }
}

/// Text of every page, in order.
pub fn all_page_texts(doc: &PdfDocument) -> Vec<String> {
    (1..=doc.page_count()).map(|p| page_text(doc, p)).collect()
}
