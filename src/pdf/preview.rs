use super::PdfDocument;
use crate::error::{PdfError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

const EXCERPT_CHARS: usize = 200;

/// What a page looks like without rendering it
#[derive(Debug, Clone, Serialize)]
pub struct PagePreview {
    pub source: PathBuf,
    pub page: u32,
    pub width: f32,
    pub height: f32,
    pub text: String,
}

/// Decode every page of one document. Fails on a document with no pages.
pub fn decode_previews<P: AsRef<Path>>(path: P) -> Result<Vec<PagePreview>> {
    let doc = PdfDocument::open(&path)?;
    if doc.page_count() == 0 {
        return Err(PdfError::EmptyDocument {
            path: path.as_ref().to_path_buf(),
        });
    }

    let previews = doc
        .page_ids()
        .into_iter()
        .zip(1u32..)
        .map(|(page_id, page)| {
            let (width, height) = page_size(&doc, page_id);
            let text = doc.doc.extract_text(&[page]).unwrap_or_default();
            PagePreview {
                source: doc.path.clone(),
                page,
                width,
                height,
                text: excerpt(&text),
            }
        })
        .collect();

    Ok(previews)
}

/// Decode a set of documents on the blocking pool; the caller awaits one result.
pub async fn load_previews(paths: Vec<PathBuf>) -> Result<Vec<PagePreview>> {
    let previews = tokio::task::spawn_blocking(move || -> Result<Vec<PagePreview>> {
        let mut all = Vec::new();
        for path in &paths {
            all.extend(decode_previews(path)?);
        }
        Ok(all)
    })
    .await??;

    Ok(previews)
}

fn page_size(doc: &PdfDocument, page_id: lopdf::ObjectId) -> (f32, f32) {
    let corners: Vec<f32> = doc
        .inherited_attribute(page_id, b"MediaBox")
        .and_then(|b| b.as_array().ok())
        .map(|arr| arr.iter().filter_map(|v| v.as_float().ok()).collect())
        .unwrap_or_default();

    match corners.as_slice() {
        [x1, y1, x2, y2] => ((x2 - x1).abs(), (y2 - y1).abs()),
        _ => (0.0, 0.0),
    }
}

fn excerpt(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > EXCERPT_CHARS {
        let mut cut: String = collapsed.chars().take(EXCERPT_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        collapsed
    }
}
