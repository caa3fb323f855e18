use crate::error::{PdfError, Result};
use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};
use tracing::debug;

/// An open PDF. Dropping it releases everything it holds.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
}

impl PdfDocument {
    /// Open a document that is expected to be unprotected.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let doc = Document::load(&path).map_err(|source| {
            if mentions_encryption(&source) {
                PdfError::PasswordProtected { path: path.clone() }
            } else {
                PdfError::Load {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        if doc.is_encrypted() {
            return Err(PdfError::PasswordProtected { path });
        }

        debug!(path = %path.display(), "opened document");
        Ok(PdfDocument { doc, path })
    }

    /// Open a document with a password, decrypting it in memory.
    ///
    /// An unprotected document opens normally and the password is ignored.
    pub fn open_with_password<P: AsRef<Path>>(path: P, password: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let doc = Document::load_with_password(&path, password).map_err(|source| {
            if mentions_encryption(&source) {
                PdfError::IncorrectPassword { path: path.clone() }
            } else {
                PdfError::Load {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        // A rejected password leaves only the encryption dictionary parsed.
        if doc.is_encrypted() {
            debug!(path = %path.display(), "password rejected");
            return Err(PdfError::IncorrectPassword { path });
        }

        let opened = PdfDocument { doc, path };
        if opened.doc.was_encrypted() {
            opened.check_page_tree()?;
        }

        debug!(
            path = %opened.path.display(),
            pages = opened.page_count(),
            "opened document with password"
        );
        Ok(opened)
    }

    /// Fail unless every page the root Pages node counts was actually read.
    fn check_page_tree(&self) -> Result<()> {
        let root = self.doc.get_dictionary(self.pages_root()?)?;
        let expected = root.get(b"Count")?.as_i64()?;
        let found = self.page_count();
        if expected != i64::from(found) {
            return Err(PdfError::IncompletePageTree {
                path: self.path.clone(),
                expected,
                found,
            });
        }
        Ok(())
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Page object IDs in page order
    pub fn page_ids(&self) -> Vec<ObjectId> {
        self.doc.get_pages().into_values().collect()
    }

    /// Object ID of the root Pages node
    pub fn pages_root(&self) -> Result<ObjectId> {
        let catalog = self.doc.catalog()?;
        Ok(catalog.get(b"Pages")?.as_reference()?)
    }

    /// Look up a page attribute, following the Parent chain for inherited values.
    pub fn inherited_attribute(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut node_id = page_id;
        // Page trees deeper than this are malformed or cyclic.
        for _ in 0..64 {
            let node = self.doc.get_dictionary(node_id).ok()?;
            if let Ok(value) = node.get(key) {
                return Some(value);
            }
            node_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        }
        None
    }

    /// Copy the given 1-based pages, in the given order, into a new document.
    pub fn extract_pages(&self, pages: &[u32]) -> Result<PdfDocument> {
        let all_pages = self.page_ids();
        let total = all_pages.len() as u32;

        let mut kept = Vec::with_capacity(pages.len());
        for &page in pages {
            if page == 0 || page > total {
                return Err(PdfError::PageOutOfRange {
                    page,
                    page_count: total,
                });
            }
            kept.push(all_pages[(page - 1) as usize]);
        }

        let mut new_doc = self.clone();
        new_doc.set_page_order(kept)?;
        Ok(new_doc)
    }

    /// Write to `path`, dropping objects no longer reachable from the trailer.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.doc.prune_objects();
        self.doc.save(path).map_err(|e| PdfError::Save {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), pages = self.page_count(), "saved document");
        Ok(())
    }
}

fn mentions_encryption(err: &lopdf::Error) -> bool {
    let message = err.to_string().to_lowercase();
    message.contains("encrypt") || message.contains("decrypt") || message.contains("password")
}
