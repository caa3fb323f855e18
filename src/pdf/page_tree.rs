use super::PdfDocument;
use crate::error::{PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// A4 in PDF points
pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

impl PdfDocument {
    /// Replace the page tree with a single flat Pages node holding `pages` in order.
    ///
    /// Attributes inherited from intermediate nodes are copied onto each page
    /// first, so pages keep their look once reparented under the root.
    pub fn set_page_order(&mut self, pages: Vec<ObjectId>) -> Result<()> {
        let root_id = self.pages_root()?;

        for &page_id in &pages {
            self.pin_inherited_attributes(page_id, root_id)?;
            self.doc
                .get_dictionary_mut(page_id)?
                .set("Parent", Object::Reference(root_id));
        }

        let root = self.doc.get_dictionary_mut(root_id)?;
        root.set("Count", pages.len() as i64);
        root.set(
            "Kids",
            pages
                .into_iter()
                .map(Object::Reference)
                .collect::<Vec<_>>(),
        );
        Ok(())
    }

    fn pin_inherited_attributes(&mut self, page_id: ObjectId, root_id: ObjectId) -> Result<()> {
        let mut inherited: Vec<(&[u8], Object)> = Vec::new();
        {
            let page = self.doc.get_dictionary(page_id)?;
            let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
            let mut depth = 0;
            while let Some(node_id) = parent {
                if node_id == root_id || depth > 64 {
                    break;
                }
                let Ok(node) = self.doc.get_dictionary(node_id) else {
                    break;
                };
                for key in INHERITABLE {
                    let already = page.has(key) || inherited.iter().any(|(k, _)| *k == key);
                    if let (false, Ok(value)) = (already, node.get(key)) {
                        inherited.push((key, value.clone()));
                    }
                }
                parent = node.get(b"Parent").and_then(Object::as_reference).ok();
                depth += 1;
            }
        }

        if !inherited.is_empty() {
            let page = self.doc.get_dictionary_mut(page_id)?;
            for (key, value) in inherited {
                page.set(key.to_vec(), value);
            }
        }
        Ok(())
    }

    fn new_blank_page(&mut self) -> ObjectId {
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        self.doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(A4_WIDTH),
                Object::Real(A4_HEIGHT),
            ],
            "Resources" => dictionary! {},
            "Rotate" => 0,
            "Contents" => content_id,
        })
    }

    fn check_position(&self, page: u32, page_count: u32) -> Result<usize> {
        if page == 0 || page > page_count {
            return Err(PdfError::PageOutOfRange { page, page_count });
        }
        Ok((page - 1) as usize)
    }

    /// Remove the page at 1-based position `page`.
    pub fn delete_page(&mut self, page: u32) -> Result<()> {
        let mut pages = self.page_ids();
        let index = self.check_position(page, pages.len() as u32)?;
        pages.remove(index);
        self.set_page_order(pages)
    }

    /// Insert an A4 blank page before the page currently at `page`.
    pub fn insert_blank_page(&mut self, page: u32) -> Result<()> {
        let mut pages = self.page_ids();
        let index = self.check_position(page, pages.len() as u32)?;
        let blank = self.new_blank_page();
        pages.insert(index, blank);
        self.set_page_order(pages)
    }

    /// Append an A4 blank page after the last page; works on an empty document.
    pub fn append_blank_page(&mut self) -> Result<()> {
        let mut pages = self.page_ids();
        let blank = self.new_blank_page();
        pages.push(blank);
        self.set_page_order(pages)
    }

    /// Append every page of `other` after this document's last page.
    ///
    /// Incoming pages get their own value for every attribute this document's
    /// root Pages node would otherwise hand down to them.
    pub fn append_document(&mut self, mut other: Document) -> Result<()> {
        other.renumber_objects_with(self.doc.max_id + 1);
        self.doc.max_id = self.doc.max_id.max(other.max_id);

        let incoming: Vec<ObjectId> = other.get_pages().into_values().collect();
        self.doc.objects.extend(other.objects);

        let root_id = self.pages_root()?;
        for &page_id in &incoming {
            self.pin_inherited_attributes(page_id, root_id)?;
            self.shield_from_root(page_id, root_id)?;
        }

        let mut pages = self.page_ids();
        pages.extend(incoming);
        self.set_page_order(pages)
    }

    fn shield_from_root(&mut self, page_id: ObjectId, root_id: ObjectId) -> Result<()> {
        let root = self.doc.get_dictionary(root_id)?;
        let page = self.doc.get_dictionary(page_id)?;

        let mut defaults: Vec<(&[u8], Object)> = Vec::new();
        for key in INHERITABLE {
            if page.has(key) {
                continue;
            }
            let value = match key {
                b"Rotate" => Some(Object::Integer(0)),
                // CropBox defaults to the MediaBox
                b"CropBox" if root.has(key) => page.get(b"MediaBox").ok().cloned(),
                b"Resources" if root.has(key) => Some(Object::Dictionary(Dictionary::new())),
                _ => None,
            };
            if let Some(value) = value {
                defaults.push((key, value));
            }
        }

        let page = self.doc.get_dictionary_mut(page_id)?;
        for (key, value) in defaults {
            page.set(key.to_vec(), value);
        }
        Ok(())
    }
}
