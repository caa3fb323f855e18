pub mod document;
pub mod page_tree;
pub mod preview;
pub mod security;

#[cfg(test)]
pub mod testing;

pub use document::PdfDocument;
