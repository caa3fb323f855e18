use crate::error::{PdfError, Result};
use crate::page_range::is_page_range_valid;
use crate::pdf::PdfDocument;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P, range: &str) -> Result<()> {
    let doc = PdfDocument::open(&path)?;
    let page_count = doc.page_count();

    if !is_page_range_valid(range, page_count) {
        return Err(PdfError::InvalidRange {
            range: range.to_string(),
            page_count,
        });
    }

    if range.trim().is_empty() {
        println!("No range given; every page would be split ({} pages)", page_count);
    } else {
        println!("Range \"{}\" is valid for {} pages", range.trim(), page_count);
    }
    Ok(())
}
