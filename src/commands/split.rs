use super::{append_to_name, containing_dir};
use crate::config::Config;
use crate::error::Result;
use crate::page_range::parse_split_ranges;
use crate::pdf::PdfDocument;
use crate::reveal::reveal;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
pub struct SplitOutcome {
    pub source: PathBuf,
    pub page_count: u32,
    pub outputs: Vec<PathBuf>,
}

/// Split by `range`, or into single pages when the range is missing or blank.
pub fn split<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output_dir: Q,
    range: Option<&str>,
) -> Result<SplitOutcome> {
    match range.map(str::trim) {
        Some(range) if !range.is_empty() => split_by_range(input, output_dir, range),
        _ => split_all(input, output_dir),
    }
}

/// Write every page to its own `<stem>_page_<n>` file.
pub fn split_all<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output_dir: Q) -> Result<SplitOutcome> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();
    let doc = PdfDocument::open(input)?;
    let page_count = doc.page_count();

    std::fs::create_dir_all(output_dir)?;

    let mut outputs = Vec::with_capacity(page_count as usize);
    for page in 1..=page_count {
        let output_path = output_dir.join(append_to_name(input, &format!("page_{}", page)));
        let mut single = doc.extract_pages(&[page])?;
        single.save(&output_path)?;
        debug!(output = %output_path.display(), page, "wrote page");
        outputs.push(output_path);
    }

    info!(source = %input.display(), files = outputs.len(), "split into single pages");
    Ok(SplitOutcome {
        source: input.to_path_buf(),
        page_count,
        outputs,
    })
}

/// Write one file per comma-separated term of `range`, named after the term.
///
/// The whole expression is validated before anything is written.
pub fn split_by_range<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output_dir: Q,
    range: &str,
) -> Result<SplitOutcome> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();

    let doc = PdfDocument::open(input)?;
    let page_count = doc.page_count();
    let terms = parse_split_ranges(range, page_count)?;

    std::fs::create_dir_all(output_dir)?;

    let mut outputs = Vec::with_capacity(terms.len());
    for term in &terms {
        let output_path = output_dir.join(append_to_name(input, &term.text));
        let pages = term.pages(page_count);
        let mut part = doc.extract_pages(&pages)?;
        part.save(&output_path)?;
        debug!(output = %output_path.display(), term = %term.text, pages = pages.len(), "wrote range");
        outputs.push(output_path);
    }

    info!(source = %input.display(), range, files = outputs.len(), "split by range");
    Ok(SplitOutcome {
        source: input.to_path_buf(),
        page_count,
        outputs,
    })
}

pub fn run<P: AsRef<Path>>(
    input: P,
    output_dir: Option<&Path>,
    range: Option<&str>,
    config: &Config,
) -> Result<()> {
    let input = input.as_ref();
    let output_dir = output_dir.unwrap_or_else(|| containing_dir(input));

    let outcome = split(input, output_dir, range)?;

    println!(
        "Split {} ({} pages) into {} file(s) in {}",
        input.display(),
        outcome.page_count,
        outcome.outputs.len(),
        output_dir.display()
    );

    if config.reveal_output {
        reveal(output_dir);
    }
    Ok(())
}
