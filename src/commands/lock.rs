use super::{append_to_name, containing_dir, resolve_output};
use crate::config::Config;
use crate::error::Result;
use crate::pdf::security::validate_password;
use crate::pdf::PdfDocument;
use crate::reveal::reveal;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct ProtectionOutcome {
    pub source: PathBuf,
    pub output: PathBuf,
    pub page_count: u32,
}

/// Password-protect `input` and write it to `output`.
pub fn lock<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    password: &str,
) -> Result<ProtectionOutcome> {
    let input = input.as_ref();
    let output = output.as_ref();
    validate_password(password)?;

    let mut doc = PdfDocument::open(input)?;
    doc.lock(password)?;
    doc.save(output)?;

    info!(source = %input.display(), output = %output.display(), "locked document");
    Ok(ProtectionOutcome {
        source: input.to_path_buf(),
        output: output.to_path_buf(),
        page_count: doc.page_count(),
    })
}

pub fn run(input: &Path, output: Option<&Path>, password: &str, config: &Config) -> Result<()> {
    let output = resolve_output(output, input, &append_to_name(input, "Locked"));
    let outcome = lock(input, &output, password)?;

    println!("Locked {} into {}", input.display(), outcome.output.display());

    if config.reveal_output {
        reveal(containing_dir(&outcome.output));
    }
    Ok(())
}
