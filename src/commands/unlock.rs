use super::lock::ProtectionOutcome;
use super::{append_to_name, containing_dir, resolve_output};
use crate::config::Config;
use crate::error::Result;
use crate::pdf::security::validate_password;
use crate::pdf::PdfDocument;
use crate::reveal::reveal;
use std::path::Path;
use tracing::info;

/// Open `input` with `password` and write an unprotected copy to `output`.
///
/// A wrong password fails before anything is written.
pub fn unlock<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    password: &str,
) -> Result<ProtectionOutcome> {
    let input = input.as_ref();
    let output = output.as_ref();
    validate_password(password)?;

    let mut doc = PdfDocument::open_with_password(input, password)?;
    doc.strip_protection();
    doc.save(output)?;

    info!(source = %input.display(), output = %output.display(), "unlocked document");
    Ok(ProtectionOutcome {
        source: input.to_path_buf(),
        output: output.to_path_buf(),
        page_count: doc.page_count(),
    })
}

pub fn run(input: &Path, output: Option<&Path>, password: &str, config: &Config) -> Result<()> {
    let output = resolve_output(output, input, &append_to_name(input, "Unlocked"));
    let outcome = unlock(input, &output, password)?;

    println!(
        "Unlocked {} into {}",
        input.display(),
        outcome.output.display()
    );

    if config.reveal_output {
        reveal(containing_dir(&outcome.output));
    }
    Ok(())
}
