use super::{containing_dir, dated_name};
use crate::actions::{apply_actions, ActionLog, MergeAction};
use crate::config::Config;
use crate::error::{PdfError, Result};
use crate::pdf::security::validate_password;
use crate::pdf::PdfDocument;
use crate::reveal::reveal;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sources to concatenate, where to write them and the edits to apply afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    files: Vec<PathBuf>,
    merged_file: PathBuf,
    actions: Vec<MergeAction>,
}

impl MergeRequest {
    /// Sources are merged in the order given; listing a file twice is an error.
    pub fn new(
        files: Vec<PathBuf>,
        merged_file: impl Into<PathBuf>,
        actions: Vec<MergeAction>,
    ) -> Result<Self> {
        if files.is_empty() {
            return Err(PdfError::NoFilesToMerge);
        }

        let mut seen = HashSet::with_capacity(files.len());
        for file in &files {
            let key = std::fs::canonicalize(file).unwrap_or_else(|_| file.clone());
            if !seen.insert(key) {
                return Err(PdfError::DuplicateSource { path: file.clone() });
            }
        }

        Ok(MergeRequest {
            files,
            merged_file: merged_file.into(),
            actions,
        })
    }
}

/// A merge whose result is password protected before it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeAndLockRequest {
    request: MergeRequest,
    password: String,
}

impl MergeAndLockRequest {
    pub fn new(request: MergeRequest, password: impl Into<String>) -> Result<Self> {
        let password = password.into();
        validate_password(&password)?;
        Ok(MergeAndLockRequest { request, password })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    pub output: PathBuf,
    pub files_merged: usize,
    pub page_count: u32,
    pub locked: bool,
}

/// Record `actions` against a document of `page_count` pages, failing on the
/// first position that would be out of range when its turn comes.
pub fn plan_actions(page_count: u32, actions: &[MergeAction]) -> Result<ActionLog> {
    actions
        .iter()
        .copied()
        .try_fold(ActionLog::new(page_count), ActionLog::push)
}

fn merge_documents(files: &[PathBuf]) -> Result<PdfDocument> {
    let (first, rest) = files.split_first().ok_or(PdfError::NoFilesToMerge)?;

    let mut merged = PdfDocument::open(first)?;
    for path in rest {
        let doc = PdfDocument::open(path)?;
        debug!(source = %path.display(), pages = doc.page_count(), "appending document");
        merged.append_document(doc.doc)?;
    }
    Ok(merged)
}

/// Concatenate the sources, replay any actions, then write the result.
///
/// Action positions are checked against the merged page count before any
/// is applied. Nothing is written if loading or an action fails.
pub fn merge_and_save(request: MergeRequest) -> Result<MergeOutcome> {
    let mut merged = merge_documents(&request.files)?;
    let log = plan_actions(merged.page_count(), &request.actions)?;

    if !log.actions().is_empty() {
        apply_actions(&mut merged, log.actions())?;
    }

    merged.save(&request.merged_file)?;

    info!(
        output = %request.merged_file.display(),
        files = request.files.len(),
        actions = request.actions.len(),
        "merged documents"
    );
    Ok(MergeOutcome {
        page_count: merged.page_count(),
        files_merged: request.files.len(),
        output: request.merged_file,
        locked: false,
    })
}

/// Like [`merge_and_save`], always replaying the actions and encrypting
/// the result before it is written.
pub fn merge_lock_and_save(request: MergeAndLockRequest) -> Result<MergeOutcome> {
    let MergeAndLockRequest { request, password } = request;
    let mut merged = merge_documents(&request.files)?;
    let log = plan_actions(merged.page_count(), &request.actions)?;

    apply_actions(&mut merged, log.actions())?;
    let page_count = merged.page_count();
    merged.lock(&password)?;
    merged.save(&request.merged_file)?;

    info!(
        output = %request.merged_file.display(),
        files = request.files.len(),
        actions = request.actions.len(),
        "merged and locked documents"
    );
    Ok(MergeOutcome {
        page_count,
        files_merged: request.files.len(),
        output: request.merged_file,
        locked: true,
    })
}

/// Where a merge writes when the caller gives a directory or nothing at all.
pub fn default_merge_output(output: Option<&Path>, locked: bool) -> PathBuf {
    let name = dated_name(if locked { "MergedAndLocked" } else { "Merged" });
    match output {
        Some(path) if path.is_dir() => path.join(name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(name),
    }
}

pub fn run(
    inputs: Vec<PathBuf>,
    output: Option<&Path>,
    actions: Vec<MergeAction>,
    password: Option<String>,
    config: &Config,
) -> Result<()> {
    let merged_file = default_merge_output(output, password.is_some());
    let request = MergeRequest::new(inputs, merged_file, actions)?;

    let outcome = match password {
        Some(password) => merge_lock_and_save(MergeAndLockRequest::new(request, password)?)?,
        None => merge_and_save(request)?,
    };

    println!(
        "Merged {} file(s) ({} pages) into {}{}",
        outcome.files_merged,
        outcome.page_count,
        outcome.output.display(),
        if outcome.locked { " (locked)" } else { "" }
    );

    if config.reveal_output {
        reveal(containing_dir(&outcome.output));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::{all_page_texts, page_text, write_sample};

    #[test]
    fn test_request_rejects_empty_and_duplicates() {
        assert!(matches!(
            MergeRequest::new(vec![], "out.pdf", vec![]),
            Err(PdfError::NoFilesToMerge)
        ));

        let dir = tempfile::tempdir().unwrap();
        let a = write_sample(dir.path(), "a.pdf", &["A"]);
        let same = dir.path().join(".").join("a.pdf");
        assert!(matches!(
            MergeRequest::new(vec![a, same], "out.pdf", vec![]),
            Err(PdfError::DuplicateSource { .. })
        ));
    }

    #[test]
    fn test_merge_keeps_source_order() {
        let dir = tempfile::tempdir().unwrap();
        let doc1 = write_sample(dir.path(), "Doc1.pdf", &["Doc1"]);
        let doc2 = write_sample(dir.path(), "Doc2.pdf", &["Doc2"]);
        let output = dir.path().join("Final.pdf");

        let request = MergeRequest::new(vec![doc2, doc1], &output, vec![]).unwrap();
        let outcome = merge_and_save(request).unwrap();
        assert_eq!(outcome.page_count, 2);
        assert_eq!(outcome.files_merged, 2);

        let merged = PdfDocument::open(&output).unwrap();
        assert_eq!(all_page_texts(&merged), vec!["Doc2", "Doc1"]);
    }

    #[test]
    fn test_merge_then_delete_first_page() {
        let dir = tempfile::tempdir().unwrap();
        let doc1 = write_sample(dir.path(), "Doc1.pdf", &["Doc1"]);
        let doc2 = write_sample(dir.path(), "Doc2.pdf", &["Doc2"]);
        let output = dir.path().join("Final.pdf");

        let request =
            MergeRequest::new(vec![doc1, doc2.clone()], &output, vec![MergeAction::DeletePage(1)])
                .unwrap();
        merge_and_save(request).unwrap();

        let merged = PdfDocument::open(&output).unwrap();
        let second = PdfDocument::open(&doc2).unwrap();
        assert_eq!(merged.page_count(), 1);
        assert_eq!(page_text(&merged, 1), page_text(&second, 1));
    }

    #[test]
    fn test_merge_with_blank_pages() {
        let dir = tempfile::tempdir().unwrap();
        let doc1 = write_sample(dir.path(), "Doc1.pdf", &["A", "B"]);
        let doc2 = write_sample(dir.path(), "Doc2.pdf", &["C"]);
        let output = dir.path().join("Final.pdf");

        let actions = vec![MergeAction::AddBlankPage(2), MergeAction::AddBlankPageAtLast];
        let request = MergeRequest::new(vec![doc1, doc2], &output, actions).unwrap();
        merge_and_save(request).unwrap();

        let merged = PdfDocument::open(&output).unwrap();
        assert_eq!(all_page_texts(&merged), vec!["A", "", "B", "C", ""]);
    }

    #[test]
    fn test_failed_action_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let doc1 = write_sample(dir.path(), "Doc1.pdf", &["A"]);
        let output = dir.path().join("Final.pdf");

        let request = MergeRequest::new(vec![doc1], &output, vec![MergeAction::DeletePage(5)])
            .unwrap();
        assert!(merge_and_save(request).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_merge_and_lock() {
        let dir = tempfile::tempdir().unwrap();
        let doc1 = write_sample(dir.path(), "Doc1.pdf", &["A"]);
        let doc2 = write_sample(dir.path(), "Doc2.pdf", &["B"]);
        let output = dir.path().join("Locked.pdf");

        let request = MergeRequest::new(vec![doc1, doc2], &output, vec![]).unwrap();
        let request = MergeAndLockRequest::new(request, "secret").unwrap();
        let outcome = merge_lock_and_save(request).unwrap();
        assert!(outcome.locked);

        assert!(matches!(
            PdfDocument::open(&output),
            Err(PdfError::PasswordProtected { .. })
        ));
        let opened = PdfDocument::open_with_password(&output, "secret").unwrap();
        assert_eq!(all_page_texts(&opened), vec!["A", "B"]);
    }

    #[test]
    fn test_merge_and_lock_validates_password() {
        let request = MergeRequest::new(vec![PathBuf::from("a.pdf")], "out.pdf", vec![]).unwrap();
        assert!(matches!(
            MergeAndLockRequest::new(request, ""),
            Err(PdfError::InvalidPassword { .. })
        ));
    }

    #[test]
    fn test_run_checks_password_before_opening_sources() {
        let config = Config {
            reveal_output: false,
            verbose: false,
        };
        let err = run(
            vec![PathBuf::from("/no/such/a.pdf")],
            None,
            vec![],
            Some("p".repeat(21)),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, PdfError::InvalidPassword { .. }));
    }

    #[test]
    fn test_plan_actions_tracks_page_count() {
        let log = plan_actions(
            3,
            &[MergeAction::DeletePage(3), MergeAction::AddBlankPageAtLast],
        )
        .unwrap();
        assert_eq!(log.page_count(), 3);

        assert!(matches!(
            plan_actions(3, &[MergeAction::AddBlankPage(4)]),
            Err(PdfError::PageOutOfRange {
                page: 4,
                page_count: 3
            })
        ));
    }

    #[test]
    fn test_actions_checked_against_merged_page_count() {
        let dir = tempfile::tempdir().unwrap();
        let doc1 = write_sample(dir.path(), "Doc1.pdf", &["A", "B"]);
        let doc2 = write_sample(dir.path(), "Doc2.pdf", &["C"]);
        let output = dir.path().join("Final.pdf");

        // valid only once both sources are counted
        let request = MergeRequest::new(
            vec![doc1.clone(), doc2.clone()],
            &output,
            vec![MergeAction::DeletePage(3)],
        )
        .unwrap();
        let outcome = merge_and_save(request).unwrap();
        assert_eq!(outcome.page_count, 2);

        // the second delete refers to a page the first one removed
        let stale = vec![MergeAction::DeletePage(3), MergeAction::DeletePage(3)];
        let request =
            MergeRequest::new(vec![doc1, doc2], dir.path().join("Stale.pdf"), stale).unwrap();
        assert!(matches!(
            merge_and_save(request),
            Err(PdfError::PageOutOfRange {
                page: 3,
                page_count: 2
            })
        ));
        assert!(!dir.path().join("Stale.pdf").exists());
    }

    #[test]
    fn test_merge_lock_then_unlock_restores_pages() {
        let dir = tempfile::tempdir().unwrap();
        let doc1 = write_sample(dir.path(), "Doc1.pdf", &["A", "B"]);
        let doc2 = write_sample(dir.path(), "Doc2.pdf", &["C"]);
        let locked = dir.path().join("Locked.pdf");
        let unlocked = dir.path().join("Unlocked.pdf");

        let request = MergeRequest::new(
            vec![doc1, doc2],
            &locked,
            vec![MergeAction::AddBlankPage(2)],
        )
        .unwrap();
        merge_lock_and_save(MergeAndLockRequest::new(request, "secret").unwrap()).unwrap();

        crate::commands::unlock::unlock(&locked, &unlocked, "secret").unwrap();
        let restored = PdfDocument::open(&unlocked).unwrap();
        assert_eq!(all_page_texts(&restored), vec!["A", "", "B", "C"]);
    }

    #[test]
    fn test_default_merge_output() {
        let name = default_merge_output(None, true);
        assert!(name.to_string_lossy().starts_with("MergedAndLocked-"));

        let dir = tempfile::tempdir().unwrap();
        let inside = default_merge_output(Some(dir.path()), false);
        assert_eq!(inside.parent(), Some(dir.path()));
        assert!(inside
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("Merged-"));
    }
}
