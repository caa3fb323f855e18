use crate::error::{PdfError, Result};
use crate::pdf::PdfDocument;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single page edit applied to a merged document.
///
/// Positions are 1-based and refer to the document as it stands after every
/// earlier action in the same list has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "page", rename_all = "snake_case")]
pub enum MergeAction {
    DeletePage(u32),
    AddBlankPage(u32),
    AddBlankPageAtLast,
}

impl MergeAction {
    /// Apply to `doc`. Positions are not re-validated here; an out-of-range
    /// position fails with the page tree's own error.
    pub fn apply(&self, doc: &mut PdfDocument) -> Result<()> {
        match *self {
            MergeAction::DeletePage(page) => doc.delete_page(page),
            MergeAction::AddBlankPage(page) => doc.insert_blank_page(page),
            MergeAction::AddBlankPageAtLast => doc.append_blank_page(),
        }
    }

    fn page_delta(&self) -> i64 {
        match self {
            MergeAction::DeletePage(_) => -1,
            MergeAction::AddBlankPage(_) | MergeAction::AddBlankPageAtLast => 1,
        }
    }
}

impl fmt::Display for MergeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeAction::DeletePage(page) => write!(f, "delete:{}", page),
            MergeAction::AddBlankPage(page) => write!(f, "blank:{}", page),
            MergeAction::AddBlankPageAtLast => write!(f, "blank:end"),
        }
    }
}

impl FromStr for MergeAction {
    type Err = PdfError;

    /// Parse `delete:N`, `blank:N` or `blank:end`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PdfError::InvalidAction(s.to_string());
        let (verb, arg) = s.trim().split_once(':').ok_or_else(invalid)?;
        let arg = arg.trim();

        match verb.trim().to_ascii_lowercase().as_str() {
            "blank" if arg.eq_ignore_ascii_case("end") => Ok(MergeAction::AddBlankPageAtLast),
            "blank" => arg.parse().map(MergeAction::AddBlankPage).map_err(|_| invalid()),
            "delete" => arg.parse().map(MergeAction::DeletePage).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

/// Apply `actions` in order. Stops at the first failure and leaves the
/// document partially edited; callers must not save it in that case.
pub fn apply_actions(doc: &mut PdfDocument, actions: &[MergeAction]) -> Result<()> {
    for action in actions {
        tracing::debug!(%action, pages = doc.page_count(), "applying page action");
        action.apply(doc)?;
    }
    Ok(())
}

/// Append-only record of page edits, tracking the page count the edits produce.
///
/// Each [`ActionLog::push`] consumes the log and returns the next snapshot,
/// so one workflow stage hands the log to the next instead of sharing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLog {
    page_count: u32,
    actions: Vec<MergeAction>,
}

impl ActionLog {
    /// Start a log for a document of `page_count` pages.
    pub fn new(page_count: u32) -> Self {
        ActionLog {
            page_count,
            actions: Vec::new(),
        }
    }

    /// Record `action`, checking its position against the current page count.
    pub fn push(mut self, action: MergeAction) -> Result<Self> {
        match action {
            MergeAction::DeletePage(page) | MergeAction::AddBlankPage(page)
                if page == 0 || page > self.page_count =>
            {
                return Err(PdfError::PageOutOfRange {
                    page,
                    page_count: self.page_count,
                });
            }
            _ => {}
        }

        self.page_count = (i64::from(self.page_count) + action.page_delta()) as u32;
        self.actions.push(action);
        Ok(self)
    }

    /// Pages the document will have once every recorded action is applied.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn actions(&self) -> &[MergeAction] {
        &self.actions
    }
}
