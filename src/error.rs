use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, PdfError>;

const UNEXPECTED_ERROR: &str = "Hmm, that didn't work.";

/// Failures surfaced by the split, merge, lock and unlock workflows.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("Document has no pages: {path}")]
    EmptyDocument { path: PathBuf },

    #[error("Document is password protected: {path}")]
    PasswordProtected { path: PathBuf },

    #[error("Incorrect password for: {path}")]
    IncorrectPassword { path: PathBuf },

    #[error("Invalid page range \"{range}\" for a document with {page_count} page(s)")]
    InvalidRange { range: String, page_count: u32 },

    #[error("Page {page} is out of range (1-{page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },

    #[error("Password must be between 1 and {max} characters")]
    InvalidPassword { max: usize },

    #[error("No PDF files to merge")]
    NoFilesToMerge,

    #[error("File listed more than once: {path}")]
    DuplicateSource { path: PathBuf },

    #[error("Invalid page action \"{0}\" (expected delete:N, blank:N or blank:end)")]
    InvalidAction(String),

    #[error("Failed to load PDF at {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("{path} lists {expected} page(s) but only {found} could be read")]
    IncompletePageTree {
        path: PathBuf,
        expected: i64,
        found: u32,
    },

    #[error("Failed to save PDF to {path}: {reason}")]
    Save { path: PathBuf, reason: String },

    #[error("Failed to encrypt PDF: {0}")]
    Encryption(String),

    #[error("Malformed page tree: {0}")]
    PageTree(#[from] lopdf::Error),

    #[error("Background task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The categories a user-facing surface distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyDocument,
    PasswordProtected,
    IncorrectPassword,
    InvalidInput,
    Unknown,
}

impl PdfError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PdfError::EmptyDocument { .. } => ErrorKind::EmptyDocument,
            PdfError::PasswordProtected { .. } => ErrorKind::PasswordProtected,
            PdfError::IncorrectPassword { .. } => ErrorKind::IncorrectPassword,
            PdfError::InvalidRange { .. }
            | PdfError::InvalidPassword { .. }
            | PdfError::NoFilesToMerge
            | PdfError::DuplicateSource { .. }
            | PdfError::InvalidAction(_)
            | PdfError::PageOutOfRange { .. } => ErrorKind::InvalidInput,
            PdfError::Load { .. }
            | PdfError::IncompletePageTree { .. }
            | PdfError::Save { .. }
            | PdfError::Encryption(_)
            | PdfError::PageTree(_)
            | PdfError::Worker(_)
            | PdfError::Io(_) => ErrorKind::Unknown,
        }
    }

    /// Message shown to the person running the workflow.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::EmptyDocument => "Cannot open an empty document".to_string(),
            ErrorKind::PasswordProtected => {
                "One or more documents are password protected. Please unlock and try again."
                    .to_string()
            }
            ErrorKind::IncorrectPassword => "Incorrect password provided".to_string(),
            ErrorKind::InvalidInput => self.to_string(),
            ErrorKind::Unknown => UNEXPECTED_ERROR.to_string(),
        }
    }
}
