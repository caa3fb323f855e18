use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::actions::MergeAction;
use crate::commands::lock::lock;
use crate::commands::merge::{
    default_merge_output, merge_and_save, merge_lock_and_save, MergeAndLockRequest, MergeRequest,
};
use crate::commands::split::split;
use crate::commands::unlock::unlock;
use crate::commands::{append_to_name, containing_dir, resolve_output};
use crate::error::{ErrorKind, PdfError};
use crate::page_range::is_page_range_valid;
use crate::pdf::preview::load_previews;
use crate::pdf::PdfDocument;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ValidateRangeRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1,2-4,5-8')")]
    pub range: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SplitRequest {
    #[schemars(description = "Path to the PDF file to split")]
    pub path: String,
    #[schemars(description = "Directory to write the parts to (default: the file's directory)")]
    pub output_dir: Option<String>,
    #[schemars(
        description = "Page ranges, one output file per term (e.g., '1,3-5'). Omit to split every page."
    )]
    pub range: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfMergeRequest {
    #[schemars(description = "PDF files to merge, in order")]
    pub files: Vec<String>,
    #[schemars(description = "Output file or directory (default: Merged-<date>.pdf)")]
    pub output: Option<String>,
    #[schemars(
        description = "Page edits applied in order after merging: 'delete:N', 'blank:N' or 'blank:end'"
    )]
    #[serde(default)]
    pub actions: Vec<String>,
    #[schemars(description = "Protect the merged file with this password")]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProtectionRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Password (1-20 characters)")]
    pub password: String,
    #[schemars(description = "Output file or directory (default: next to the source)")]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PreviewRequest {
    #[schemars(description = "PDF files to preview")]
    pub paths: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Check whether a page range expression like '1,2-4' is valid for a PDF")]
    fn pdf_validate_range(&self, Parameters(req): Parameters<ValidateRangeRequest>) -> String {
        match PdfDocument::open(&req.path) {
            Ok(doc) => {
                let page_count = doc.page_count();
                to_json(&RangeCheckResult {
                    valid: is_page_range_valid(&req.range, page_count),
                    page_count,
                })
            }
            Err(e) => render_error(&e),
        }
    }

    #[tool(description = "Split a PDF into single pages, or into one file per term of a page range")]
    fn pdf_split(&self, Parameters(req): Parameters<SplitRequest>) -> String {
        let path = PathBuf::from(&req.path);
        let output_dir = req
            .output_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| containing_dir(&path).to_path_buf());

        match split(&path, &output_dir, req.range.as_deref()) {
            Ok(outcome) => to_json(&outcome),
            Err(e) => render_error(&e),
        }
    }

    #[tool(description = "Merge PDFs in order, apply page edits, and optionally password-protect the result")]
    fn pdf_merge(&self, Parameters(req): Parameters<PdfMergeRequest>) -> String {
        let actions = match req
            .actions
            .iter()
            .map(|a| a.parse::<MergeAction>())
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(actions) => actions,
            Err(e) => return render_error(&e),
        };

        let output = default_merge_output(
            req.output.as_deref().map(Path::new),
            req.password.is_some(),
        );
        let files = req.files.into_iter().map(PathBuf::from).collect();

        let outcome = MergeRequest::new(files, output, actions).and_then(|request| {
            match req.password {
                Some(password) => {
                    merge_lock_and_save(MergeAndLockRequest::new(request, password)?)
                }
                None => merge_and_save(request),
            }
        });

        match outcome {
            Ok(outcome) => to_json(&outcome),
            Err(e) => render_error(&e),
        }
    }

    #[tool(description = "Password-protect a PDF, using the password for both opening and permissions")]
    fn pdf_lock(&self, Parameters(req): Parameters<ProtectionRequest>) -> String {
        let path = PathBuf::from(&req.path);
        let output = resolve_output(
            req.output.as_deref().map(Path::new),
            &path,
            &append_to_name(&path, "Locked"),
        );

        match lock(&path, &output, &req.password) {
            Ok(outcome) => to_json(&outcome),
            Err(e) => render_error(&e),
        }
    }

    #[tool(description = "Remove password protection from a PDF given its password")]
    fn pdf_unlock(&self, Parameters(req): Parameters<ProtectionRequest>) -> String {
        let path = PathBuf::from(&req.path);
        let output = resolve_output(
            req.output.as_deref().map(Path::new),
            &path,
            &append_to_name(&path, "Unlocked"),
        );

        match unlock(&path, &output, &req.password) {
            Ok(outcome) => to_json(&outcome),
            Err(e) => render_error(&e),
        }
    }

    #[tool(description = "Page sizes and text excerpts for every page of the given PDFs")]
    async fn pdf_preview(&self, Parameters(req): Parameters<PreviewRequest>) -> String {
        let paths = req.paths.into_iter().map(PathBuf::from).collect();
        match load_previews(paths).await {
            Ok(previews) => to_json(&previews),
            Err(e) => render_error(&e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RangeCheckResult {
    pub valid: bool,
    pub page_count: u32,
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error: {}", e))
}

fn render_error(err: &PdfError) -> String {
    tracing::warn!(error = %err, "tool call failed");
    match err.kind() {
        ErrorKind::Unknown => format!("Error: {} ({})", err.user_message(), err),
        _ => format!("Error: {}", err.user_message()),
    }
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF editing tools. Use pdf_validate_range to check a range expression, \
                 pdf_split to split by page or range, pdf_merge to combine files with optional \
                 page edits and password, pdf_lock / pdf_unlock to manage password protection, \
                 and pdf_preview to inspect pages."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();
    tracing::info!("serving tools over stdio");

    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
