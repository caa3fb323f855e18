use crate::actions::MergeAction;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdftailor")]
#[command(about = "Split, merge, lock and unlock PDF files, with MCP server support")]
#[command(version)]
pub struct Cli {
    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Don't open the destination folder when done
    #[arg(long, global = true)]
    pub no_open: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server over stdio
    Mcp,

    /// Split a PDF into single pages or custom page ranges
    #[command(alias = "burst")]
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Output directory (defaults to the file's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Page ranges, one output file per term (e.g., "1,2-4,5-8")
        #[arg(short, long)]
        range: Option<String>,
    },

    /// Check a page range against a PDF's page count
    CheckRange {
        /// PDF file the range refers to
        path: PathBuf,

        /// Page ranges (e.g., "1,2-4")
        range: String,
    },

    /// Combine multiple PDFs into one, optionally editing pages and locking the result
    #[command(alias = "cat")]
    Merge {
        /// PDF files to merge, in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file or directory (defaults to Merged-<date>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page edit applied after merging, in order: delete:N, blank:N or blank:end
        #[arg(short, long = "action", value_parser = parse_action)]
        actions: Vec<MergeAction>,

        /// Protect the merged file with this password
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Password-protect a PDF
    Lock {
        /// PDF file to protect
        path: PathBuf,

        /// Password used to open the result
        #[arg(short, long)]
        password: String,

        /// Output file or directory (defaults to <name>_Locked.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove password protection from a PDF
    Unlock {
        /// Protected PDF file
        path: PathBuf,

        /// Password that opens the file
        #[arg(short, long)]
        password: String,

        /// Output file or directory (defaults to <name>_Unlocked.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show page sizes and text excerpts
    Preview {
        /// PDF files to preview
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn parse_action(s: &str) -> Result<MergeAction, String> {
    s.parse().map_err(|e: crate::error::PdfError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_actions_keep_order() {
        let cli = Cli::parse_from([
            "pdftailor", "merge", "a.pdf", "b.pdf", "-a", "delete:2", "--action", "blank:end",
            "-a", "blank:1",
        ]);
        match cli.command {
            Commands::Merge {
                inputs, actions, ..
            } => {
                assert_eq!(inputs, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
                assert_eq!(
                    actions,
                    vec![
                        MergeAction::DeletePage(2),
                        MergeAction::AddBlankPageAtLast,
                        MergeAction::AddBlankPage(1),
                    ]
                );
            }
            _ => panic!("expected merge"),
        }
    }

    #[test]
    fn test_bad_action_is_rejected() {
        assert!(Cli::try_parse_from(["pdftailor", "merge", "a.pdf", "-a", "rotate:1"]).is_err());
    }

    #[test]
    fn test_lock_requires_password() {
        assert!(Cli::try_parse_from(["pdftailor", "lock", "a.pdf"]).is_err());
    }
}
