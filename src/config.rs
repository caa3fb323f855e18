use crate::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Runtime options shared by every workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Open the destination directory once a workflow succeeds
    pub reveal_output: bool,
    pub verbose: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            reveal_output: !cli.no_open,
            verbose: cli.verbose,
        }
    }

    /// Log to stderr, honoring `RUST_LOG` when set.
    ///
    /// stdout is left alone since the tool server speaks its protocol there.
    pub fn init_logging(&self) {
        let default = if self.verbose { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        // A second init (e.g. from tests) is harmless.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}
