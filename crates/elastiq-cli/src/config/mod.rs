//! Command-line configuration.
//!
//! ```text
//! Cli
//! ├── reqwest: ReqwestConfig   # Engine URL, timeout, user agent
//! └── command: Command
//!     ├── search-template      # Runs a templated search
//!     └── knn                  # Prints a kNN query document
//! ```
//!
//! Engine settings can be provided via CLI arguments or environment variables.
//!
//! # Example
//!
//! ```bash
//! elastiq --url http://127.0.0.1:9200 search-template --index books --id by-author
//!
//! ELASTIQ_URL=http://127.0.0.1:9200 elastiq search-template --id by-author
//! ```

mod knn;
mod search_template;

use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use elastiq_client::ReqwestConfig;
pub use knn::KnnArgs;
pub use search_template::SearchTemplateArgs;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::TRACING_TARGET_STARTUP;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "elastiq")]
#[command(about = "Templated searches and kNN query documents for Elasticsearch")]
#[command(version)]
pub struct Cli {
    /// Engine connection configuration.
    #[clap(flatten)]
    pub reqwest: ReqwestConfig,

    /// What to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Runs a templated search and prints the result as JSON.
    SearchTemplate(SearchTemplateArgs),
    /// Prints a kNN query document as JSON.
    Knn(KnnArgs),
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    ///
    /// Called before parsing so that clap's `env` lookups see the values.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so that stdout carries only command output.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.reqwest
            .validate()
            .context("invalid engine configuration")?;
        Ok(())
    }

    /// Logs configuration at debug level.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            url = %self.reqwest.url,
            http_timeout_secs = self.reqwest.effective_timeout().as_secs(),
            user_agent = %self.reqwest.effective_user_agent(),
            "Engine configuration"
        );
    }
}
