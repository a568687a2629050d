//! # Configuration
//!
//! Command-line surface and server settings. Every server flag can also be
//! set through a `SANTRI_*` environment variable.

use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// Upload size limit for spreadsheet imports (10 MiB).
pub const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

// =============================================================================
// CLI
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "santri", version, about = "Student records for pesantren administration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve(ServeArgs),

    /// Dry-run an XLSX import and print the report.
    CheckImport {
        /// Spreadsheet to check.
        file: PathBuf,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Write an XLSX file with the sample students as a starting point.
    Template {
        /// Output path.
        output: PathBuf,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Import a spreadsheet and render one of its rows as a PDF form.
    RenderPdf {
        /// Spreadsheet to import.
        file: PathBuf,
        /// Sequence number of the record (1 for the first imported row).
        no_urut: u32,
        /// Output path.
        output: PathBuf,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Flags for `santri serve`.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(long, env = "SANTRI_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to bind.
    #[arg(long, env = "SANTRI_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Require this key on every /api request.
    #[arg(long, env = "SANTRI_API_KEY")]
    pub api_key: Option<String>,

    /// Global request quota per second for /api (0 disables).
    #[arg(long, env = "SANTRI_RATE_LIMIT", default_value_t = 0)]
    pub rate_limit: u32,

    /// Load the sample students at start-up.
    #[arg(long, env = "SANTRI_SEED")]
    pub seed: bool,
}

// =============================================================================
// SERVER CONFIG
// =============================================================================

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `None` disables the API-key guard.
    pub api_key: Option<String>,
    /// `None` disables rate limiting.
    pub rate_limit: Option<NonZeroU32>,
    pub seed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_key: None,
            rate_limit: None,
            seed: false,
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            // An empty key would accept an empty header; treat it as unset.
            api_key: args.api_key.filter(|key| !key.is_empty()),
            rate_limit: NonZeroU32::new(args.rate_limit),
            seed: args.seed,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Option<Commands> {
        Cli::try_parse_from(args).ok().map(|cli| cli.command)
    }

    #[test]
    fn serve_defaults() {
        let command = parse(&["santri", "serve"]);
        assert!(matches!(command, Some(Commands::Serve(_))));
        if let Some(Commands::Serve(args)) = command {
            let config = ServerConfig::from(args);
            assert_eq!(config.bind_addr(), "127.0.0.1:8080");
            assert_eq!(config.rate_limit, None);
            assert!(!config.seed);
        }
    }

    #[test]
    fn serve_flags() {
        let command = parse(&[
            "santri",
            "serve",
            "--port",
            "9000",
            "--api-key",
            "secret",
            "--rate-limit",
            "5",
            "--seed",
        ]);
        assert!(matches!(command, Some(Commands::Serve(_))));
        if let Some(Commands::Serve(args)) = command {
            let config = ServerConfig::from(args);
            assert_eq!(config.port, 9000);
            assert_eq!(config.api_key.as_deref(), Some("secret"));
            assert_eq!(config.rate_limit.map(NonZeroU32::get), Some(5));
            assert!(config.seed);
        }
    }

    #[test]
    fn empty_api_key_disables_guard() {
        let args = ServeArgs {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_key: Some(String::new()),
            rate_limit: 0,
            seed: false,
        };
        assert_eq!(ServerConfig::from(args).api_key, None);
    }

    #[test]
    fn render_pdf_arguments() {
        let command = parse(&["santri", "render-pdf", "in.xlsx", "2", "out.pdf", "--force"]);
        assert!(matches!(
            command,
            Some(Commands::RenderPdf {
                no_urut: 2,
                force: true,
                ..
            })
        ));
    }
}
