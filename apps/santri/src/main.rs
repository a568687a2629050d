//! Santri binary entry point.

use clap::Parser;
use santri::cli::{cmd_check_import, cmd_render_pdf, cmd_serve, cmd_template};
use santri::config::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => cmd_serve(args).await,
        Commands::CheckImport { file, json } => cmd_check_import(&file, json).map(|_| ()),
        Commands::Template { output, force } => cmd_template(&output, force).map(|_| ()),
        Commands::RenderPdf {
            file,
            no_urut,
            output,
            force,
        } => cmd_render_pdf(&file, no_urut, &output, force),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
