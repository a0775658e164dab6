//! BHS Language Server binary entry point
//!
//! Run with: bhs-lsp [--functions <path>]
//!
//! The LSP communicates via stdin/stdout using the Language Server Protocol. Logs go to stderr.

use std::path::PathBuf;

use clap::Parser;
use tower_lsp::{LspService, Server};

use bhs::database::FUNCTIONS_ENV;
use bhs::lsp::BhsLanguageServer;

#[derive(Parser, Debug)]
#[command(name = "bhs-lsp", version, about = "Language server for BHS scripts")]
struct Args {
    /// Function database (JSON)
    #[arg(long, env = FUNCTIONS_ENV)]
    functions: Option<PathBuf>,

    /// Accepted for client compatibility; stdio is the only transport
    #[arg(long, hide = true)]
    stdio: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // stdout carries the protocol, so logs must stay on stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| BhsLanguageServer::with_database(client, args.functions));

    Server::new(stdin, stdout, socket).serve(service).await;
}
