//! Multilingual WebSocket chat server.
//!
//! Relays messages between connected clients, translating each message
//! into every recipient's preferred language, and answers questions
//! through a local language model.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000
//! ```
//!
//! Backend endpoints come from the environment: `TRANSLATE_URL`,
//! `OLLAMA_URL`, `OLLAMA_MODEL`.

use babelchat::{common::logger::setup_logger, config::Config, server::run_server};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Multilingual WebSocket chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = Config::from_env();

    if let Err(e) = run_server(args.host, args.port, config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
