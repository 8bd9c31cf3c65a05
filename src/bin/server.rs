//! Realtime collaborative code-block server.
//!
//! One mentor and many students share a code-editing room over WebSocket;
//! code blocks and their ratings are served over the HTTP API.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin peercode-server
//! ```

use clap::Parser;
use peercode::logger::setup_logger;

/// Command line options for the server binary
#[derive(Debug, Parser)]
#[command(name = "peercode-server", about = "Realtime collaborative code-block server")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 4000)]
    port: u16,

    /// Default log level applied when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = peercode::run_server(&args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
