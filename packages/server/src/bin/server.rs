//! Fan-out message hub server.
//!
//! Every message a client sends is broadcast to all connected clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hubcast-server -- --port 8080
//! ```

use clap::Parser;
use hubcast_server::ServerConfig;
use hubcast_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let dotenv_result = dotenv::dotenv();
    let config = ServerConfig::parse();

    let dispatch = match setup_logger(&config.logger_config()) {
        Ok(dispatch) => dispatch,
        Err(e) => {
            eprintln!("failed to set up logging: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = dotenv_result {
        tracing::debug!(error = %e, "no .env file loaded; using process environment");
    }

    if let Err(e) = hubcast_server::run_server(config, dispatch).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
