use std::sync::Arc;

use tracing::info;

use userman_console::config::{load_config, print_schema};
use userman_console::startup;
use userman_console::utils::logger::init_logging;

#[tokio::main]
async fn main() {
    // `--schema` dumps the config JSON schema and exits.
    if std::env::args().any(|arg| arg == "--schema") {
        print_schema();
        return;
    }

    let config = Arc::new(load_config());
    init_logging(&config.logging);

    let state = startup::build(config).await;

    match state.session.username() {
        Some(username) if state.session.is_authenticated() => {
            info!(username = %username, "restored session from storage");
        }
        _ => {
            info!("no stored session; login required");
        }
    }
}
