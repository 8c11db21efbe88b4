// src/main.rs

use dotenvy::dotenv;
use quizdesk::{config::Config, shell, state::AppState};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    // The console belongs to the shell, so logs go to stderr and a rolling file.
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "quizdesk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    let mut state = match AppState::load(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to load data: {}", e);
            eprintln!("Error: {e}");
            // `exit` skips destructors; flush the file writer first.
            drop(guard);
            std::process::exit(1);
        }
    };

    if let Err(e) = shell::run(&mut state).await {
        tracing::error!("Shell stopped: {}", e);
    }

    // Flush on shutdown
    if let Err(e) = state.repo.flush() {
        tracing::error!("Failed to flush data on shutdown: {}", e);
    }
    tracing::info!("Goodbye");
}
