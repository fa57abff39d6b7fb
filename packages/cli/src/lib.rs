// ABOUTME: Figstory command-line application: HTTP server and headless analysis runs
// ABOUTME: Configuration loading, logging setup and server assembly

pub mod analyze;
pub mod config;
pub mod middleware;
pub mod output;
pub mod server;


pub use config::{Config, ConfigError};
pub use server::{build_app, run_server};

/// Install the global tracing subscriber; `RUST_LOG` overrides the default `info`
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();
}
