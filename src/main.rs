//! healthcheck
//!
//! Probes a service on the local host and reports the verdict through the
//! process exit code.
//!
//! # Architecture Overview
//!
//! ```text
//!   flags + optional TOML file
//!        │
//!        ▼
//!   ┌─────────┐    ┌──────────────┐    ┌─────────────────────┐
//!   │ config  │───▶│ health::poll │───▶│ health::engine      │──▶ service
//!   │ loader  │    │ single-shot/ │    │ interface select +  │    (tcp/http)
//!   └─────────┘    │ ready/live   │    │ connect / HTTP GET  │
//!                  └──────┬───────┘    └─────────────────────┘
//!                         │ ProbeResult
//!                         ▼
//!               cli::report → stdout/stderr + exit code
//! ```

use std::io::Write;
use std::sync::Arc;

use healthcheck::cli::{self, Cli};
use healthcheck::config::{load_settings, PollMode};
use healthcheck::health::{self, codes};
use healthcheck::lifecycle::{spawn_signal_listener, Shutdown};
use healthcheck::observability::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse_args();
    logging::init();

    let settings = match load_settings(cli.config.as_deref(), cli.overrides()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("healthcheck: {}", e);
            std::process::exit(codes::USAGE);
        }
    };

    let shutdown = Arc::new(Shutdown::new());
    let signal = shutdown.subscribe();
    if settings.mode != PollMode::SingleShot {
        spawn_signal_listener(shutdown.clone());
    }

    let result = health::run(settings.probe, settings.mode, signal).await;

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let code = cli::report(&result, &mut stdout, &mut stderr);
    let _ = stdout.flush();
    let _ = stderr.flush();
    std::process::exit(code);
}
