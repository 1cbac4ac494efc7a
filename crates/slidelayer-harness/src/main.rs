#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    if let Err(error) = slidelayer_harness::run_from_env() {
        tracing::error!(target: "slidelayer.harness", code = error.exit_code(), "{error}");
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}

/// Logs go to stderr so JSONL on stdout stays clean. `RUST_LOG` selects
/// targets, e.g. `RUST_LOG=slidelayer.decision=debug`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    #[cfg(feature = "json-log")]
    let result = builder.json().try_init();
    #[cfg(not(feature = "json-log"))]
    let result = builder.try_init();
    if let Err(err) = result {
        eprintln!("tracing already initialized: {err}");
    }
}
