mod config;
mod error;
mod run;
mod workbook;

use tracing_subscriber::EnvFilter;

use crate::error::CliError;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = try_main().await {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}

/// Verbosity comes from `RUST_LOG`; the tool itself takes no arguments.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();
}

async fn try_main() -> Result<(), CliError> {
    // Configuration is validated before any network call.
    let config = config::load()?;
    run::run(&config).await
}
