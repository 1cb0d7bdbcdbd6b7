use anyhow::Result;
use clap::Parser;
use jobfinder::app;
use jobfinder::app_log;
use jobfinder::cli::Cli;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!(
                "\n{} Process interrupted by the user. Thank you for using JobFinder!",
                app::FINISHED_CONTEXT
            );
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    });

    let cli = Cli::parse();
    if let Err(e) = app::run(cli).await {
        app_log!(error, "<- MAIN -> Error: {:#}", e);
        return Err(e);
    }
    Ok(())
}
