use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jellyartctl=info,jellyart_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();

    // Any argument at all selects automation mode.
    if std::env::args_os().len() > 1 {
        let summary = cli::automation::run(args).await?;
        println!("{summary}");
        Ok(())
    } else {
        cli::menu::run_main_menu().await
    }
}
