use anyhow::Result;
use clap::Parser;
use gemini_chat::app::App;
use gemini_chat::config::{Cli, Config};
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = Config::load(&cli)?;
    let level = if cfg.logging_enabled {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let (tx, rx) = mpsc::unbounded_channel();
    let app = App::new(cfg, tx).await?;
    info!("gemini-chat core running - press Ctrl+C to exit");
    tokio::select! {
        result = app.run(rx) => result?,
        _ = tokio::signal::ctrl_c() => {}
    }
    Ok(())
}
