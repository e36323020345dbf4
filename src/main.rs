use anyhow::Result;
use clap::Parser;
use fridgetop::cli::{Cli, Command};
use fridgetop::{commands, config};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Reports go to stdout; logs stay on stderr.
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut app_config = config::AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.history_db {
        app_config.history.path = path;
    }

    match cli.command {
        Command::Watch(args) => commands::watch::run(&app_config, args).await,
        Command::History(args) => commands::history::run(&app_config, args).await,
    }
}
