use anyhow::Result;
use clap::Parser;
use conference_notes::{
    app,
    cli::{
        handle_latest_command, handle_list_command, handle_process_command, handle_status_command,
        Cli, CliCommand,
    },
    config::Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(CliCommand::Version) = cli.command {
        println!("Conference Notes {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = Config::load()?;

    match cli.command {
        Some(CliCommand::List(args)) => handle_list_command(&config, args).await,
        Some(CliCommand::Process(args)) => handle_process_command(&config, args).await,
        Some(CliCommand::Latest(args)) => handle_latest_command(&config, args).await,
        Some(CliCommand::Status) => handle_status_command(&config),
        Some(CliCommand::Serve) | Some(CliCommand::Version) | None => {
            app::run_service(&config).await
        }
    }
}
