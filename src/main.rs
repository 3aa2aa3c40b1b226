use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use storyfeed::cli::{commands, Cli, Commands};
use storyfeed::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Publish { topic, capacity } => {
            let mut config = Config::load(&cli.config)?;
            commands::apply_publish_overrides(&mut config, topic, capacity)?;
            commands::publish(config).await?;
        }
        Commands::Init => {
            commands::init(&Config::load(&cli.config)?)?;
        }
        Commands::List => {
            commands::list(&Config::load(&cli.config)?)?;
        }
        Commands::Config => {
            commands::print_default_config();
        }
    }

    Ok(())
}
