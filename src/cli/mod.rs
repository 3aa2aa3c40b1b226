pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "storyfeed")]
#[command(about = "Publish illustrated short stories to an RSS feed", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "storyfeed.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate one story with an illustration and add it to the feed
    Publish {
        /// Topic to write about (overrides the configured topic)
        #[arg(short, long)]
        topic: Option<String>,

        /// Number of feed items to keep (overrides the configured capacity)
        #[arg(long)]
        capacity: Option<usize>,
    },
    /// Create the feed document if it does not exist yet
    Init,
    /// List the items currently in the feed, oldest first
    List,
    /// Print a commented default configuration file
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_overrides() {
        let cli = Cli::parse_from([
            "storyfeed",
            "--config",
            "site.toml",
            "publish",
            "--topic",
            "a haunted lighthouse",
            "--capacity",
            "10",
        ]);

        assert_eq!(cli.config, PathBuf::from("site.toml"));
        match cli.command {
            Commands::Publish { topic, capacity } => {
                assert_eq!(topic.as_deref(), Some("a haunted lighthouse"));
                assert_eq!(capacity, Some(10));
            }
            _ => panic!("expected publish"),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::parse_from(["storyfeed", "list"]);
        assert_eq!(cli.config, PathBuf::from("storyfeed.toml"));
        assert!(matches!(cli.command, Commands::List));
    }
}
