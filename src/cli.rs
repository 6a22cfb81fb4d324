use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;

use crate::catalog;
use crate::config::Config;
use crate::connect::{run_connect, watch_sync_status};

/// `sourcesync` - connect merchant data sources to the analytics backend.
#[derive(Parser, Debug)]
#[command(name = "sourcesync")]
#[command(version = "0.1.0")]
#[command(about = "Connect storefront, ad, and messaging platforms to analytics.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the platforms that can be connected
    Platforms,

    /// Run the connection wizard for a platform
    Connect {
        /// Platform identifier (see `sourcesync platforms`); prompts if omitted
        #[arg(short, long)]
        platform: Option<String>,
    },

    /// Show the sync state of an existing connection
    Status {
        /// Connection identifier returned when the source was connected
        connection_id: String,

        /// Keep polling until the sync run finishes
        #[arg(long)]
        watch: bool,
    },
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Platforms => {
            print_platforms();
            Ok(())
        }
        Commands::Connect { platform } => run_connect(&config, platform.as_deref()).await,
        Commands::Status {
            connection_id,
            watch,
        } => watch_sync_status(&config, &connection_id, watch).await,
    }
}

fn print_platforms() {
    println!();
    println!("  {}", style("Connectable platforms").white().bold());
    println!("  {}", style("─".repeat(50)).dim());
    for platform in catalog::catalog() {
        let accounts = if platform.has_account_selection() {
            style("multi-account").cyan().to_string()
        } else {
            style("single").dim().to_string()
        };
        println!(
            "  {:<14} {:<12} {:<8} {}",
            platform.id,
            platform.display_name,
            platform.category,
            accounts
        );
    }
    println!();
}
