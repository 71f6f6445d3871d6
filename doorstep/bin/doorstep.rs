//! Doorstep command-line interface.
//!
//! Loads a seed file into the in-memory store and drives the dispatch
//! engine against it with the console transport: messages are logged, not
//! delivered. `send` is the "send campaign now" operation; `validate`
//! checks every campaign in a seed file against the save-time gate.

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use doorstep::{config::Config, seed};
use doorstep_common::{MessageType, logging};
use doorstep_dispatch::{Dispatcher, SendRequest, transport::console::ConsoleTransport};
use doorstep_store::{MemoryStore, Store};

/// Visitor check-in and follow-up messaging for open houses
#[derive(Parser, Debug)]
#[command(name = "doorstep")]
#[command(about = "Send and inspect follow-up campaigns", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a campaign now
    Send {
        /// Path to the seed data file
        #[arg(short, long)]
        seed: PathBuf,

        /// Key of the campaign to send
        #[arg(long)]
        campaign: String,

        /// Restrict the run to these visitor keys (repeatable)
        #[arg(long = "visitor")]
        visitors: Vec<String>,

        /// Restrict the run to visitors of this property key
        #[arg(long)]
        property: Option<String>,

        /// Override the campaign's message type (email, sms, both)
        #[arg(long)]
        message_type: Option<String>,
    },

    /// Validate every campaign in a seed file
    Validate {
        /// Path to the seed data file
        #[arg(short, long)]
        seed: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Send {
            seed,
            campaign,
            visitors,
            property,
            message_type,
        } => send(&config, &seed, &campaign, &visitors, property.as_deref(), message_type).await,
        Commands::Validate { seed } => validate(&seed).await,
    }
}

async fn send(
    config: &Config,
    seed_path: &std::path::Path,
    campaign: &str,
    visitors: &[String],
    property: Option<&str>,
    message_type: Option<String>,
) -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let index = seed::load(seed_path, &store).await?;
    tracing::info!(
        visitors = index.visitors.len(),
        campaigns = index.campaigns.len(),
        "seed data loaded"
    );

    let campaign_id = index.campaign("--campaign", campaign)?;
    let mut request = SendRequest::new(campaign_id);

    if !visitors.is_empty() {
        let ids = visitors
            .iter()
            .map(|key| index.visitor("--visitor", key))
            .collect::<Result<Vec<_>, _>>()?;
        request = request.with_visitors(ids);
    }

    if let Some(key) = property {
        request = request.with_property(index.property("--property", key)?);
    }

    if let Some(value) = message_type {
        request = request.with_message_type(value.parse::<MessageType>()?);
    }

    let dispatcher = Dispatcher::new(Arc::new(store.clone()), Arc::new(ConsoleTransport))
        .with_timeouts(config.timeouts);
    let summary = dispatcher.send_campaign(request).await?;

    println!(
        "Campaign {campaign}: {} sent, {} failed",
        summary.sent, summary.failed
    );
    for failure in &summary.failures {
        println!(
            "  {} via {}: {}",
            failure.recipient, failure.channel, failure.error
        );
    }

    let stats = store.campaign_stats(campaign_id).await?;
    println!(
        "Delivery log: {} entries ({} sent, {} failed)",
        stats.total, stats.sent, stats.failed
    );

    Ok(())
}

async fn validate(seed_path: &std::path::Path) -> anyhow::Result<()> {
    // Loading runs every campaign through the save-time validation gate
    let store = MemoryStore::new();
    let index = seed::load(seed_path, &store).await?;

    println!(
        "OK: {} campaigns, {} visitors, {} properties",
        index.campaigns.len(),
        index.visitors.len(),
        index.properties.len()
    );
    Ok(())
}
