//! amz-paapi - Signed-request client for the Amazon Product Advertising API.

use amz_paapi::amazon::regions::Region;
use amz_paapi::commands::{LookupCommand, SearchCommand, SignCommand};
use amz_paapi::config::{Config, OutputFormat};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "amz-paapi",
    version,
    about = "Signed-request client for the Amazon Product Advertising API",
    long_about = "Searches and looks up items through the Product Advertising API (2013-08-01), signing every request with HMAC-SHA256."
)]
struct Cli {
    /// API region (ca, cn, de, es, fr, it, jp, uk, us)
    #[arg(short, long, global = true, env = "AWS_PRODUCT_REGION")]
    region: Option<Region>,

    /// Full endpoint URL, overrides the region host
    #[arg(long, global = true, env = "PAAPI_ENDPOINT")]
    endpoint: Option<String>,

    /// AWS access key id
    #[arg(long, global = true, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, global = true, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Associate tag
    #[arg(long, global = true, env = "AWS_ASSOCIATE_TAG")]
    associate_tag: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "PAAPI_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for items (ItemSearch)
    #[command(alias = "s")]
    Search {
        /// Search keywords
        keywords: String,

        /// Search index (Books, Electronics, All, ...)
        #[arg(short, long)]
        index: Option<String>,

        /// Response group
        #[arg(long)]
        response_group: Option<String>,

        /// Number of result pages to fetch (1-10)
        #[arg(short, long, default_value = "1")]
        pages: u32,
    },

    /// Look up items by ASIN (ItemLookup)
    #[command(alias = "l")]
    Lookup {
        /// ASIN(s) to look up
        #[arg(required = true)]
        asins: Vec<String>,

        /// Response group
        #[arg(long)]
        response_group: Option<String>,
    },

    /// Print a signed ItemSearch URL without sending it
    Sign {
        /// Search keywords
        keywords: String,

        /// Search index
        #[arg(short, long)]
        index: Option<String>,

        /// Response group
        #[arg(long)]
        response_group: Option<String>,

        /// Also print the canonical query and string-to-sign
        #[arg(long)]
        explain: bool,
    },

    /// List supported regions
    Regions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env()?;

    // Apply CLI overrides
    if let Some(region) = cli.region {
        config.region = region;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if cli.endpoint.is_some() {
        config.endpoint = cli.endpoint;
    }
    if cli.access_key.is_some() {
        config.access_key_id = cli.access_key;
    }
    if cli.secret_key.is_some() {
        config.secret_access_key = cli.secret_key;
    }
    if cli.associate_tag.is_some() {
        config.associate_tag = cli.associate_tag;
    }
    if cli.proxy.is_some() {
        config.proxy = cli.proxy;
    }

    match cli.command {
        Commands::Search { keywords, index, response_group, pages } => {
            if let Some(index) = index {
                config.search_index = index;
            }
            if let Some(group) = response_group {
                config.response_group = group;
            }

            let cmd = SearchCommand::new(config);
            let output = cmd.execute(&keywords, pages).await?;
            println!("{}", output);
        }

        Commands::Lookup { asins, response_group } => {
            if let Some(group) = response_group {
                config.response_group = group;
            }

            let cmd = LookupCommand::new(config);
            let output = cmd.execute(&asins).await?;
            println!("{}", output);
        }

        Commands::Sign { keywords, index, response_group, explain } => {
            if let Some(index) = index {
                config.search_index = index;
            }
            if let Some(group) = response_group {
                config.response_group = group;
            }

            let cmd = SignCommand::new(config);
            println!("{}", cmd.execute(&keywords, explain)?);
        }

        Commands::Regions => {
            println!("Supported Product Advertising API regions:\n");
            println!("{:<6} {:<24}", "Code", "Host");
            println!("{:-<6} {:-<24}", "", "");

            for region in Region::all() {
                println!("{:<6} {:<24}", region.to_string(), region.host());
            }
        }
    }

    Ok(())
}
