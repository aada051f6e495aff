use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use user_tweets::commands;
use user_tweets::datetime_utils::SystemClock;
use user_tweets::twitter::{TwitterClient, TWITTER_API_BASE};

#[derive(Parser, Debug)]
#[command(
    name = "user-tweets",
    version,
    about = "Fetch a user's recent tweets",
    long_about = "Looks up a Twitter user by username, fetches their 50 most recent tweets \
                  and saves the response to user_tweets_output_<timestamp>.json"
)]
struct Cli {
    /// Twitter API bearer token for authentication
    #[arg(long, env = "BEARER_TOKEN", hide_env_values = true)]
    bearer_token: Option<String>,

    /// Twitter username (with or without @ symbol)
    #[arg(short, long, env = "USER_TWEETS_USERNAME", default_value = "EFAparty")]
    username: String,

    /// Directory the JSON output file is written to
    #[arg(short, long, env = "USER_TWEETS_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Base URL of the Twitter API v2
    #[arg(long, env = "TWITTER_API_BASE", default_value = TWITTER_API_BASE)]
    api_base: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Parse command line arguments
    let args = Cli::parse();

    // Initialize logging
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if args.verbose {
        debug!("Verbose mode enabled");
    }

    let bearer_token = args.bearer_token.filter(|token| !token.is_empty()).context(
        "Twitter bearer token not specified. Please set --bearer-token or BEARER_TOKEN environment variable",
    )?;

    if !args.output_dir.is_dir() {
        anyhow::bail!(
            "Output directory does not exist: {path}",
            path = args.output_dir.display()
        );
    }

    let client = TwitterClient::new(&bearer_token, &args.api_base)
        .context("Failed to initialize Twitter client")?;

    let stdout = std::io::stdout();
    let saved_path = commands::user_tweets::execute(
        &client,
        &args.username,
        &args.output_dir,
        &SystemClock,
        &mut stdout.lock(),
    )
    .await?;

    info!("Finished, output at {path}", path = saved_path.display());

    Ok(())
}
