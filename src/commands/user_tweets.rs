use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::datetime_utils::Clock;
use crate::output;
use crate::twitter::TwitterClient;

/// Fetch the most recent tweets from a user's timeline and save them
///
/// # Arguments
/// * `client` - Authenticated Twitter API client
/// * `username` - Twitter username (with or without @ symbol)
/// * `output_dir` - Directory the timestamped JSON file is written to
/// * `clock` - Source of the timestamp embedded in the filename
/// * `out` - Destination for the status lines, the sorted document and the save message
pub async fn execute<W: Write>(
    client: &TwitterClient,
    username: &str,
    output_dir: &Path,
    clock: &dyn Clock,
    out: &mut W,
) -> Result<PathBuf> {
    // Clean username (remove @ if present)
    let username = username.trim_start_matches('@');

    info!("Fetching recent tweets for user @{username}");

    let user_id = client
        .resolve_user_id(username, &mut *out)
        .await
        .with_context(|| format!("Failed to look up user @{username}"))?;

    debug!("Fetching timeline for user ID {user_id}");

    let document = client
        .get_user_tweets(&user_id, &mut *out)
        .await
        .with_context(|| format!("Failed to fetch tweets for user @{username}"))?;

    let result_count = document
        .pointer("/meta/result_count")
        .and_then(|count| count.as_u64())
        .unwrap_or(0);
    info!("Found {result_count} tweets from @{username}");

    output::print_sorted(&document, out)?;

    let saved_path = output::save_output(&document, output_dir, clock)
        .with_context(|| format!("Failed to save tweets for user @{username}"))?;

    let filename = saved_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| saved_path.display().to_string());
    writeln!(out, "Saved output to {filename}").context("Failed to write to output")?;

    Ok(saved_path)
}
