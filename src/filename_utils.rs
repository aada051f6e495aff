use crate::datetime_utils::format_for_filename;
use chrono::NaiveDateTime;

/// Generate a filename for a saved user tweets document
/// Format: user_tweets_output_YYYYMMDD_HHMMSS.json
pub fn tweets_output_filename(now: &NaiveDateTime) -> String {
    let timestamp = format_for_filename(now);
    format!("user_tweets_output_{timestamp}.json")
}
