use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::io::Write;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Twitter API errors, each HTTP failure keeping the status code and raw body
#[derive(Debug, Error)]
pub enum TwitterError {
    #[error("Authentication failed (status {status}): {body}")]
    Auth { status: u16, body: String },

    #[error("Rate limit exceeded (status {status}): {body}")]
    RateLimited { status: u16, body: String },

    #[error("Server error (status {status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("Request returned an error: {status} {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String, body: String },

    #[error("Failed to send request to Twitter API")]
    Http(#[from] reqwest::Error),

    #[error("Failed to write response status")]
    Io(#[from] std::io::Error),
}

impl TwitterError {
    /// Classifies a non-200 response
    fn from_status(status: StatusCode, body: String) -> Self {
        let code = status.as_u16();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                TwitterError::Auth { status: code, body }
            }
            StatusCode::TOO_MANY_REQUESTS => TwitterError::RateLimited { status: code, body },
            s if s.is_server_error() => TwitterError::ServerError { status: code, body },
            _ => TwitterError::RequestFailed { status: code, body },
        }
    }

    /// HTTP status code carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            TwitterError::Auth { status, .. }
            | TwitterError::RateLimited { status, .. }
            | TwitterError::ServerError { status, .. }
            | TwitterError::RequestFailed { status, .. } => Some(*status),
            TwitterError::MalformedResponse { .. } | TwitterError::Io(_) => None,
            TwitterError::Http(err) => err.status().map(|s| s.as_u16()),
        }
    }

    /// Raw response body carried by the error, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            TwitterError::Auth { body, .. }
            | TwitterError::RateLimited { body, .. }
            | TwitterError::ServerError { body, .. }
            | TwitterError::RequestFailed { body, .. }
            | TwitterError::MalformedResponse { body, .. } => Some(body),
            TwitterError::Http(_) | TwitterError::Io(_) => None,
        }
    }
}

pub const TWITTER_API_BASE: &str = "https://api.twitter.com/2";

/// Identifies this client to the API
pub const USER_AGENT: &str = "v2UserTweetsRust";

// URL parameters for the two requests
const USER_LOOKUP_TWEET_FIELDS: &str = "created_at";
const USER_TWEETS_TWEET_FIELDS: &str = "created_at,public_metrics,entities,geo";
const USER_TWEETS_MAX_RESULTS: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct UserLookupResponse {
    pub data: UserLookupData,
}

#[derive(Debug, Deserialize)]
pub struct UserLookupData {
    pub id: String,
}

/// Twitter API v2 client authenticated with an app bearer token
pub struct TwitterClient {
    client: Client,
    bearer_token: String,
    api_base: Url,
}

impl TwitterClient {
    /// Creates a client against the given API base, e.g. `https://api.twitter.com/2`
    pub fn new(bearer_token: &str, api_base: &str) -> Result<Self> {
        let base = Url::parse(api_base)
            .with_context(|| format!("Invalid Twitter API base URL: {api_base}"))?;
        if base.cannot_be_a_base() {
            bail!("Twitter API base URL cannot have path segments: {api_base}");
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        debug!("Using Twitter API at {base}");

        Ok(Self {
            client,
            bearer_token: bearer_token.to_string(),
            api_base: base,
        })
    }

    /// Builds `<base>/<segment>/...`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issues an authenticated GET and returns the parsed JSON body of a 200 response.
    ///
    /// The status code is written to `out` before it is checked.
    pub async fn get_json<P, W>(
        &self,
        segments: &[&str],
        params: &P,
        out: &mut W,
    ) -> std::result::Result<Value, TwitterError>
    where
        P: serde::Serialize + ?Sized,
        W: Write,
    {
        let url = self.endpoint(segments);
        debug!(%url, "Making request to Twitter API");

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.bearer_token)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        writeln!(out, "{code}", code = status.as_u16())?;

        let body = response.text().await?;

        if status != StatusCode::OK {
            debug!("Twitter API returned {status} for {url}");
            return Err(TwitterError::from_status(status, body));
        }

        serde_json::from_str(&body).map_err(|e| TwitterError::MalformedResponse {
            message: format!("response body is not valid JSON: {e}"),
            body,
        })
    }

    /// Looks up a user by username (without the @ symbol) and returns their user ID
    pub async fn resolve_user_id<W: Write>(
        &self,
        username: &str,
        out: &mut W,
    ) -> std::result::Result<String, TwitterError> {
        let response = self
            .get_json(
                &["users", "by", "username", username],
                &[("tweet.fields", USER_LOOKUP_TWEET_FIELDS)],
                out,
            )
            .await?;

        let body = response.to_string();
        let lookup: UserLookupResponse =
            serde_json::from_value(response).map_err(|e| TwitterError::MalformedResponse {
                message: format!("user lookup response has no data.id: {e}"),
                body,
            })?;

        debug!("Resolved @{username} to user ID {id}", id = lookup.data.id);

        Ok(lookup.data.id)
    }

    /// Fetches a single page of the user's most recent tweets.
    ///
    /// The response document is returned as-is; `meta.next_token` is not followed.
    pub async fn get_user_tweets<W: Write>(
        &self,
        user_id: &str,
        out: &mut W,
    ) -> std::result::Result<Value, TwitterError> {
        let max_results = USER_TWEETS_MAX_RESULTS.to_string();

        self.get_json(
            &["users", user_id, "tweets"],
            &[
                ("tweet.fields", USER_TWEETS_TWEET_FIELDS),
                ("max_results", max_results.as_str()),
            ],
            out,
        )
        .await
    }
}
