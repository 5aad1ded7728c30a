//! Resolution of the API base URL.

use anyhow::{Context, Result, bail};
use url::Url;

/// Environment variable overriding the API base URL
pub const ENV_API_URL: &str = "FICHAJE_API_URL";

/// Base URL used when no override is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Read the base URL from the environment, falling back to the default
pub fn api_url_from_env() -> Result<String> {
    let raw = std::env::var(ENV_API_URL).unwrap_or_default();
    normalize_api_url(&raw)
}

/// Validate a base URL and strip any trailing slash.
///
/// Blank input selects the default. Only http and https are accepted.
pub fn normalize_api_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let raw = if raw.is_empty() { DEFAULT_API_URL } else { raw };

    let parsed = Url::parse(raw)
        .with_context(|| format!("Invalid API base URL: {raw}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("Unsupported API URL scheme: {}", parsed.scheme());
    }

    Ok(raw.trim_end_matches('/').to_string())
}
