//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs and making requests.

use gloo_net::http::Request;
use serde::de::DeserializeOwned;

use super::fetch::LoadError;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a base and a path
///
/// # Example
/// ```rust,ignore
/// let url = api_url(&config.api_base, "/api/v2/topic/17/formatted");
/// ```
pub fn api_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// GET `url` and decode the JSON body
pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, LoadError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| LoadError::other(format!("Failed to fetch: {}", e)))?;

    if !response.ok() {
        let status = response.status();
        let message = match status {
            404 => "Record not found".to_string(),
            _ => format!("Server error: {}", status),
        };
        return Err(LoadError::http(status, message));
    }

    let text = response
        .text()
        .await
        .map_err(|e| LoadError::other(format!("Failed to read response: {}", e)))?;

    serde_json::from_str(&text).map_err(|e| LoadError::other(format!("Failed to parse: {}", e)))
}
