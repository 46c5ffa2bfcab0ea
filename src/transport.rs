use anyhow::Result;
use reqwest::{header, StatusCode};

use crate::error::InstallError;

/// Outcome of one conditional fetch.
#[derive(Debug)]
pub enum RemoteResponse {
    /// The full body, with the server-reported Last-Modified if any
    Payload {
        /// The response body
        body:          Vec<u8>,
        /// The Last-Modified header, verbatim
        last_modified: Option<String>,
    },
    /// The precondition held; the remote copy is unchanged
    NotModified,
}

/// Blocking fetch of remote files, swappable so tests can serve a
/// synthetic repository without a network.
pub trait Transport {
    /// Fetch `url`, optionally preconditioned on an If-Modified-Since
    /// date. Any status other than success or 304 is a
    /// [`InstallError::Network`] failure.
    fn get(&self, url: &str, if_modified_since: Option<&str>) -> Result<RemoteResponse>;
}

/// The real transport, backed by a blocking reqwest client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Create a transport with the crate's user agent.
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .user_agent("debstow")
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());

        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, if_modified_since: Option<&str>) -> Result<RemoteResponse> {
        let mut request = self.client.get(url);
        if let Some(stamp) = if_modified_since {
            request = request.header(header::IF_MODIFIED_SINCE, stamp);
        }
        let response = request.send()?;

        if response.status() == StatusCode::NOT_MODIFIED {
            return Ok(RemoteResponse::NotModified);
        }
        if !response.status().is_success() {
            return Err(InstallError::Network {
                url:    url.to_string(),
                status: response.status().as_u16(),
            }
            .into());
        }

        let last_modified = response
            .headers()
            .get(header::LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        Ok(RemoteResponse::Payload {
            body: response.bytes()?.to_vec(),
            last_modified,
        })
    }
}
