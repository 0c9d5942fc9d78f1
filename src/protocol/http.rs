// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP relay implementation.

use std::time::Duration;

use reqwest::Client;

use crate::error::ProtocolError;
use crate::protocol::{Relay, RelayResponse};
use crate::types::Channel;

// ============================================================================
// RelayEndpoint - Address of one relay output
// ============================================================================

/// Address of a single relay output.
///
/// The endpoint is immutable once built into an [`HttpRelay`]. Each request
/// is independent; there is no session with the relay board.
///
/// # Examples
///
/// ```
/// use relay_garage::protocol::RelayEndpoint;
/// use std::time::Duration;
///
/// let endpoint = RelayEndpoint::new("192.168.0.91", "sec", "4")
///     .with_timeout(Duration::from_secs(3));
///
/// assert_eq!(endpoint.command_url(1), "http://192.168.0.91/sec/?cmd=4:1");
/// assert_eq!(endpoint.status_url(), "http://192.168.0.91/sec/?pt=4&cmd=get");
/// ```
#[derive(Debug, Clone)]
pub struct RelayEndpoint {
    host: String,
    secret: String,
    channel: Channel,
    timeout: Duration,
}

impl RelayEndpoint {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates an endpoint for `channel` on the relay board at `host`.
    ///
    /// # Arguments
    ///
    /// * `host` - Hostname or IP address, optionally with port and scheme
    /// * `secret` - Shared secret embedded in the request path
    /// * `channel` - Output identifier on the board
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        secret: impl Into<String>,
        channel: impl Into<Channel>,
    ) -> Self {
        Self {
            host: host.into(),
            secret: secret.into(),
            channel: channel.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the output identifier.
    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL, including the secret path segment.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.base_url_with(&urlencoding::encode(&self.secret))
    }

    fn base_url_with(&self, secret: &str) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}/{secret}/")
        } else {
            format!("http://{host}/{secret}/")
        }
    }

    /// Builds the URL that sends `code` to this output.
    #[must_use]
    pub fn command_url(&self, code: u32) -> String {
        format!(
            "{}?cmd={}:{code}",
            self.base_url(),
            urlencoding::encode(self.channel.as_str())
        )
    }

    /// Builds the URL that reads the state of this output.
    #[must_use]
    pub fn status_url(&self) -> String {
        format!(
            "{}?pt={}&cmd=get",
            self.base_url(),
            urlencoding::encode(self.channel.as_str())
        )
    }

    /// Masks the secret path segment of `url` so it can be logged.
    fn redact(&self, url: &str) -> String {
        match url.strip_prefix(&self.base_url()) {
            Some(query) => format!("{}{query}", self.base_url_with("***")),
            None => url.to_string(),
        }
    }

    /// Creates an [`HttpRelay`] from this endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpRelay, ProtocolError> {
        HttpRelay::new(self)
    }
}

// ============================================================================
// HttpRelay - reqwest-backed relay client
// ============================================================================

/// HTTP client for one relay output.
///
/// # Examples
///
/// ```no_run
/// use relay_garage::protocol::{HttpRelay, Relay, RelayEndpoint, TRIGGER_CODE};
///
/// # async fn example() -> relay_garage::Result<()> {
/// let relay = HttpRelay::new(RelayEndpoint::new("192.168.0.91", "sec", "4"))?;
/// relay.send_command(TRIGGER_CODE).await?;
/// let on = relay.is_power_on().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpRelay {
    endpoint: RelayEndpoint,
    client: Client,
}

impl HttpRelay {
    /// Creates a client for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be created.
    pub fn new(endpoint: RelayEndpoint) -> Result<Self, ProtocolError> {
        if endpoint.host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }

        let client = Client::builder()
            .timeout(endpoint.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self { endpoint, client })
    }

    /// Returns the endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &RelayEndpoint {
        &self.endpoint
    }

    async fn get(&self, url: String) -> Result<RelayResponse, ProtocolError> {
        tracing::debug!(url = %self.endpoint.redact(&url), "Sending relay request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        if !response.status().is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {} - {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(channel = %self.endpoint.channel, body = %body, "Received relay response");

        Ok(RelayResponse::new(body))
    }
}

impl Relay for HttpRelay {
    fn channel(&self) -> &Channel {
        &self.endpoint.channel
    }

    async fn send_command(&self, code: u32) -> Result<RelayResponse, ProtocolError> {
        self.get(self.endpoint.command_url(code)).await
    }

    async fn query_state(&self) -> Result<RelayResponse, ProtocolError> {
        self.get(self.endpoint.status_url()).await
    }
}
