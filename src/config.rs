// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door configuration.
//!
//! A door is described once at startup, usually from a JSON file:
//!
//! ```
//! use relay_garage::config::{DoorConfig, PositionSource};
//!
//! let config = DoorConfig::from_json_str(r#"{
//!     "name": "Garage",
//!     "trigger": { "host": "192.168.0.91", "secret": "sec", "channel": "4" },
//!     "open_switch": { "host": "192.168.0.91", "secret": "sec", "channel": "5" },
//!     "closed_switch": { "host": "192.168.0.91", "secret": "sec", "channel": "6" },
//!     "delay_after_command_ms": 4000
//! }"#).unwrap();
//!
//! assert!(matches!(config.position_source(), Ok(PositionSource::Switches { .. })));
//! ```
//!
//! Which estimator the door uses follows from what is configured: both limit
//! switches select switch-based inference, no switches plus a travel
//! duration selects dead reckoning. Anything else is rejected.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::protocol::RelayEndpoint;
use crate::types::{Channel, TargetPosition};

/// Connection details for one relay output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Hostname or IP address of the relay board.
    pub host: String,
    /// Shared secret embedded in request paths.
    pub secret: String,
    /// Output identifier on the board.
    pub channel: Channel,
}

impl RelayConfig {
    /// Creates a relay configuration.
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
        }
    }

    /// Builds the endpoint for this output.
    #[must_use]
    pub fn endpoint(&self, timeout: Duration) -> RelayEndpoint {
        RelayEndpoint::new(&self.host, &self.secret, self.channel.clone()).with_timeout(timeout)
    }
}

/// Full description of a door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorConfig {
    /// Display name, used in logs.
    #[serde(default = "default_name")]
    pub name: String,
    /// Relay output wired to the opener's push button.
    pub trigger: RelayConfig,
    /// Limit switch active when the door is fully open.
    #[serde(default)]
    pub open_switch: Option<RelayConfig>,
    /// Limit switch active when the door is fully closed.
    #[serde(default)]
    pub closed_switch: Option<RelayConfig>,
    /// Interval between refreshes.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// How long switch readings are ignored after a command.
    #[serde(default = "default_delay_after_command_ms")]
    pub delay_after_command_ms: u64,
    /// Time for a full traverse; only used without limit switches.
    #[serde(default)]
    pub travel_duration_ms: Option<u64>,
    /// Timeout applied to every relay request.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Where the door is assumed to be before anything has been observed.
    #[serde(default = "default_initial_position")]
    pub initial_position: TargetPosition,
}

fn default_name() -> String {
    DoorConfig::DEFAULT_NAME.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DoorConfig::DEFAULT_POLL_INTERVAL_MS
}

fn default_delay_after_command_ms() -> u64 {
    DoorConfig::DEFAULT_DELAY_AFTER_COMMAND_MS
}

fn default_request_timeout_ms() -> u64 {
    DoorConfig::DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_initial_position() -> TargetPosition {
    TargetPosition::Open
}

/// How the door position will be inferred, as selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource<'a> {
    /// Read both limit switches.
    Switches {
        /// Switch active when fully open.
        open: &'a RelayConfig,
        /// Switch active when fully closed.
        closed: &'a RelayConfig,
        /// Debounce window after each command.
        delay_after_command: Duration,
    },
    /// Dead-reckon from the last command.
    Timer {
        /// Time for a full traverse.
        travel_duration: Duration,
    },
}

impl DoorConfig {
    /// Default display name.
    pub const DEFAULT_NAME: &'static str = "Garage Door";
    /// Default poll interval.
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
    /// Default debounce window.
    pub const DEFAULT_DELAY_AFTER_COMMAND_MS: u64 = 5000;
    /// Default relay request timeout.
    pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

    /// Creates a configuration with only a trigger relay.
    ///
    /// On its own this is not a usable door; add switches with
    /// [`with_switches`](Self::with_switches) or a travel time with
    /// [`with_travel_duration`](Self::with_travel_duration).
    #[must_use]
    pub fn new(trigger: RelayConfig) -> Self {
        Self {
            name: default_name(),
            trigger,
            open_switch: None,
            closed_switch: None,
            poll_interval_ms: Self::DEFAULT_POLL_INTERVAL_MS,
            delay_after_command_ms: Self::DEFAULT_DELAY_AFTER_COMMAND_MS,
            travel_duration_ms: None,
            request_timeout_ms: Self::DEFAULT_REQUEST_TIMEOUT_MS,
            initial_position: default_initial_position(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets both limit switches.
    #[must_use]
    pub fn with_switches(mut self, open: RelayConfig, closed: RelayConfig) -> Self {
        self.open_switch = Some(open);
        self.closed_switch = Some(closed);
        self
    }

    /// Sets the travel duration for dead reckoning.
    #[must_use]
    pub fn with_travel_duration(mut self, travel: Duration) -> Self {
        self.travel_duration_ms = Some(duration_ms(travel));
        self
    }

    /// Sets the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = duration_ms(interval);
        self
    }

    /// Sets the debounce window.
    #[must_use]
    pub fn with_delay_after_command(mut self, delay: Duration) -> Self {
        self.delay_after_command_ms = duration_ms(delay);
        self
    }

    /// Sets the assumed starting position.
    #[must_use]
    pub fn with_initial_position(mut self, position: TargetPosition) -> Self {
        self.initial_position = position;
        self
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if the text is not a valid door description.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Json` if it cannot be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Returns the poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Returns the debounce window.
    #[must_use]
    pub fn delay_after_command(&self) -> Duration {
        Duration::from_millis(self.delay_after_command_ms)
    }

    /// Returns the relay request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validates the configuration and selects the position source.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidInterval` if the poll interval, request timeout
    ///   or travel duration is zero
    /// - `ConfigError::IncompleteSwitches` if only one switch is configured
    /// - `ConfigError::NoPositionSource` if there are no switches and no
    ///   travel duration
    pub fn position_source(&self) -> Result<PositionSource<'_>, ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval {
                field: "poll_interval_ms",
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidInterval {
                field: "request_timeout_ms",
            });
        }

        match (&self.open_switch, &self.closed_switch, self.travel_duration_ms) {
            (Some(open), Some(closed), _) => Ok(PositionSource::Switches {
                open,
                closed,
                delay_after_command: self.delay_after_command(),
            }),
            (Some(_), None, _) => Err(ConfigError::IncompleteSwitches {
                missing: "closed_switch",
            }),
            (None, Some(_), _) => Err(ConfigError::IncompleteSwitches {
                missing: "open_switch",
            }),
            (None, None, Some(0)) => Err(ConfigError::InvalidInterval {
                field: "travel_duration_ms",
            }),
            (None, None, Some(ms)) => Ok(PositionSource::Timer {
                travel_duration: Duration::from_millis(ms),
            }),
            (None, None, None) => Err(ConfigError::NoPositionSource),
        }
    }
}

/// Durations beyond `u64::MAX` milliseconds saturate.
fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay(channel: &str) -> RelayConfig {
        RelayConfig::new("192.168.0.91", "sec", channel)
    }

    #[test]
    fn defaults_from_minimal_json() {
        let config = DoorConfig::from_json_str(
            r#"{
                "trigger": { "host": "192.168.0.91", "secret": "sec", "channel": "4" },
                "travel_duration_ms": 15000
            }"#,
        )
        .unwrap();

        assert_eq!(config.name, "Garage Door");
        assert_eq!(config.trigger, relay("4"));
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.delay_after_command(), Duration::from_secs(5));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.initial_position, TargetPosition::Open);
        assert_eq!(
            config.position_source().unwrap(),
            PositionSource::Timer {
                travel_duration: Duration::from_secs(15)
            }
        );
    }

    #[test]
    fn switches_take_precedence_over_travel_duration() {
        let config = DoorConfig::new(relay("4"))
            .with_switches(relay("5"), relay("6"))
            .with_travel_duration(Duration::from_secs(15))
            .with_delay_after_command(Duration::from_secs(3));

        match config.position_source().unwrap() {
            PositionSource::Switches {
                open,
                closed,
                delay_after_command,
            } => {
                assert_eq!(open.channel.as_str(), "5");
                assert_eq!(closed.channel.as_str(), "6");
                assert_eq!(delay_after_command, Duration::from_secs(3));
            }
            PositionSource::Timer { .. } => panic!("expected switches"),
        }
    }

    #[test]
    fn no_position_source_is_rejected() {
        let config = DoorConfig::new(relay("4"));
        assert!(matches!(
            config.position_source(),
            Err(ConfigError::NoPositionSource)
        ));
    }

    #[test]
    fn single_switch_is_rejected() {
        let mut config = DoorConfig::new(relay("4"));
        config.open_switch = Some(relay("5"));
        assert!(matches!(
            config.position_source(),
            Err(ConfigError::IncompleteSwitches {
                missing: "closed_switch"
            })
        ));

        let mut config = DoorConfig::new(relay("4"));
        config.closed_switch = Some(relay("6"));
        assert!(matches!(
            config.position_source(),
            Err(ConfigError::IncompleteSwitches {
                missing: "open_switch"
            })
        ));
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let config = DoorConfig::new(relay("4"))
            .with_travel_duration(Duration::from_secs(10))
            .with_poll_interval(Duration::ZERO);
        assert!(matches!(
            config.position_source(),
            Err(ConfigError::InvalidInterval {
                field: "poll_interval_ms"
            })
        ));

        let config = DoorConfig::new(relay("4")).with_travel_duration(Duration::ZERO);
        assert!(matches!(
            config.position_source(),
            Err(ConfigError::InvalidInterval {
                field: "travel_duration_ms"
            })
        ));
    }

    #[test]
    fn initial_position_from_json() {
        let config = DoorConfig::from_json_str(
            r#"{
                "trigger": { "host": "h", "secret": "s", "channel": "1" },
                "travel_duration_ms": 1000,
                "initial_position": "closed"
            }"#,
        )
        .unwrap();
        assert_eq!(config.initial_position, TargetPosition::Closed);
    }

    #[test]
    fn invalid_json_is_reported() {
        let result = DoorConfig::from_json_str(r#"{ "trigger": 4 }"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn missing_file_is_reported() {
        let result = DoorConfig::from_file("/nonexistent/relay-garage.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn relay_endpoint_uses_timeout() {
        let endpoint = relay("4").endpoint(Duration::from_secs(3));
        assert_eq!(endpoint.timeout(), Duration::from_secs(3));
        assert_eq!(endpoint.status_url(), "http://192.168.0.91/sec/?pt=4&cmd=get");
    }

    #[test]
    fn round_trips_through_json() {
        let config = DoorConfig::new(relay("4"))
            .with_name("Barn")
            .with_switches(relay("5"), relay("6"));
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(DoorConfig::from_json_str(&json).unwrap(), config);
    }
}
