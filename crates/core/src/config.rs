use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::types::{DEFAULT_DEVICE, MARKER_CLASS, PIXELS_PER_UNIT};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/ble-data";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_CONTAINER: &str = "map";

/// How successive positions show up on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Every successful poll appends a new marker, leaving a trail
    #[default]
    Trail,
    /// One marker per device, moved on every poll
    Current,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trail" => Ok(RenderMode::Trail),
            "current" => Ok(RenderMode::Current),
            other => Err(format!("Unknown render mode '{other}', expected trail or current")),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Trail => f.write_str("trail"),
            RenderMode::Current => f.write_str("current"),
        }
    }
}

/**
* Everything a poller needs to know, handed over at construction.
* Two pollers with two configs are fully independent.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct PollerConfig {
    pub endpoint_url: String,
    pub poll_interval: Duration,
    /// Delay before the first poll
    pub initial_delay: Duration,
    /// Id of the element holding the markers
    pub container_id: String,
    /// Pixels per grid unit
    pub scale: f64,
    pub marker_class: String,
    /// Device used for payloads without a `device_id`
    pub default_device: String,
    pub mode: RenderMode,
}

impl Default for PollerConfig {
    fn default() -> Self {
        let interval = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);
        Self {
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
            poll_interval: interval,
            initial_delay: interval,
            container_id: DEFAULT_CONTAINER.to_string(),
            scale: PIXELS_PER_UNIT,
            marker_class: MARKER_CLASS.to_string(),
            default_device: DEFAULT_DEVICE.to_string(),
            mode: RenderMode::Trail,
        }
    }
}

impl PollerConfig {
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = url.into();
        self
    }

    /// Sets the interval. The first poll still waits one full interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self.initial_delay = interval;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_container(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = container_id.into();
        self
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}
