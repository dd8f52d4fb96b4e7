use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use rtrack_core::{
    config::{
        DEFAULT_CONTAINER, DEFAULT_ENDPOINT, DEFAULT_POLL_INTERVAL_MS, PollerConfig, RenderMode,
    },
    types::PIXELS_PER_UNIT,
};

#[derive(Parser, Debug)]
#[command(
    name = "rtrack",
    about = "Polls a position feed and draws the device on a room map"
)]
pub struct Args {
    /// Url of the position feed
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Time between two polls
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub interval_ms: u64,

    /// Time before the first poll, defaults to the interval
    #[arg(long)]
    pub initial_delay_ms: Option<u64>,

    #[arg(long, default_value = DEFAULT_CONTAINER)]
    pub container: String,

    /// Pixels per grid unit
    #[arg(long, default_value_t = PIXELS_PER_UNIT)]
    pub scale: f64,

    /// trail keeps every position, current only shows the latest one
    #[arg(long, default_value_t = RenderMode::Trail)]
    pub mode: RenderMode,

    /// Request timeout. Requests never time out when unset
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Use a simulated device instead of the endpoint
    #[arg(long)]
    pub demo: bool,

    #[arg(long, default_value_t = LevelFilter::Debug)]
    pub log_level: LevelFilter,
}

impl Args {
    pub fn poller_config(&self) -> PollerConfig {
        let mut config = PollerConfig::default()
            .with_endpoint(self.endpoint.as_str())
            .with_interval(Duration::from_millis(self.interval_ms))
            .with_container(self.container.as_str())
            .with_scale(self.scale)
            .with_mode(self.mode);

        if let Some(delay) = self.initial_delay_ms {
            config = config.with_initial_delay(Duration::from_millis(delay));
        }
        config
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
