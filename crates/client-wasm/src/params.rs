use std::time::Duration;

use log::warn;
use rtrack_core::config::PollerConfig;
use web_sys::{UrlSearchParams, window};

/// Poller config from the page url, e.g. `?endpoint=/ble-data&interval=5000&mode=current`
pub fn config_from_location() -> PollerConfig {
    let params = window()
        .and_then(|w| w.location().search().ok())
        .and_then(|search| UrlSearchParams::new_with_str(&search).ok());

    match params {
        Some(params) => config_from_query(|key| params.get(key)),
        None => PollerConfig::default(),
    }
}

pub fn config_from_query(get: impl Fn(&str) -> Option<String>) -> PollerConfig {
    let mut config = PollerConfig::default();

    if let Some(endpoint) = get("endpoint") {
        config = config.with_endpoint(endpoint);
    }
    if let Some(interval) = get("interval") {
        match interval.parse::<u64>() {
            Ok(ms) if ms > 0 => config = config.with_interval(Duration::from_millis(ms)),
            _ => warn!("Ignoring interval '{interval}'"),
        }
    }
    if let Some(delay) = get("delay") {
        match delay.parse::<u64>() {
            Ok(ms) => config = config.with_initial_delay(Duration::from_millis(ms)),
            Err(_) => warn!("Ignoring delay '{delay}'"),
        }
    }
    if let Some(container) = get("container") {
        config = config.with_container(container);
    }
    if let Some(mode) = get("mode") {
        match mode.parse() {
            Ok(mode) => config = config.with_mode(mode),
            Err(e) => warn!("{e}"),
        }
    }
    config
}
