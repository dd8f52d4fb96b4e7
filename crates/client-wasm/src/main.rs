use anyhow::Result;
use log::{Level, error, info};
use rtrack_client::Poller;

use crate::{dom::DomMap, params::config_from_location, web_poller::WebPoller};

mod dom;
mod fetch;
mod params;
mod web_poller;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(Level::Debug) {
        web_sys::console::error_1(&format!("Could not init logs: {e}").into());
    }

    if let Err(e) = run() {
        error!("Could not start the poller: {e}");
    }
}

fn run() -> Result<()> {
    let config = config_from_location();
    info!(
        "Polling {} every {:?} into #{}",
        config.endpoint_url, config.poll_interval, config.container_id
    );

    let map = DomMap::new(&config.marker_class)?;
    let poller = Poller::new(config, map);
    WebPoller::new(poller).start();
    Ok(())
}
