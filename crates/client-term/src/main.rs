use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::info;
use rtrack_client::{Fetch, MemoryMap, Poller};

use crate::{
    app::MapApp, cli::Args, crossterm_adapter::CrosstermAdapter, demo::SimulatedFeed,
    http::HttpFetcher, ticker::Ticker,
};

mod app;
mod cli;
mod crossterm_adapter;
mod demo;
mod http;
mod map_view;
mod ticker;

fn main() -> Result<()> {
    let args = Args::parse();

    tui_logger::init_logger(args.log_level)?;
    tui_logger::set_default_level(args.log_level);

    let config = args.poller_config();
    let fetcher: Arc<dyn Fetch> = if args.demo {
        info!("Running with a simulated device");
        Arc::new(SimulatedFeed::new(rand::random()))
    } else {
        Arc::new(HttpFetcher::new(args.timeout())?)
    };

    info!(
        "Polling {} every {:?}, first poll in {:?}",
        config.endpoint_url, config.poll_interval, config.initial_delay
    );

    let ticker = Ticker::new(
        config.endpoint_url.as_str(),
        config.poll_interval,
        config.initial_delay,
        fetcher,
    );
    let (ticker_handle, results) = ticker.run();

    let poller = Poller::new(config.clone(), MemoryMap::with_container(&config.container_id));
    let app = MapApp::new(poller, results);

    CrosstermAdapter::new(app).run();
    ticker_handle.stop();
    Ok(())
}
