//! Background timer driving the poll cycles.
//!
//! Every tick starts its own fetch thread, so a slow request never delays
//! the next tick. Results are sent back in completion order, which is not
//! necessarily tick order.

use std::{
    sync::{
        Arc,
        mpsc::{Receiver, RecvTimeoutError, Sender, channel},
    },
    thread::spawn,
    time::Duration,
};

use log::{debug, trace};
use rtrack_client::Fetch;
use rtrack_core::error::PollError;

/// Body (or failure) of the fetch started at `tick`
#[derive(Debug)]
pub struct Fetched {
    pub tick: u64,
    pub result: Result<String, PollError>,
}

pub struct Ticker {
    url: String,
    interval: Duration,
    initial_delay: Duration,
    fetcher: Arc<dyn Fetch>,
}

/// Stops the ticker when stopped or dropped. In-flight fetches still complete.
pub struct TickerHandle {
    stop: Sender<()>,
}

impl TickerHandle {
    pub fn stop(self) {
        let _ = self.stop.send(());
    }
}

impl Ticker {
    pub fn new(
        url: impl Into<String>,
        interval: Duration,
        initial_delay: Duration,
        fetcher: Arc<dyn Fetch>,
    ) -> Self {
        Self {
            url: url.into(),
            interval,
            initial_delay,
            fetcher,
        }
    }

    pub fn run(self) -> (TickerHandle, Receiver<Fetched>) {
        let (stop_tx, stop_rx) = channel::<()>();
        let (fetched_tx, fetched_rx) = channel::<Fetched>();

        spawn(move || {
            let mut wait = self.initial_delay;
            let mut tick = 0;
            loop {
                match stop_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }

                tick += 1;
                trace!("Tick {tick}");
                let fetcher = self.fetcher.clone();
                let url = self.url.clone();
                let sender = fetched_tx.clone();
                spawn(move || {
                    let result = fetcher.fetch(&url);
                    let _ = sender.send(Fetched { tick, result });
                });
                wait = self.interval;
            }
            debug!("Ticker stopped after {tick} ticks");
        });

        (TickerHandle { stop: stop_tx }, fetched_rx)
    }
}
