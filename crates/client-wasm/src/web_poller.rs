use std::{cell::RefCell, rc::Rc, time::Duration};

use gloo_timers::callback::{Interval, Timeout};
use log::debug;
use rtrack_client::Poller;
use wasm_bindgen_futures::spawn_local;

use crate::{dom::DomMap, fetch::fetch_body};

/// Drives a poller from browser timers.
///
/// Every tick starts its own fetch. Fetches that overlap resolve
/// independently and render in completion order; a render always runs to
/// completion before the next one starts.
#[derive(Clone)]
pub struct WebPoller {
    poller: Rc<RefCell<Poller<DomMap>>>,
    delay: Rc<RefCell<Option<Timeout>>>,
    timer: Rc<RefCell<Option<Interval>>>,
}

impl WebPoller {
    pub fn new(poller: Poller<DomMap>) -> Self {
        WebPoller {
            poller: Rc::new(RefCell::new(poller)),
            delay: Rc::new(RefCell::new(None)),
            timer: Rc::new(RefCell::new(None)),
        }
    }

    /// Starts polling for as long as the page lives.
    pub fn start(&self) {
        let (interval, initial_delay) = {
            let poller = self.poller.borrow();
            let config = poller.config();
            (config.poll_interval, config.initial_delay)
        };

        if initial_delay == interval {
            self.start_interval(interval);
            return;
        }

        let web = self.clone();
        let timeout = Timeout::new(millis(initial_delay), move || {
            web.tick();
            web.start_interval(interval);
        });
        *self.delay.borrow_mut() = Some(timeout);
    }

    fn start_interval(&self, interval: Duration) {
        let web = self.clone();
        let timer = Interval::new(millis(interval), move || web.tick());
        *self.timer.borrow_mut() = Some(timer);
    }

    fn tick(&self) {
        let url = self.poller.borrow().config().endpoint_url.clone();
        debug!("Polling {url}");
        let poller = self.poller.clone();
        spawn_local(async move {
            let body = fetch_body(&url).await;
            // Failures are handed to the poller's error callback
            let _ = poller.borrow_mut().complete(body);
        });
    }
}

/// Browser timers take a signed 32-bit delay; anything above fires at once.
const MAX_TIMER_MS: u32 = i32::MAX as u32;

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis())
        .unwrap_or(u32::MAX)
        .min(MAX_TIMER_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_fits_browser_timers() {
        assert_eq!(millis(Duration::from_millis(10_000)), 10_000);
        assert_eq!(millis(Duration::from_millis(3_000_000_000)), MAX_TIMER_MS);
        assert_eq!(millis(Duration::from_secs(u64::MAX)), MAX_TIMER_MS);
        assert!(i32::try_from(millis(Duration::from_millis(u64::MAX))).is_ok());
    }
}
