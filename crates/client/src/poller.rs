//! The fetch-then-render cycle.
//!
//! A cycle either places exactly one marker and returns the decoded report,
//! or places nothing and returns why. Failures also go to the error
//! callback, which by default logs them.

use log::{debug, warn};
use rtrack_core::{
    config::PollerConfig,
    error::PollError,
    network::decode_report,
    types::{Marker, PositionReport},
};

use crate::{
    layer::{MapSurface, MarkerLayer},
    stats::PollStats,
};

pub type ErrorCallback = Box<dyn Fn(&PollError)>;

/// Blocking GET of the feed. Returns the body whatever the status code.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, PollError>;
}

impl<F> Fetch for F
where
    F: Fn(&str) -> Result<String, PollError> + Send + Sync,
{
    fn fetch(&self, url: &str) -> Result<String, PollError> {
        self(url)
    }
}

pub struct Poller<S: MapSurface> {
    config: PollerConfig,
    layer: MarkerLayer<S>,
    on_error: ErrorCallback,
    stats: PollStats,
}

impl<S: MapSurface> Poller<S> {
    pub fn new(config: PollerConfig, surface: S) -> Self {
        let layer = MarkerLayer::new(&config, surface);
        Self {
            config,
            layer,
            on_error: Box::new(|e: &PollError| {
                if e.is_network() {
                    warn!("Feed unreachable: {e}");
                } else {
                    warn!("Poll cycle failed: {e}");
                }
            }),
            stats: PollStats::default(),
        }
    }

    pub fn set_on_error(&mut self, callback: ErrorCallback) {
        self.on_error = callback;
    }

    /// Runs a whole cycle with a blocking fetcher.
    pub fn poll_once<F: Fetch + ?Sized>(
        &mut self,
        fetcher: &F,
    ) -> Result<PositionReport, PollError> {
        let body = fetcher.fetch(&self.config.endpoint_url);
        self.complete(body)
    }

    /// Second half of a cycle, for platforms that fetch on their own.
    pub fn complete(
        &mut self,
        body: Result<String, PollError>,
    ) -> Result<PositionReport, PollError> {
        let result = body
            .and_then(|body| decode_report(&body))
            .and_then(|report| self.update_position(&report).map(|_| report));

        match &result {
            Ok(report) => {
                debug!("Placed marker at {}", report.position);
                self.stats.record_success(report);
            }
            Err(e) => {
                self.stats.record_failure(e);
                (self.on_error)(e);
            }
        }
        result
    }

    /// Render step: places the marker for the report.
    pub fn update_position(&mut self, report: &PositionReport) -> Result<Marker, PollError> {
        self.layer.place(report)
    }

    /// Removes every marker drawn so far
    pub fn clear(&mut self) -> Result<(), PollError> {
        self.layer.clear()
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    pub fn stats(&self) -> &PollStats {
        &self.stats
    }

    pub fn surface(&self) -> &S {
        self.layer.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.layer.surface_mut()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use rtrack_core::{config::RenderMode, types::Position};

    use super::*;
    use crate::memory::MemoryMap;

    fn poller(mode: RenderMode) -> Poller<MemoryMap> {
        let config = PollerConfig::default().with_mode(mode);
        Poller::new(config, MemoryMap::with_container("map"))
    }

    fn body(s: &'static str) -> impl Fn(&str) -> Result<String, PollError> + Send + Sync {
        move |_: &str| Ok(s.to_string())
    }

    fn lefts_tops(poller: &Poller<MemoryMap>) -> Vec<(f64, f64)> {
        poller
            .surface()
            .markers("map")
            .iter()
            .map(|m| (m.left(), m.top()))
            .collect()
    }

    #[test]
    fn test_single_marker() {
        let mut poller = poller(RenderMode::Trail);
        let report = poller.poll_once(&body(r#"{"position":[2,3]}"#)).unwrap();

        assert_eq!(report.position, Position::new(2.0, 3.0));
        assert_eq!(lefts_tops(&poller), vec![(100.0, 150.0)]);
        let marker = &poller.surface().markers("map")[0];
        assert_eq!(marker.class, "device");
        assert_eq!(marker.offset.left_css(), "100px");
        assert_eq!(marker.offset.top_css(), "150px");
    }

    #[test]
    fn test_repeated_polls_accumulate() {
        let mut poller = poller(RenderMode::Trail);
        let fetcher = body(r#"{"position":[0,0]}"#);
        poller.poll_once(&fetcher).unwrap();
        poller.poll_once(&fetcher).unwrap();

        assert_eq!(lefts_tops(&poller), vec![(0.0, 0.0), (0.0, 0.0)]);
        assert_eq!(poller.stats().successes, 2);
    }

    #[test]
    fn test_current_mode_moves_marker() {
        let mut poller = poller(RenderMode::Current);
        poller.poll_once(&body(r#"{"position":[0,0]}"#)).unwrap();
        poller.poll_once(&body(r#"{"position":[1,2]}"#)).unwrap();

        assert_eq!(lefts_tops(&poller), vec![(50.0, 100.0)]);
    }

    #[test]
    fn test_missing_position_places_nothing() {
        let mut poller = poller(RenderMode::Trail);
        let errors = Rc::new(RefCell::new(Vec::new()));
        {
            let errors = errors.clone();
            poller.set_on_error(Box::new(move |e: &PollError| {
                errors.borrow_mut().push(e.clone())
            }));
        }

        let result = poller.poll_once(&body(r#"{"other":"x"}"#));
        assert_eq!(result, Err(PollError::MissingPosition));
        assert!(poller.surface().markers("map").is_empty());
        assert_eq!(*errors.borrow(), vec![PollError::MissingPosition]);
        assert_eq!(poller.stats().failures, 1);
        assert_eq!(poller.stats().last_error, Some(PollError::MissingPosition));
    }

    #[test]
    fn test_malformed_bodies_place_nothing() {
        let mut poller = poller(RenderMode::Trail);
        poller.set_on_error(Box::new(|_: &PollError| {}));
        for s in [
            r#"{"position":[1]}"#,
            r#"{"position":[1,2,3]}"#,
            r#"{"position":"1,2"}"#,
            "<html>502</html>",
        ] {
            assert!(poller.complete(Ok(s.to_string())).is_err());
        }
        assert!(poller.surface().markers("map").is_empty());
        assert_eq!(poller.stats().failures, 4);
    }

    #[test]
    fn test_network_failure_reaches_callback() {
        let mut poller = poller(RenderMode::Trail);
        let errors = Rc::new(RefCell::new(0));
        {
            let errors = errors.clone();
            poller.set_on_error(Box::new(move |e: &PollError| {
                assert!(e.is_network());
                *errors.borrow_mut() += 1;
            }));
        }

        let fetcher = |_: &str| -> Result<String, PollError> {
            Err(PollError::Network("connection refused".to_string()))
        };
        assert!(poller.poll_once(&fetcher).is_err());
        assert_eq!(*errors.borrow(), 1);
    }

    #[test]
    fn test_missing_container_keeps_previous_markers() {
        let mut poller = poller(RenderMode::Trail);
        poller.set_on_error(Box::new(|_: &PollError| {}));
        poller.poll_once(&body(r#"{"position":[1,1]}"#)).unwrap();

        let kept = poller.surface_mut().remove_container("map").unwrap();
        let result = poller.poll_once(&body(r#"{"position":[2,2]}"#));
        assert_eq!(result, Err(PollError::MissingContainer("map".to_string())));
        assert_eq!(kept.len(), 1);
        assert_eq!((kept[0].left(), kept[0].top()), (50.0, 50.0));
    }

    #[test]
    fn test_fetches_configured_endpoint() {
        let config = PollerConfig::default().with_endpoint("http://10.0.0.2:5000/ble-data");
        let mut poller = Poller::new(config, MemoryMap::with_container("map"));
        let fetcher = |url: &str| -> Result<String, PollError> {
            assert_eq!(url, "http://10.0.0.2:5000/ble-data");
            Ok(r#"{"position":[1,1]}"#.to_string())
        };
        assert!(poller.poll_once(&fetcher).is_ok());
    }

    #[test]
    fn test_independent_pollers() {
        let mut a = poller(RenderMode::Trail);
        let mut b = poller(RenderMode::Trail);
        a.poll_once(&body(r#"{"position":[1,1]}"#)).unwrap();

        assert_eq!(a.surface().markers("map").len(), 1);
        assert!(b.surface().markers("map").is_empty());
        b.poll_once(&body(r#"{"position":[1,1]}"#)).unwrap();
        assert_eq!(a.stats().cycles(), 1);
    }
}
