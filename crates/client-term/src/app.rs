use std::sync::mpsc::Receiver;

use crossterm::event::{KeyCode, KeyEvent};
use log::{debug, info, warn};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    widgets::{Block, Borders, Paragraph},
};
use rtrack_client::{MemoryMap, Poller};

use crate::{map_view::MapView, ticker::Fetched};

pub struct MapApp {
    poller: Poller<MemoryMap>,
    results: Receiver<Fetched>,
    exit: bool,
}

impl MapApp {
    pub fn new(poller: Poller<MemoryMap>, results: Receiver<Fetched>) -> Self {
        Self {
            poller,
            results,
            exit: false,
        }
    }

    /// Renders every fetch that completed since the last call
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        for fetched in self.results.try_iter() {
            debug!("Fetch of tick {} completed", fetched.tick);
            // Failures already went through the poller's error callback
            let _ = self.poller.complete(fetched.result);
            count += 1;
        }
        count
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.exit = true,
            KeyCode::Char('c') => {
                match self.poller.clear() {
                    Ok(()) => info!("Map cleared"),
                    Err(e) => warn!("Could not clear the map: {e}"),
                }
            }
            _ => {}
        }
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(f.area());

        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(chunks[0]);

        let config = self.poller.config();
        let map_block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Map ({}, {} mode)", config.endpoint_url, config.mode));
        let map_area = map_block.inner(left_chunks[0]);
        f.render_widget(map_block, left_chunks[0]);
        let markers = self.poller.surface().markers(&config.container_id);
        f.render_widget(MapView::new(markers, config.scale), map_area);

        let status = Paragraph::new(self.status_line())
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(status, left_chunks[1]);

        let logger_widget = tui_logger::TuiLoggerWidget::default()
            .block(Block::default().title("Logs").borders(Borders::ALL));
        f.render_widget(logger_widget, chunks[1]);
    }

    fn status_line(&self) -> String {
        let stats = self.poller.stats();
        let markers = self
            .poller
            .surface()
            .markers(&self.poller.config().container_id)
            .len();

        let last = match (&stats.last_report, stats.since_last_success()) {
            (Some(report), Some(ago)) => {
                format!("last {} {}s ago", report.position, ago.as_secs())
            }
            _ => "no position yet".to_string(),
        };

        format!(
            "{} ok / {} failed | {markers} markers | {last} | 'c' clear, 'q' quit",
            stats.successes, stats.failures
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use crossterm::event::KeyModifiers;
    use rtrack_core::{
        config::{PollerConfig, RenderMode},
        error::PollError,
    };

    use super::*;

    fn app() -> (MapApp, std::sync::mpsc::Sender<Fetched>) {
        let (tx, rx) = channel();
        let mut poller = Poller::new(PollerConfig::default(), MemoryMap::with_container("map"));
        poller.set_on_error(Box::new(|_: &PollError| {}));
        (MapApp::new(poller, rx), tx)
    }

    #[test]
    fn test_drain_renders_completed_fetches() {
        let (mut app, tx) = app();
        tx.send(Fetched {
            tick: 2,
            result: Ok(r#"{"position":[1,1]}"#.to_string()),
        })
        .unwrap();
        tx.send(Fetched {
            tick: 1,
            result: Err(PollError::Network("timeout".to_string())),
        })
        .unwrap();

        assert_eq!(app.drain(), 2);
        assert_eq!(app.poller.surface().markers("map").len(), 1);
        assert!(app.status_line().starts_with("1 ok / 1 failed | 1 markers"));
    }

    #[test]
    fn test_keys() {
        let (mut app, tx) = app();
        tx.send(Fetched {
            tick: 1,
            result: Ok(r#"{"position":[1,1]}"#.to_string()),
        })
        .unwrap();
        app.drain();

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(app.poller.surface().markers("map").is_empty());
        assert!(!app.should_exit());

        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(app.should_exit());
    }

    #[test]
    fn test_clear_then_track_two_devices() {
        let (tx, rx) = channel();
        let config = PollerConfig::default().with_mode(RenderMode::Current);
        let poller = Poller::new(config, MemoryMap::with_container("map"));
        let mut app = MapApp::new(poller, rx);
        let send = |tick, body: &str| {
            tx.send(Fetched {
                tick,
                result: Ok(body.to_string()),
            })
            .unwrap()
        };

        send(1, r#"{"device_id":"a","position":[1,1]}"#);
        send(2, r#"{"device_id":"b","position":[2,2]}"#);
        app.drain();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE));

        send(3, r#"{"device_id":"b","position":[5,5]}"#);
        send(4, r#"{"device_id":"a","position":[7,7]}"#);
        app.drain();

        let markers: Vec<(String, f64)> = app
            .poller
            .surface()
            .markers("map")
            .iter()
            .map(|m| (m.device.to_string(), m.top()))
            .collect();
        assert_eq!(
            markers,
            vec![("b".to_string(), 250.0), ("a".to_string(), 350.0)]
        );
    }
}
