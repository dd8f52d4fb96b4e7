use std::{io::Stdout, time::Duration};

use anyhow::Result;
use crossterm::event as ct;
use log::error;
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::app::MapApp;

pub struct CrosstermAdapter {
    app: MapApp,
}

impl CrosstermAdapter {
    pub fn new(app: MapApp) -> CrosstermAdapter {
        CrosstermAdapter { app }
    }

    pub fn run(self) {
        let mut terminal = ratatui::init();
        let result = self.do_run(&mut terminal);
        ratatui::restore();
        if let Err(e) = result {
            error!("Tui ended: {e}");
            eprintln!("Tui ended: {e}");
        }
    }

    pub fn do_run(mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while !self.app.should_exit() {
            self.app.drain();
            terminal.draw(|f| self.app.render(f))?;

            if ct::poll(Duration::from_millis(50))? {
                let ct::Event::Key(key) = ct::read()? else {
                    continue;
                };
                if key.kind != ct::KeyEventKind::Press {
                    continue;
                }

                // Check for Ctrl+C to exit
                if key.code == ct::KeyCode::Char('c')
                    && key.modifiers.contains(ct::KeyModifiers::CONTROL)
                {
                    break;
                }

                self.app.handle_key(key);
            }
        }
        Ok(())
    }
}
