//! Terminal event polling
//!
//! crossterm is polled on a dedicated thread and events are forwarded over a
//! tokio channel so the runner can `select!` on them alongside prompt results
//! and the teardown timer.

use std::time::Duration;

use crossterm::event::{self, KeyEvent, MouseEvent};
use eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Terminal events
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// Nothing happened within one tick; used to expire notices
    Tick,
}

/// Event source for the TUI
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Start polling the terminal with the given tick rate
    pub fn new(tick_rate: Duration) -> Self {
        debug!(?tick_rate, "EventHandler::new: called");
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            debug!("EventHandler: polling thread started");
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(event::Event::Key(key)) => Event::Key(key),
                        Ok(event::Event::Mouse(mouse)) => Event::Mouse(mouse),
                        Ok(event::Event::Resize(w, h)) => {
                            debug!(w, h, "EventHandler: resize event received");
                            Event::Resize(w, h)
                        }
                        Ok(_) => continue,
                        Err(e) => {
                            debug!(error = %e, "EventHandler: read failed, skipping");
                            continue;
                        }
                    }
                } else {
                    Event::Tick
                };

                if tx.send(event).is_err() {
                    debug!("EventHandler: channel closed, exiting loop");
                    break;
                }
            }
        });

        Self { rx }
    }

    /// Build a handler fed from an existing channel
    pub fn from_channel(rx: mpsc::UnboundedReceiver<Event>) -> Self {
        Self { rx }
    }

    /// Wait for the next event
    pub async fn next(&mut self) -> Result<Event> {
        let event = self.rx.recv().await.ok_or_else(|| eyre::eyre!("Event channel closed"))?;
        trace!(?event, "EventHandler::next: received event");
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[tokio::test]
    async fn test_events_from_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut handler = EventHandler::from_channel(rx);

        tx.send(Event::Key(KeyEvent::from(KeyCode::Char('x')))).unwrap();
        tx.send(Event::Resize(100, 30)).unwrap();

        assert!(matches!(handler.next().await.unwrap(), Event::Key(k) if k.code == KeyCode::Char('x')));
        assert!(matches!(handler.next().await.unwrap(), Event::Resize(100, 30)));

        drop(tx);
        assert!(handler.next().await.is_err());
    }
}
