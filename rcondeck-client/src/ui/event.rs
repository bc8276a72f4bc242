//! Event handling for the application
//!
//! Combines terminal input with executor results into a single event stream.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use crate::executor::CommandResult;

/// Application events combining input and executor results
#[derive(Debug)]
pub enum AppEvent {
    /// Key press
    Input(KeyEvent),
    /// Terminal resize
    Resize { cols: u16, rows: u16 },
    /// Periodic tick for status expiry
    Tick,
    /// An executor finished
    Completed(CommandResult),
}

/// Event handler that merges input polling with executor results
pub struct EventHandler {
    tx: mpsc::UnboundedSender<AppEvent>,
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx, tick_rate }
    }

    /// Get a sender clone for delivering executor results
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    /// Start polling for terminal events on a background thread
    pub fn start_input_polling(&self) {
        let tx = self.tx.clone();
        let tick_rate = self.tick_rate;

        std::thread::spawn(move || pump_terminal_events(&tx, tick_rate, event::poll, event::read));
    }

    /// Receive next event
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Try to receive without blocking
    #[allow(dead_code)] // Used by tests
    pub fn try_next(&mut self) -> Option<AppEvent> {
        self.rx.try_recv().ok()
    }
}

/// Forward terminal events until the receiver is gone or the terminal fails
fn pump_terminal_events<P, R>(
    tx: &mpsc::UnboundedSender<AppEvent>,
    tick_rate: Duration,
    mut poll: P,
    mut read: R,
) where
    P: FnMut(Duration) -> io::Result<bool>,
    R: FnMut() -> io::Result<CrosstermEvent>,
{
    loop {
        let ready = match poll(tick_rate) {
            Ok(ready) => ready,
            Err(e) => {
                tracing::error!("Error polling terminal events: {}", e);
                return;
            }
        };

        let event = if ready {
            match read() {
                Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    AppEvent::Input(key)
                }
                Ok(CrosstermEvent::Resize(cols, rows)) => AppEvent::Resize { cols, rows },
                Ok(_) => continue,
                Err(e) => {
                    tracing::error!("Error reading terminal event: {}", e);
                    return;
                }
            }
        } else {
            AppEvent::Tick
        };

        if tx.send(event).is_err() {
            return;
        }
    }
}
