//! Main application loop
//!
//! `App` owns the terminal side of the dashboard: it turns key presses into
//! dispatcher events, launches executors for the requests the dispatcher
//! returns, and redraws after every event.

use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use tracing::{debug, info};

use rcondeck_utils::Result;

use crate::dispatcher::{DeckEvent, Dispatcher, Transition};
use crate::executor::Executors;
use crate::input::{KeyAction, Keymap};

use super::event::{AppEvent, EventHandler};
use super::render;
use super::terminal::Terminal;
use super::widgets::{CommandInput, ServerList};

pub struct App {
    dispatcher: Dispatcher,
    executors: Executors,
    events: EventHandler,
    keymap: Keymap,
    help: String,
    server_list: ServerList,
    input: CommandInput,
}

impl App {
    pub fn new(
        dispatcher: Dispatcher,
        executors: Executors,
        keymap: Keymap,
        tick_rate: Duration,
    ) -> Self {
        let mut server_list = ServerList::new();
        server_list.select(dispatcher.state().selection_index);
        let help = keymap.help_text();

        Self {
            dispatcher,
            executors,
            events: EventHandler::new(tick_rate),
            keymap,
            help,
            server_list,
            input: CommandInput::new(),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.dispatcher.is_quitting()
    }

    /// Run the main application loop until quit
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = Terminal::new()?;
        let (cols, rows) = terminal.size()?;
        self.apply(DeckEvent::Resize {
            width: cols,
            height: rows,
        });

        self.events.start_input_polling();
        info!(servers = self.dispatcher.registry().len(), "dashboard started");

        while !self.should_quit() {
            self.draw(&mut terminal)?;

            match self.events.next().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }

        Ok(())
    }

    fn draw(&mut self, terminal: &mut Terminal) -> Result<()> {
        let state = self.dispatcher.state();
        let registry = self.dispatcher.registry();
        let list = &mut self.server_list;
        let input = &self.input;
        let help = self.help.as_str();

        terminal
            .terminal_mut()
            .draw(|frame| render::draw(frame, state, registry, list, input, help))?;
        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(key) => self.handle_key(key),
            AppEvent::Resize { cols, rows } => self.apply(DeckEvent::Resize {
                width: cols,
                height: rows,
            }),
            AppEvent::Tick => self.apply(DeckEvent::Tick(Instant::now())),
            AppEvent::Completed(result) => self.apply(DeckEvent::Completed(result)),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.keymap.resolve(&key) {
            KeyAction::Quit => self.apply(DeckEvent::Quit),
            KeyAction::SelectNext => {
                self.apply(DeckEvent::SelectNext);
                self.server_list.select(self.dispatcher.state().selection_index);
            }
            KeyAction::Submit => {
                let text = self.input.take();
                self.apply(DeckEvent::SubmitCommand(text));
            }
            KeyAction::Container(action) => self.apply(DeckEvent::Container(action)),
            KeyAction::Forward => {
                let count = self.dispatcher.registry().len();
                if !self.server_list.handle_key(&key, count) {
                    self.input.handle_key(&key);
                }
            }
        }
    }

    /// Feed the dispatcher and launch whatever it asks for
    fn apply(&mut self, event: DeckEvent) {
        match self.dispatcher.dispatch(event) {
            Transition::Launch(request) => {
                let tx = self.events.sender();
                // Detached: quitting neither awaits nor cancels in-flight requests
                let _ = self.executors.spawn(request, move |result| {
                    if tx.send(AppEvent::Completed(result)).is_err() {
                        debug!("event loop gone, dropping executor result");
                    }
                });
            }
            Transition::Quit | Transition::Continue => {}
        }
    }
}
