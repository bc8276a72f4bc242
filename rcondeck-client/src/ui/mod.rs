//! Terminal user interface
//!
//! Ratatui front end: reads keys, feeds the dispatcher, launches executors,
//! and draws the session state every frame.

mod app;
mod event;
mod render;
mod terminal;
mod widgets;

pub use app::App;
