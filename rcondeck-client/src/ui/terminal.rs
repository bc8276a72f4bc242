//! Terminal initialization and cleanup

use std::io::{self, Stdout};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;

use rcondeck_utils::{DeckError, Result};

/// Terminal wrapper that restores the screen when dropped
pub struct Terminal {
    terminal: ratatui::Terminal<CrosstermBackend<Stdout>>,
}

impl Terminal {
    /// Enter raw mode on the alternate screen
    pub fn new() -> Result<Self> {
        enable_raw_mode().map_err(|e| DeckError::Terminal(format!("raw mode: {}", e)))?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(DeckError::Terminal(format!("alternate screen: {}", e)));
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = ratatui::Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut ratatui::Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    /// Get terminal size (columns, rows)
    pub fn size(&self) -> Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }

    fn restore() -> Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        if let Err(e) = Self::restore() {
            tracing::error!("Failed to restore terminal: {}", e);
        }
    }
}
