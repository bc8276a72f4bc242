//! Interactive widgets: the server list and the command line
//!
//! Both own only their view state (cursor positions, edit buffer). Which
//! server is active lives in the session state, not here.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::registry::ServerRegistry;

/// Selectable server list
#[derive(Debug, Default)]
pub struct ServerList {
    state: ListState,
    page_size: usize,
}

impl ServerList {
    pub fn new() -> Self {
        let mut state = ListState::default();
        state.select(Some(0));
        Self {
            state,
            page_size: 10,
        }
    }

    pub fn cursor(&self) -> usize {
        self.state.selected().unwrap_or(0)
    }

    pub fn select(&mut self, index: usize) {
        self.state.select(Some(index));
    }

    /// Move the cursor for navigation keys; returns false for anything else
    pub fn handle_key(&mut self, key: &KeyEvent, count: usize) -> bool {
        if count == 0 {
            return false;
        }
        let last = count - 1;
        let cursor = self.cursor().min(last);
        let page = self.page_size.max(1);

        let next = match key.code {
            KeyCode::Up => cursor.saturating_sub(1),
            KeyCode::Down => (cursor + 1).min(last),
            KeyCode::PageUp => cursor.saturating_sub(page),
            KeyCode::PageDown => (cursor + page).min(last),
            _ => return false,
        };
        self.select(next);
        true
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        registry: &ServerRegistry,
        active: Option<&str>,
    ) {
        self.page_size = area.height.saturating_sub(2) as usize;

        let items: Vec<ListItem> = registry
            .iter()
            .map(|server| {
                let is_active = active == Some(server.name.as_str());
                let marker = if is_active { "* " } else { "  " };
                let style = if is_active {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format!("{}{}", marker, server.name)).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Servers")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

/// Single-line command editor
#[derive(Debug, Default)]
pub struct CommandInput {
    buffer: String,
    /// Cursor position in characters
    cursor: usize,
}

impl CommandInput {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn value(&self) -> &str {
        &self.buffer
    }

    #[allow(dead_code)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Return the text and clear the editor
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.buffer.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.buffer.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Apply an editing key; returns false for anything else
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let chorded = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match key.code {
            KeyCode::Char(c) if !chorded => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            _ => return false,
        }
        true
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2) as usize;
        // Scroll so the cursor stays visible
        let offset = if inner_width > 0 && self.cursor >= inner_width {
            self.cursor + 1 - inner_width
        } else {
            0
        };
        let visible: String = self.buffer.chars().skip(offset).collect();

        let paragraph = Paragraph::new(visible).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Command")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, area);

        if area.width > 2 && area.height > 2 {
            let x = area.x + 1 + (self.cursor - offset) as u16;
            frame.set_cursor_position(Position::new(x, area.y + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::registry::ServerDescriptor;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut CommandInput, text: &str) {
        for c in text.chars() {
            assert!(input.handle_key(&key(KeyCode::Char(c))));
        }
    }

    // ==================== ServerList ====================

    #[test]
    fn test_list_navigation_clamps() {
        let mut list = ServerList::new();
        assert!(list.handle_key(&key(KeyCode::Up), 3));
        assert_eq!(list.cursor(), 0);

        list.handle_key(&key(KeyCode::Down), 3);
        list.handle_key(&key(KeyCode::Down), 3);
        list.handle_key(&key(KeyCode::Down), 3);
        assert_eq!(list.cursor(), 2);

        list.handle_key(&key(KeyCode::PageUp), 3);
        assert_eq!(list.cursor(), 0);
        list.handle_key(&key(KeyCode::PageDown), 3);
        assert_eq!(list.cursor(), 2);
    }

    #[test]
    fn test_list_ignores_other_keys() {
        let mut list = ServerList::new();
        assert!(!list.handle_key(&key(KeyCode::Char('j')), 3));
        assert!(!list.handle_key(&key(KeyCode::Home), 3));
        assert!(!list.handle_key(&key(KeyCode::Down), 0));
    }

    #[test]
    fn test_list_render_marks_active() {
        let registry = ServerRegistry::load(vec![
            ServerDescriptor::new("alpha", "a:1", "x", None),
            ServerDescriptor::new("beta", "b:1", "x", None),
        ])
        .unwrap();
        let mut list = ServerList::new();
        let mut terminal = Terminal::new(TestBackend::new(24, 6)).unwrap();

        terminal
            .draw(|frame| list.render(frame, frame.area(), &registry, Some("beta")))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let rows: Vec<String> = (0..6)
            .map(|y| (0..24).map(|x| buffer[(x, y)].symbol()).collect())
            .collect();
        assert!(rows[0].contains("Servers"));
        assert!(rows[1].contains(">   alpha"));
        assert!(rows[2].contains("* beta"));
    }

    // ==================== CommandInput ====================

    #[test]
    fn test_typing_and_take() {
        let mut input = CommandInput::new();
        type_str(&mut input, "status");
        assert_eq!(input.value(), "status");
        assert_eq!(input.cursor(), 6);

        assert_eq!(input.take(), "status");
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_editing_keys() {
        let mut input = CommandInput::new();
        type_str(&mut input, "sy hi");
        input.handle_key(&key(KeyCode::Home));
        input.handle_key(&key(KeyCode::Right));
        type_str(&mut input, "a");
        assert_eq!(input.value(), "say hi");

        input.handle_key(&key(KeyCode::End));
        input.handle_key(&key(KeyCode::Backspace));
        assert_eq!(input.value(), "say h");

        input.handle_key(&key(KeyCode::Home));
        input.handle_key(&key(KeyCode::Delete));
        assert_eq!(input.value(), "ay h");
    }

    #[test]
    fn test_multibyte_chars() {
        let mut input = CommandInput::new();
        type_str(&mut input, "say héllo");
        input.handle_key(&key(KeyCode::Left));
        input.handle_key(&key(KeyCode::Left));
        input.handle_key(&key(KeyCode::Left));
        input.handle_key(&key(KeyCode::Backspace));
        assert_eq!(input.value(), "say hllo");
    }

    #[test]
    fn test_boundaries_are_safe() {
        let mut input = CommandInput::new();
        input.backspace();
        input.delete();
        input.move_left();
        input.move_right();
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_control_chords_not_inserted() {
        let mut input = CommandInput::new();
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert!(!input.handle_key(&ctrl_a));
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert!(input.handle_key(&shifted));
        assert_eq!(input.value(), "A");
    }
}
