//! Frame rendering
//!
//! A pure projection of the session state plus the two widgets. Nothing is
//! kept between frames.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::registry::ServerRegistry;
use crate::session::SessionState;

use super::widgets::{CommandInput, ServerList};

/// Width of the server column
pub const LEFT_WIDTH: u16 = 24;

/// Minimum width of the log column
pub const MIN_RIGHT_WIDTH: u16 = 40;

/// Rows in the right column not used by log lines
pub const LOG_CHROME_ROWS: u16 = 6;

/// Lines of the log that fit the viewport, oldest first
pub fn visible_log(state: &SessionState) -> Vec<&str> {
    let rows = state.viewport.height.saturating_sub(LOG_CHROME_ROWS) as usize;
    state.log.tail(rows).collect()
}

/// Transient status, or a description of the active server
pub fn status_line(state: &SessionState, registry: &ServerRegistry) -> String {
    if let Some(text) = state.status_text() {
        return text.to_string();
    }

    state
        .active_server
        .as_deref()
        .and_then(|name| registry.lookup(name))
        .map(|server| server.describe())
        .unwrap_or_else(|| "No active server".to_string())
}

/// Draw one frame
pub fn draw(
    frame: &mut Frame,
    state: &SessionState,
    registry: &ServerRegistry,
    list: &mut ServerList,
    input: &CommandInput,
    help: &str,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LEFT_WIDTH), Constraint::Min(MIN_RIGHT_WIDTH)])
        .split(frame.area());

    list.render(frame, columns[0], registry, state.active_server.as_deref());
    draw_main_column(frame, columns[1], state, registry, input, help);
}

fn draw_main_column(
    frame: &mut Frame,
    area: Rect,
    state: &SessionState,
    registry: &ServerRegistry,
    input: &CommandInput,
    help: &str,
) {
    // Log title row + status + help + bordered input
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    let lines: Vec<Line> = visible_log(state).into_iter().map(Line::from).collect();
    let log = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .title("Log")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(log, rows[0]);

    let status = Paragraph::new(status_line(state, registry))
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(status, rows[1]);

    let help = Paragraph::new(help.to_string()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[2]);

    input.render(frame, rows[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::input::Keymap;
    use crate::registry::ServerDescriptor;
    use crate::session::Viewport;

    fn registry() -> ServerRegistry {
        ServerRegistry::load(vec![
            ServerDescriptor::new("A", "1.2.3.4:27015", "x", Some("mc-a".into())),
            ServerDescriptor::new("B", "5.6.7.8:27015", "y", None),
        ])
        .unwrap()
    }

    fn state_with_lines(count: usize, height: u16) -> SessionState {
        let mut state = SessionState::new();
        state.viewport = Viewport { width: 80, height };
        for i in 0..count {
            state.log.push(format!("line {}", i));
        }
        state
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_visible_log_is_tail() {
        let state = state_with_lines(30, 24);
        let visible = visible_log(&state);
        assert_eq!(visible.len(), 18);
        assert_eq!(visible.first(), Some(&"line 12"));
        assert_eq!(visible.last(), Some(&"line 29"));
    }

    #[test]
    fn test_visible_log_short_history() {
        let state = state_with_lines(3, 24);
        assert_eq!(visible_log(&state), vec!["line 0", "line 1", "line 2"]);
    }

    #[test]
    fn test_visible_log_tiny_viewport() {
        let state = state_with_lines(10, 4);
        assert!(visible_log(&state).is_empty());
    }

    #[test]
    fn test_status_line_prefers_status() {
        let mut state = SessionState::new();
        state.active_server = Some("A".into());
        state.set_status("Sending…", Instant::now());
        assert_eq!(status_line(&state, &registry()), "Sending…");
    }

    #[test]
    fn test_status_line_describes_active_server() {
        let registry = registry();
        let mut state = SessionState::new();

        state.active_server = Some("A".into());
        assert_eq!(
            status_line(&state, &registry),
            "Active: A (1.2.3.4:27015) | Container: mc-a"
        );

        state.active_server = Some("B".into());
        assert_eq!(status_line(&state, &registry), "Active: B (5.6.7.8:27015)");

        state.active_server = None;
        assert_eq!(status_line(&state, &registry), "No active server");
    }

    #[test]
    fn test_draw_full_frame() {
        let registry = registry();
        let mut state = state_with_lines(0, 24);
        state.active_server = Some("A".into());
        state.log.push("Ready.");
        state.log.push("Active server: A");

        let mut list = ServerList::new();
        let mut input = CommandInput::new();
        for c in "list".chars() {
            input.insert(c);
        }
        let help = Keymap::default().help_text();

        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|frame| draw(frame, &state, &registry, &mut list, &input, &help))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Servers"));
        assert!(text.contains("Ready."));
        assert!(text.contains("Active server: A"));
        assert!(text.contains("Active: A (1.2.3.4:27015) | Container: mc-a"));
        assert!(text.contains("[Tab] switch"));
        assert!(text.contains("Command"));
        assert!(text.contains("list"));
    }

    #[test]
    fn test_draw_narrow_terminal_does_not_panic() {
        let registry = registry();
        let state = state_with_lines(50, 5);
        let mut list = ServerList::new();
        let input = CommandInput::new();

        let mut terminal = Terminal::new(TestBackend::new(30, 5)).unwrap();
        terminal
            .draw(|frame| draw(frame, &state, &registry, &mut list, &input, ""))
            .unwrap();
    }
}
