use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Screen};
use crate::theme::Theme;

pub mod auth;
pub mod dashboard;
pub mod help;
pub mod history;
pub mod predict;
pub mod toast;

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "…" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

/// Create a centered rectangle of the given width (columns) and height (rows).
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

/// Top bar: app name, screen tabs, theme toggle.
pub fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(" CROPCARE ", theme.header_style()), Span::raw(" ")];
    for (key, label, screen) in [
        ("1", "Dashboard", Screen::Dashboard),
        ("2", "Predict", Screen::Predict),
        ("3", "History", Screen::History),
    ] {
        let style = if app.screen == screen {
            Style::default().fg(theme.active).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.dim)
        };
        spans.push(Span::styled(format!(" {key}:{label} "), style));
    }
    spans.push(Span::styled(
        format!("  t:{}", app.state.theme.toggle_label()),
        Style::default().fg(theme.dim),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_footer(f: &mut Frame, area: Rect, hints: &str, theme: &Theme) {
    let footer = Line::from(Span::styled(format!(" {hints}"), theme.footer_style()));
    f.render_widget(Paragraph::new(footer), area);
}

/// Header / body / footer split used by the logged-in screens.
pub fn page_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .split(area);
    (chunks[0], chunks[1], chunks[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("Tomato", 10), "Tomato");
        assert_eq!(truncate("Early blight", 6), "Early…");
        assert_eq!(truncate("°C°C°C", 6), "°C°C°C");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn spinner_wraps() {
        assert_eq!(spinner_char(0), spinner_char(SPINNER_FRAMES.len()));
    }
}
