use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::App;
use crate::view::truncate;

const TOAST_WIDTH: u16 = 48;
const MAX_VISIBLE: usize = 4;

/// Stack of notifications in the bottom-right corner, newest at the bottom.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = f.area();
    let toasts = app.state.notifications.active();
    if toasts.is_empty() || area.width < TOAST_WIDTH + 2 {
        return;
    }

    let shown = &toasts[toasts.len().saturating_sub(MAX_VISIBLE)..];
    let mut bottom = area.height.saturating_sub(1);
    for toast in shown.iter().rev() {
        let height = 3;
        if bottom < height {
            break;
        }
        let rect = Rect {
            x: area.width - TOAST_WIDTH - 1,
            y: bottom - height,
            width: TOAST_WIDTH,
            height,
        };
        bottom -= height;

        let color = theme.notification_color(toast.kind);
        let text = Line::from(vec![
            Span::styled(
                format!("{} ", glyph(toast.kind)),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                truncate(&toast.message, TOAST_WIDTH as usize - 6),
                Style::default().fg(theme.text),
            ),
        ]);
        let widget = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .style(theme.base_style())
                    .title(format!(" {} ", toast.kind.label())),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(Clear, rect);
        f.render_widget(widget, rect);
    }
}

fn glyph(kind: cropcare_core::NotificationKind) -> &'static str {
    use cropcare_core::NotificationKind::*;
    match kind {
        Success => "✓",
        Error => "✗",
        Warning => "!",
        Info => "i",
    }
}
