use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup = centered_rect(62, 30, area);

    let lines = vec![
        Line::from(Span::styled(" Keyboard Shortcuts ", theme.header_style())),
        Line::from(""),
        section_header("Screens", theme),
        key_line("1 / d", "Dashboard", theme),
        key_line("2 / p", "Predict", theme),
        key_line("3 / h", "History", theme),
        key_line("Esc", "Go back", theme),
        Line::from(""),
        section_header("Login / Register", theme),
        key_line("Tab / Shift+Tab", "Next / previous field", theme),
        key_line("Ctrl+t", "Switch Login / Register", theme),
        key_line("Ctrl+p", "Show / hide password", theme),
        key_line("Enter", "Submit", theme),
        Line::from(""),
        section_header("Predict", theme),
        key_line("o", "Enter an image path", theme),
        key_line("drop / paste", "Select a dropped file", theme),
        key_line("Enter", "Analyze image", theme),
        key_line("x / Del", "Remove image", theme),
        key_line("a", "Analyze another", theme),
        key_line("e", "Save HTML report", theme),
        Line::from(""),
        section_header("Dashboard / History", theme),
        key_line("r", "Refresh", theme),
        key_line("j / k", "Scroll history", theme),
        key_line("e", "Save history as CSV", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("t", "Toggle light / dark theme", theme),
        key_line("n", "Dismiss latest notification", theme),
        key_line("? / q / Ctrl+c", "Help / quit / force quit", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .style(theme.base_style())
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<18}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
