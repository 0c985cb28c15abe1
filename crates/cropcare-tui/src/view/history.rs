use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use cropcare_core::{HistoryCell, HistoryTable};

use crate::app::App;
use crate::model::Loadable;
use crate::theme::Theme;
use crate::view::{page_layout, render_footer, render_header, spinner_char, truncate};

/// Render the prediction history table.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let (header, body, footer) = page_layout(f.area());
    render_header(f, header, app);

    let block = |title: String| {
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(title)
    };

    match &app.history.table {
        Loadable::Loading => {
            let line = Line::from(Span::styled(
                format!(" {} Loading history…", spinner_char(app.tick)),
                Style::default().fg(theme.dim),
            ));
            f.render_widget(Paragraph::new(line).block(block(" Prediction History ".to_string())), body);
        }
        Loadable::Failed(error) => {
            let line = Line::from(Span::styled(
                format!(" Unable to load history: {error}"),
                Style::default().fg(theme.diseased),
            ));
            f.render_widget(Paragraph::new(line).block(block(" Prediction History ".to_string())), body);
        }
        Loadable::Ready(table) if table.is_empty() => {
            let line = Line::from(Span::styled(
                " No predictions yet. Analyze an image to start your history.",
                Style::default().fg(theme.dim),
            ));
            f.render_widget(Paragraph::new(line).block(block(" Prediction History ".to_string())), body);
        }
        Loadable::Ready(table) => {
            let title = format!(" Prediction History ({}) ", table.rows.len());
            let widget = history_table(table, body.width, theme).block(block(title));
            let mut state = TableState::default();
            state.select(Some(app.history.cursor));
            f.render_stateful_widget(widget, body, &mut state);
        }
    }

    render_footer(f, footer, "j/k:scroll  e:save CSV  r:refresh  Esc:back  ?:help  q:quit", theme);
}

fn history_table<'a>(table: &'a HistoryTable, width: u16, theme: &Theme) -> Table<'a> {
    let columns = table
        .headers
        .len()
        .max(table.rows.iter().map(Vec::len).max().unwrap_or(0))
        .max(1);
    let col_width = ((width as usize).saturating_sub(2) / columns).max(4);

    let header = Row::new(table.headers.iter().map(|h| {
        Cell::from(h.as_str()).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
    }))
    .height(1);

    let rows = table.rows.iter().map(|row| {
        Row::new(row.iter().map(|cell| {
            let text = truncate(cell.text(), col_width.saturating_sub(1));
            match cell {
                HistoryCell::Status(status) => {
                    let color = if status.eq_ignore_ascii_case("healthy") {
                        theme.healthy
                    } else {
                        theme.diseased
                    };
                    Cell::from(text).style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                }
                HistoryCell::Text(_) => Cell::from(text).style(Style::default().fg(theme.text)),
            }
        }))
    });

    let widths = vec![Constraint::Ratio(1, columns as u32); columns];
    Table::new(rows, widths)
        .header(header)
        .row_highlight_style(theme.highlight_style())
}
