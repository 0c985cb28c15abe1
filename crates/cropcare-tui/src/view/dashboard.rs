use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use cropcare_core::dashboard::{CropHealthView, WeatherView};

use crate::app::App;
use crate::model::Loadable;
use crate::theme::Theme;
use crate::view::{page_layout, render_footer, render_header, spinner_char};

const BAR_WIDTH: usize = 20;

/// Render the dashboard: weather card and crop-health card side by side.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let (header, body, footer) = page_layout(f.area());
    render_header(f, header, app);

    let columns = if body.width >= 90 {
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(body)
    } else {
        Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).split(body)
    };

    render_weather(f, columns[0], &app.dashboard.weather, app.tick, theme);
    render_crop_health(f, columns[1], &app.dashboard.crop_health, app.tick, theme);

    render_footer(f, footer, "r:refresh  p:predict  h:history  t:theme  ?:help  q:quit", theme);
}

fn card<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(title)
}

fn placeholder<T>(state: &Loadable<T>, what: &str, tick: usize, theme: &Theme) -> Option<Vec<Line<'static>>> {
    match state {
        Loadable::Loading => Some(vec![Line::from(Span::styled(
            format!(" {} Loading {what}…", spinner_char(tick)),
            Style::default().fg(theme.dim),
        ))]),
        Loadable::Failed(error) => Some(vec![
            Line::from(Span::styled(
                format!(" Unable to load {what}"),
                Style::default().fg(theme.diseased).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!(" {error}"), Style::default().fg(theme.dim))),
        ]),
        Loadable::Ready(_) => None,
    }
}

fn render_weather(f: &mut Frame, area: Rect, state: &Loadable<WeatherView>, tick: usize, theme: &Theme) {
    let lines = match state.ready() {
        Some(view) => weather_lines(view, theme),
        None => lines_or_empty(placeholder(state, "weather data", tick, theme)),
    };
    f.render_widget(
        Paragraph::new(lines)
            .block(card(" Weather ", theme))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn lines_or_empty(lines: Option<Vec<Line<'static>>>) -> Vec<Line<'static>> {
    lines.unwrap_or_default()
}

fn weather_lines(view: &WeatherView, theme: &Theme) -> Vec<Line<'static>> {
    let label = |s: &str| Span::styled(format!(" {s:<12}"), Style::default().fg(theme.dim));
    let value = |s: String| Span::styled(s, Style::default().fg(theme.text));

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {}", view.temp),
                Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", view.description), Style::default().fg(theme.text)),
        ]),
        Line::from(vec![label("Location"), value(view.location.clone())]),
        Line::from(vec![label("Humidity"), value(view.humidity.clone())]),
        Line::from(vec![label("Wind"), value(view.wind.clone())]),
    ];
    if let Some(visibility) = &view.visibility {
        lines.push(Line::from(vec![label("Visibility"), value(visibility.clone())]));
    }
    if let Some(rainfall) = &view.rainfall {
        lines.push(Line::from(vec![label("Rainfall"), value(rainfall.clone())]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Forecast",
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    )));
    for day in &view.forecast {
        lines.push(Line::from(vec![
            Span::styled(format!("   {:<5}", day.weekday), Style::default().fg(theme.dim)),
            Span::styled(format!("{:<7}", day.temp), Style::default().fg(theme.text)),
            Span::styled(day.condition.clone(), Style::default().fg(theme.text)),
        ]));
    }

    if view.rain_advisory {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Rain expected: delay spraying and check drainage.",
            Style::default().fg(theme.warning),
        )));
    }
    lines
}

fn render_crop_health(
    f: &mut Frame,
    area: Rect,
    state: &Loadable<CropHealthView>,
    tick: usize,
    theme: &Theme,
) {
    let lines = match state.ready() {
        None => lines_or_empty(placeholder(state, "crop health", tick, theme)),
        Some(view) if view.rows.is_empty() => vec![Line::from(Span::styled(
            " No crop data available",
            Style::default().fg(theme.dim),
        ))],
        Some(view) => health_lines(view, theme),
    };
    f.render_widget(
        Paragraph::new(lines).block(card(" Crop Health ", theme)),
        area,
    );
}

fn health_lines(view: &CropHealthView, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = view
        .rows
        .iter()
        .map(|row| {
            let filled = (row.percent.min(100) as usize * BAR_WIDTH) / 100;
            let color = theme.health_color(row.class);
            Line::from(vec![
                Span::styled(format!(" {:<12}", row.label), Style::default().fg(theme.text)),
                Span::styled("█".repeat(filled), Style::default().fg(color)),
                Span::styled("░".repeat(BAR_WIDTH - filled), Style::default().fg(theme.dim)),
                Span::styled(format!(" {}%", row.percent), Style::default().fg(color)),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    let alert_style = if view.alerts > 0 {
        Style::default().fg(theme.diseased).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.healthy)
    };
    lines.push(Line::from(Span::styled(
        format!(" Disease alerts: {}", view.alerts),
        alert_style,
    )));
    lines
}
