use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};

use cropcare_core::upload::UploadState;
use cropcare_core::view::ResultView;

use crate::app::App;
use crate::theme::Theme;
use crate::view::{page_layout, render_footer, render_header, spinner_char, truncate};

/// Render the predict screen; which panels show follows the upload state.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let (header, body, footer) = page_layout(f.area());
    render_header(f, header, app);

    let panels = app.state.panels();
    let mut constraints = Vec::new();
    if panels.upload {
        constraints.push(Constraint::Length(if panels.preview { 9 } else { 7 }));
    }
    if panels.loading {
        constraints.push(Constraint::Length(3));
    }
    if panels.results {
        constraints.push(Constraint::Min(14));
    }
    constraints.push(Constraint::Min(0));
    let chunks = Layout::vertical(constraints).split(body);

    let mut slot = 0;
    if panels.upload {
        render_upload(f, chunks[slot], app, theme);
        slot += 1;
    }
    if panels.loading {
        render_loading(f, chunks[slot], app, theme);
        slot += 1;
    }
    if panels.results {
        if let UploadState::Completed { preview, result, .. } = app.state.upload() {
            let view = ResultView::from_prediction(result, Some(&preview.data_url));
            render_results(f, chunks[slot], &view, app.confidence_revealed(Instant::now()), theme);
        }
    }

    let hints = match app.state.upload() {
        UploadState::Idle => "o:open image  drop file:select  Esc:back  ?:help  q:quit",
        UploadState::PreviewReady { .. } | UploadState::Failed { .. } => {
            "Enter:analyze  x:remove  o:other image  Esc:back  ?:help  q:quit"
        }
        UploadState::Uploading { .. } => "analyzing…  ?:help  q:quit",
        UploadState::Completed { .. } => "a:analyze another  e:save report  Esc:back  ?:help  q:quit",
    };
    render_footer(f, footer, hints, theme);
}

fn render_upload(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let mut lines = Vec::new();
    if let Some(prompt) = &app.file_prompt {
        lines.push(Line::from(vec![
            Span::styled(" Image path: ", Style::default().fg(theme.active).add_modifier(Modifier::BOLD)),
            Span::styled(format!("{prompt}▏"), Style::default().fg(theme.text)),
        ]));
        lines.push(Line::from(Span::styled(
            " Enter to load, Esc to cancel",
            Style::default().fg(theme.dim),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            " Drop a leaf photo onto this window, or press o to type its path.",
            Style::default().fg(theme.text),
        )));
        lines.push(Line::from(Span::styled(
            " JPG or PNG, up to 10MB.",
            Style::default().fg(theme.dim),
        )));
    }

    if let (Some(file), Some(preview)) = (app.state.upload().file(), app.state.upload().preview()) {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Selected: ", Style::default().fg(theme.dim)),
            Span::styled(
                truncate(&preview.name, (area.width as usize).saturating_sub(30)),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  ({})", preview.size_label), Style::default().fg(theme.dim)),
        ]));
        lines.push(Line::from(Span::styled(
            format!(" {}  ·  preview {} bytes encoded", file.mime, preview.data_url.len()),
            Style::default().fg(theme.dim),
        )));
    }
    if let UploadState::Failed { message, .. } = app.state.upload() {
        lines.push(Line::from(Span::styled(
            format!(" Last attempt failed: {message}"),
            Style::default().fg(theme.diseased),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Upload ");
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn render_loading(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let percent = app.state.progress();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Analyzing "),
        )
        .gauge_style(Style::default().fg(theme.active))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{} {}%", spinner_char(app.tick), percent.round()));
    f.render_widget(gauge, area);
}

fn render_results(f: &mut Frame, area: Rect, view: &ResultView, revealed: bool, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Analysis Results ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(3), // summary
        Constraint::Length(1), // confidence bar
        Constraint::Length(1), // severity bar
        Constraint::Length(1),
        Constraint::Min(3),    // recommendations
    ])
    .split(inner);

    let health_color = if view.health_class == "healthy" {
        theme.healthy
    } else {
        theme.diseased
    };
    let icon = if view.health_class == "healthy" { "✓" } else { "⚠" };
    let summary = vec![
        Line::from(vec![
            Span::styled(format!(" {icon} {}", view.health_label), Style::default().fg(health_color).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled(" Prediction: ", Style::default().fg(theme.dim)),
            Span::styled(view.prediction.clone(), Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled(" Crop type:  ", Style::default().fg(theme.dim)),
            Span::styled(view.crop_type.clone(), Style::default().fg(theme.text)),
        ]),
    ];
    f.render_widget(Paragraph::new(summary), chunks[0]);

    // The bar starts empty and fills once the reveal delay has passed.
    let confidence = if revealed { view.confidence_percent / 100.0 } else { 0.0 };
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(theme.active))
            .ratio(confidence.clamp(0.0, 1.0))
            .label(format!("Confidence {}", view.confidence_label)),
        chunks[1],
    );

    let severity = view.severity;
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(theme.severity_color(severity.level)))
            .percent(u16::from(severity.indicator_percent))
            .label(format!("Severity {}", severity.level.label())),
        chunks[2],
    );

    let mut recs = vec![Line::from(Span::styled(
        format!(" {}", view.recommendations_heading),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    ))];
    recs.extend(view.recommendations.iter().map(|r| {
        Line::from(Span::styled(format!("   • {r}"), Style::default().fg(theme.text)))
    }));
    if let Some(source) = &view.image_source {
        if !source.starts_with("data:") {
            recs.push(Line::from(Span::styled(
                format!(" Image: {source}"),
                Style::default().fg(theme.dim),
            )));
        }
    }
    f.render_widget(Paragraph::new(recs).wrap(Wrap { trim: false }), chunks[4]);
}
