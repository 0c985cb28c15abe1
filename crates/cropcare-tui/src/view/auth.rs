use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use cropcare_core::validation::MatchState;

use crate::app::App;
use crate::model::auth::{AuthField, AuthForm, AuthTab};
use crate::theme::Theme;
use crate::view::{centered_rect, render_footer, spinner_char};

/// Render the login / registration form.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let form = &app.auth;
    let area = f.area();
    let height = if form.tab == AuthTab::Register { 24 } else { 15 };
    let card = centered_rect(56, height, area);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
    render_footer(
        f,
        chunks[1],
        "Tab:next field  Ctrl+t:login/register  Ctrl+p:show password  Enter:submit  Ctrl+c:quit",
        theme,
    );

    let mut lines = vec![tabs_line(form.tab, theme), Line::from("")];
    lines.push(field_line("Username", &form.username, form.focus == AuthField::Username, theme));
    lines.push(field_line(
        "Password",
        &form.masked(&form.password),
        form.focus == AuthField::Password,
        theme,
    ));

    if form.tab == AuthTab::Register {
        lines.push(field_line(
            "Confirm",
            &form.masked(&form.confirm),
            form.focus == AuthField::Confirm,
            theme,
        ));
        lines.extend(match_line(form, theme));
        lines.push(Line::from(""));
        let strength = form.strength();
        for (label, ok) in strength.criteria.checklist() {
            let (mark, color) = if ok { ("✓", theme.healthy) } else { ("✗", theme.dim) };
            lines.push(Line::from(vec![
                Span::styled(format!("   {mark} "), Style::default().fg(color)),
                Span::styled(label, Style::default().fg(color)),
            ]));
        }
        if !form.password.is_empty() && !strength.satisfied {
            lines.push(Line::from(Span::styled(
                format!("   {}", strength.message()),
                Style::default().fg(theme.warning),
            )));
        }
    }

    lines.push(Line::from(""));
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(theme.diseased).add_modifier(Modifier::BOLD),
        )));
    }
    if let Some(success) = &form.success {
        lines.push(Line::from(Span::styled(
            format!(" {success}"),
            Style::default().fg(theme.healthy).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(button_line(form, app.tick, theme));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" CropCare ")
        .title_bottom(Line::from(format!(" {} ", app.base_url)).right_aligned());
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), card);
}

fn tabs_line(active: AuthTab, theme: &Theme) -> Line<'static> {
    let tab = |tab: AuthTab| {
        let style = if tab == active {
            theme.header_style()
        } else {
            Style::default().fg(theme.dim)
        };
        Span::styled(format!(" {} ", tab.label()), style)
    };
    Line::from(vec![Span::raw(" "), tab(AuthTab::Login), Span::raw("  "), tab(AuthTab::Register)])
}

fn field_line(label: &str, value: &str, focused: bool, theme: &Theme) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(theme.active).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim)
    };
    let cursor = if focused { "▏" } else { "" };
    Line::from(vec![
        Span::styled(format!(" {label:<10}"), label_style),
        Span::styled(format!("{value}{cursor}"), Style::default().fg(theme.text)),
    ])
}

fn match_line(form: &AuthForm, theme: &Theme) -> Option<Line<'static>> {
    let color = match form.match_state() {
        MatchState::Neutral => return None,
        MatchState::Match => theme.healthy,
        MatchState::Mismatch => theme.diseased,
    };
    Some(Line::from(Span::styled(
        format!("           {}", form.match_state().message()),
        Style::default().fg(color),
    )))
}

fn button_line(form: &AuthForm, tick: usize, theme: &Theme) -> Line<'static> {
    let label = form.tab.label();
    if form.submitting {
        return Line::from(Span::styled(
            format!(" {} {label}…", spinner_char(tick)),
            Style::default().fg(theme.active),
        ));
    }
    let style = if form.can_submit() {
        theme.header_style()
    } else {
        Style::default().fg(theme.dim)
    };
    Line::from(vec![Span::raw(" "), Span::styled(format!(" [ {label} ] "), style)])
}
