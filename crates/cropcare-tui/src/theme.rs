use ratatui::style::{Color, Modifier, Style};

use cropcare_core::NotificationKind;
use cropcare_core::ThemeMode;
use cropcare_core::dashboard::HealthClass;
use cropcare_core::view::SeverityLevel;

/// Color palette for the TUI.
pub struct Theme {
    pub healthy: Color,
    pub diseased: Color,
    pub warning: Color,
    pub info: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub background: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    pub fn dark() -> Self {
        Self {
            healthy: Color::Green,
            diseased: Color::Red,
            warning: Color::Yellow,
            info: Color::Cyan,

            header_fg: Color::Black,
            header_bg: Color::Green,
            border: Color::DarkGray,
            text: Color::White,
            dim: Color::DarkGray,
            background: Color::Reset,
            highlight_bg: Color::Rgb(30, 50, 30),
            active: Color::Cyan,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    pub fn light() -> Self {
        Self {
            healthy: Color::Rgb(22, 128, 61),
            diseased: Color::Rgb(185, 28, 28),
            warning: Color::Rgb(180, 83, 9),
            info: Color::Rgb(29, 78, 216),

            header_fg: Color::White,
            header_bg: Color::Rgb(22, 128, 61),
            border: Color::Gray,
            text: Color::Black,
            dim: Color::Rgb(100, 116, 139),
            background: Color::Rgb(248, 250, 252),
            highlight_bg: Color::Rgb(220, 252, 231),
            active: Color::Rgb(21, 94, 117),
            footer_fg: Color::Rgb(100, 116, 139),
            footer_bg: Color::Rgb(248, 250, 252),
        }
    }

    pub fn notification_color(&self, kind: NotificationKind) -> Color {
        match kind {
            NotificationKind::Success => self.healthy,
            NotificationKind::Error => self.diseased,
            NotificationKind::Warning => self.warning,
            NotificationKind::Info => self.info,
        }
    }

    pub fn health_color(&self, class: HealthClass) -> Color {
        match class {
            HealthClass::Good => self.healthy,
            HealthClass::Warn => self.warning,
            HealthClass::Bad => self.diseased,
        }
    }

    pub fn severity_color(&self, level: SeverityLevel) -> Color {
        match level {
            SeverityLevel::None => self.healthy,
            SeverityLevel::Low => self.info,
            SeverityLevel::Moderate => self.warning,
            SeverityLevel::High => self.diseased,
        }
    }

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header_fg).bg(self.header_bg).add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default().bg(self.highlight_bg).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}

/// Guess the terminal's color scheme from `COLORFGBG` ("fg;bg").
/// Background indices 0-6 and 8 are dark.
pub fn system_prefers_dark(colorfgbg: Option<&str>) -> bool {
    let Some(bg) = colorfgbg.and_then(|v| v.rsplit(';').next()) else {
        return true;
    };
    match bg.trim().parse::<u8>() {
        Ok(n) => n <= 6 || n == 8,
        Err(_) => true,
    }
}
