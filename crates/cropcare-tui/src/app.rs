use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;
use cropcare_core::dashboard::{CropHealthView, WeatherView};
use cropcare_core::upload::TransitionError;
use cropcare_core::view::CONFIDENCE_REVEAL_DELAY;
use cropcare_core::workflow::WorkflowEvent;
use cropcare_core::AppState;
use cropcare_reporting::{ReportError, write_history_csv, write_prediction_report};

use crate::action::Action;
use crate::backend::Command;
use crate::input::InputMode;
use crate::model::Loadable;
use crate::model::auth::{AuthForm, AuthTab};
use crate::model::dashboard::DashboardState;
use crate::model::history::HistoryState;
use crate::theme::Theme;
use crate::tui_event::BackendEvent;

/// Pause between "Registration successful" and the dashboard.
pub const REGISTER_REDIRECT_DELAY: Duration = Duration::from_millis(1200);

/// Which screen is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Dashboard,
    Predict,
    History,
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub state: AppState,
    pub theme: Theme,
    pub auth: AuthForm,
    pub dashboard: DashboardState,
    pub history: HistoryState,
    /// Path being typed into the open-image prompt.
    pub file_prompt: Option<String>,
    /// When the results panel appeared; the confidence bar fills after a delay.
    pub result_shown_at: Option<Instant>,
    pub export_dir: PathBuf,
    pub base_url: String,
    pub tick: usize,
    pub should_quit: bool,
    pub show_help: bool,
    redirect_at: Option<Instant>,
    commands: Vec<Command>,
}

impl App {
    pub fn new(state: AppState, base_url: String, export_dir: PathBuf) -> Self {
        let theme = Theme::for_mode(state.theme.mode());
        Self {
            screen: Screen::Auth,
            state,
            theme,
            auth: AuthForm::new(),
            dashboard: DashboardState::default(),
            history: HistoryState::default(),
            file_prompt: None,
            result_shown_at: None,
            export_dir,
            base_url,
            tick: 0,
            should_quit: false,
            show_help: false,
            redirect_at: None,
            commands: Vec::new(),
        }
    }

    /// Start on the dashboard, skipping the login form.
    pub fn skip_login(&mut self) {
        self.open_dashboard();
    }

    pub fn input_mode(&self) -> InputMode {
        if self.show_help {
            return InputMode::Normal;
        }
        match self.screen {
            Screen::Auth => InputMode::Editing,
            Screen::Predict if self.file_prompt.is_some() => InputMode::Editing,
            _ => InputMode::Normal,
        }
    }

    /// Commands queued since the last call, for the runtime to spawn.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn confidence_revealed(&self, now: Instant) -> bool {
        self.result_shown_at
            .is_some_and(|shown| now.duration_since(shown) >= CONFIDENCE_REVEAL_DELAY)
    }

    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // When help overlay is shown, only allow a few actions through
        if self.show_help {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::ToggleHelp | Action::NavigateBack => {
                    self.show_help = false;
                }
                Action::Tick => self.on_tick(Instant::now()),
                _ => {} // swallow everything else
            }
            return false;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::ToggleHelp => self.show_help = true,
            Action::Tick => self.on_tick(Instant::now()),
            Action::ToggleTheme => self.toggle_theme(),
            Action::DismissToast => {
                self.state.notifications.dismiss_latest();
            }
            Action::Resize(..) | Action::None => {}
            other => match self.screen {
                Screen::Auth => self.update_auth(other),
                Screen::Dashboard => self.update_dashboard(other),
                Screen::Predict => self.update_predict(other),
                Screen::History => self.update_history(other),
            },
        }
        false
    }

    fn on_tick(&mut self, now: Instant) {
        self.tick = self.tick.wrapping_add(1);
        self.state.notifications.prune(now);
        if self.redirect_at.is_some_and(|at| now >= at) {
            self.redirect_at = None;
            self.open_dashboard();
        }
    }

    fn toggle_theme(&mut self) {
        let mode = self.state.toggle_theme();
        self.theme = Theme::for_mode(mode);
    }

    /// Screen switches shared by the logged-in screens.
    fn navigate(&mut self, action: &Action) -> bool {
        match action {
            Action::ShowDashboard => self.screen = Screen::Dashboard,
            Action::ShowPredict => self.screen = Screen::Predict,
            Action::ShowHistory => self.open_history(),
            _ => return false,
        }
        true
    }

    fn open_dashboard(&mut self) {
        self.screen = Screen::Dashboard;
        self.dashboard.reload();
        self.commands.push(Command::LoadWeather);
        self.commands.push(Command::LoadCropHealth);
    }

    fn open_history(&mut self) {
        self.screen = Screen::History;
        self.history.table = Loadable::Loading;
        self.history.cursor = 0;
        self.commands.push(Command::LoadHistory);
    }

    fn update_auth(&mut self, action: Action) {
        if self.redirect_at.is_some() {
            return;
        }
        match action {
            Action::Input(c) => self.auth.push(c),
            Action::Paste(text) => text.chars().filter(|c| !c.is_control()).for_each(|c| self.auth.push(c)),
            Action::Backspace => self.auth.pop(),
            Action::NextField => self.auth.next_field(),
            Action::PrevField => self.auth.prev_field(),
            Action::SwitchAuthTab => self.auth.switch_tab(),
            Action::TogglePasswordVisibility => {
                self.auth.show_password = !self.auth.show_password;
            }
            Action::Confirm => {
                if self.auth.submitting || !self.auth.validate() {
                    return;
                }
                self.auth.submitting = true;
                self.commands.push(Command::Authenticate {
                    tab: self.auth.tab,
                    username: self.auth.username.clone(),
                    password: self.auth.password.clone(),
                });
            }
            _ => {}
        }
    }

    fn update_dashboard(&mut self, action: Action) {
        if self.navigate(&action) {
            return;
        }
        if action == Action::Refresh {
            self.open_dashboard();
        }
    }

    fn update_predict(&mut self, action: Action) {
        if let Some(prompt) = self.file_prompt.as_mut() {
            match action {
                Action::Input(c) => prompt.push(c),
                Action::Paste(text) => prompt.push_str(&text),
                Action::Backspace => {
                    prompt.pop();
                }
                Action::Confirm => {
                    let path = self.file_prompt.take().unwrap_or_default();
                    self.load_path(&path);
                }
                Action::NavigateBack => self.file_prompt = None,
                _ => {}
            }
            return;
        }

        if self.navigate(&action) {
            return;
        }
        match action {
            Action::NavigateBack => self.screen = Screen::Dashboard,
            Action::OpenFilePrompt => {
                if !self.state.upload().is_uploading() {
                    self.file_prompt = Some(String::new());
                }
            }
            // A file dropped onto the terminal arrives as its pasted path.
            Action::Paste(text) => self.load_path(&text),
            Action::RemoveFile => {
                if let Err(e) = self.state.remove_file() {
                    log::debug!("remove ignored: {e}");
                }
            }
            Action::Confirm => self.submit(),
            Action::AnalyzeAnother => {
                if self.state.analyze_another().is_ok() {
                    self.result_shown_at = None;
                }
            }
            Action::Export => self.export_report(),
            _ => {}
        }
    }

    fn update_history(&mut self, action: Action) {
        if self.navigate(&action) {
            return;
        }
        match action {
            Action::NavigateBack => self.screen = Screen::Dashboard,
            Action::MoveDown => self.history.move_down(),
            Action::MoveUp => self.history.move_up(),
            Action::Refresh => self.open_history(),
            Action::Export => self.export_history(),
            _ => {}
        }
    }

    fn load_path(&mut self, raw: &str) {
        if self.state.upload().is_uploading() {
            self.state
                .notifications
                .warning(TransitionError::UploadInFlight.to_string());
            return;
        }
        match dropped_path(raw) {
            Some(path) => self.commands.push(Command::LoadFile(path)),
            None => log::debug!("ignoring empty path"),
        }
    }

    fn submit(&mut self) {
        match self.state.submit() {
            Ok(file) => {
                self.result_shown_at = None;
                self.commands.push(Command::Predict(file));
            }
            Err(TransitionError::UploadInFlight) => {
                self.state
                    .notifications
                    .warning(TransitionError::UploadInFlight.to_string());
            }
            Err(e) => log::debug!("submit ignored: {e}"),
        }
    }

    fn export_report(&mut self) {
        let today = Local::now().date_naive();
        match write_prediction_report(self.state.last_result(), &self.export_dir, today) {
            Ok(Some(path)) => {
                self.state
                    .notifications
                    .success(format!("Report saved to {}", path.display()));
            }
            Ok(None) => {}
            Err(e) => {
                self.state.notifications.error(e.to_string());
            }
        }
    }

    fn export_history(&mut self) {
        let Some(table) = self.history.table.ready() else {
            return;
        };
        let today = Local::now().date_naive();
        match write_history_csv(table, &self.export_dir, today) {
            Ok(path) => {
                self.state
                    .notifications
                    .success(format!("History saved to {}", path.display()));
            }
            Err(ReportError::MissingData(_)) => {
                self.state.notifications.info("No history to export yet");
            }
            Err(e) => {
                self.state.notifications.error(e.to_string());
            }
        }
    }

    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Workflow(event) => {
                if matches!(event, WorkflowEvent::Completed(_)) {
                    self.result_shown_at = Some(Instant::now());
                }
                self.state.on_workflow_event(event);
            }
            BackendEvent::Auth { tab, outcome } => {
                self.auth.submitting = false;
                match (tab, outcome) {
                    (_, Err(message)) => self.auth.error = Some(message),
                    (AuthTab::Login, Ok(())) => {
                        log::info!("logged in as {}", self.auth.username);
                        self.open_dashboard();
                    }
                    (AuthTab::Register, Ok(())) => {
                        log::info!("registered {}", self.auth.username);
                        self.auth.success =
                            Some("Registration successful! Redirecting to dashboard...".into());
                        self.redirect_at = Some(Instant::now() + REGISTER_REDIRECT_DELAY);
                    }
                }
            }
            BackendEvent::Weather(report) => {
                self.dashboard.weather =
                    Loadable::from_result(report.map(|r| WeatherView::from_report(&r)));
            }
            BackendEvent::CropHealth(rows) => {
                self.dashboard.crop_health =
                    Loadable::from_result(rows.map(|r| CropHealthView::from_rows(&r)));
            }
            BackendEvent::History(table) => {
                self.history.table = Loadable::from_result(table);
                self.history.cursor = 0;
            }
            BackendEvent::FileLoaded(Ok(file)) => {
                self.state.select_file(file);
            }
            BackendEvent::FileLoaded(Err(message)) => {
                self.state.notifications.error(message);
            }
        }
    }

    /// Render the current screen.
    pub fn view(&self, f: &mut ratatui::Frame) {
        f.render_widget(
            ratatui::widgets::Block::default().style(self.theme.base_style()),
            f.area(),
        );
        match self.screen {
            Screen::Auth => crate::view::auth::render(f, self),
            Screen::Dashboard => crate::view::dashboard::render(f, self),
            Screen::Predict => crate::view::predict::render(f, self),
            Screen::History => crate::view::history::render(f, self),
        }

        crate::view::toast::render(f, self);
        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
    }
}

/// Turn pasted text into a path: trims whitespace and surrounding quotes,
/// and strips a `file://` prefix.
pub fn dropped_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim().trim_matches(|c| c == '\'' || c == '"');
    let trimmed = trimmed.strip_prefix("file://").unwrap_or(trimmed);
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
