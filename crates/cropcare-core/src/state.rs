use crate::notify::NotificationCenter;
use crate::theme::{PreferenceError, ThemeMode, ThemeService};
use crate::upload::{ImageFile, Panels, TransitionError, UploadEvent, UploadState};
use crate::workflow::{MSG_SUCCESS, WorkflowEvent};
use crate::PredictionResult;

/// Session-wide UI state, owned by the frontend's event loop.
#[derive(Debug)]
pub struct AppState {
    pub theme: ThemeService,
    pub notifications: NotificationCenter,
    upload: UploadState,
    progress: f64,
    loading_hidden: bool,
    /// Most recent prediction, read by the report exporter.
    last_result: Option<PredictionResult>,
}

impl AppState {
    pub fn new(theme: ThemeService) -> Self {
        Self {
            theme,
            notifications: NotificationCenter::new(),
            upload: UploadState::Idle,
            progress: 0.0,
            loading_hidden: false,
            last_result: None,
        }
    }

    pub fn upload(&self) -> &UploadState {
        &self.upload
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn last_result(&self) -> Option<&PredictionResult> {
        self.last_result.as_ref()
    }

    pub fn panels(&self) -> Panels {
        let mut panels = self.upload.panels();
        if self.loading_hidden {
            panels.loading = false;
        }
        panels
    }

    /// Select a file; invalid files raise an error toast. Returns whether the
    /// preview is now showing this file.
    pub fn select_file(&mut self, file: ImageFile) -> bool {
        match self.upload.apply(UploadEvent::Select(file)) {
            Ok(()) => true,
            Err(e) => {
                self.notifications.error(e.to_string());
                false
            }
        }
    }

    pub fn remove_file(&mut self) -> Result<(), TransitionError> {
        self.upload.apply(UploadEvent::Remove)
    }

    /// Move to `Uploading` and hand back the file to send.
    pub fn submit(&mut self) -> Result<ImageFile, TransitionError> {
        self.upload.apply(UploadEvent::Submit)?;
        self.progress = 0.0;
        self.loading_hidden = false;
        // Uploading always carries its file.
        self.upload
            .file()
            .cloned()
            .ok_or(TransitionError::NotAllowed {
                state: "uploading",
                event: "submit",
            })
    }

    pub fn on_workflow_event(&mut self, event: WorkflowEvent) {
        match event {
            WorkflowEvent::Progress(percent) => self.progress = percent,
            WorkflowEvent::LoadingHidden => self.loading_hidden = true,
            WorkflowEvent::Completed(result) => {
                if let Err(e) = self.upload.apply(UploadEvent::Succeeded(result.clone())) {
                    log::warn!("dropping stale prediction: {e}");
                    return;
                }
                self.last_result = Some(result);
                self.loading_hidden = false;
                self.notifications.success(MSG_SUCCESS);
            }
            WorkflowEvent::Failed(message) => {
                if let Err(e) = self.upload.apply(UploadEvent::Failed(message.clone())) {
                    log::warn!("dropping stale failure: {e}");
                    return;
                }
                self.progress = 0.0;
                self.loading_hidden = false;
                self.notifications.error(message);
            }
        }
    }

    /// Back to an empty upload panel; forgets the cached result.
    pub fn analyze_another(&mut self) -> Result<(), TransitionError> {
        self.upload.apply(UploadEvent::AnalyzeAnother)?;
        self.last_result = None;
        self.progress = 0.0;
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        match self.theme.toggle() {
            Ok(mode) => mode,
            Err(e) => {
                self.report_preference_error(&e);
                self.theme.mode()
            }
        }
    }

    fn report_preference_error(&mut self, e: &PreferenceError) {
        log::warn!("failed to save theme: {e}");
        self.notifications
            .warning(format!("Theme changed but could not be saved: {e}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NotificationKind;
    use crate::theme::MemoryStore;
    use crate::workflow::MSG_NETWORK_ERROR;

    fn state() -> AppState {
        AppState::new(ThemeService::load(Box::new(MemoryStore::default()), false))
    }

    fn leaf() -> ImageFile {
        ImageFile::new("leaf.png", "image/png", vec![1, 2, 3])
    }

    fn healthy() -> PredictionResult {
        PredictionResult {
            prediction: "Grape Healthy".into(),
            confidence: 97.0,
            crop_type: "Grape".into(),
            is_healthy: true,
            image_url: None,
        }
    }

    #[test]
    fn completed_prediction_is_cached_and_announced() {
        let mut app = state();
        assert!(app.select_file(leaf()));
        let file = app.submit().unwrap();
        assert_eq!(file.name, "leaf.png");

        app.on_workflow_event(WorkflowEvent::Progress(42.0));
        assert_eq!(app.progress(), 42.0);
        app.on_workflow_event(WorkflowEvent::Progress(100.0));
        app.on_workflow_event(WorkflowEvent::LoadingHidden);
        assert!(!app.panels().loading);

        app.on_workflow_event(WorkflowEvent::Completed(healthy()));
        assert_eq!(app.last_result().unwrap().crop_type, "Grape");
        assert!(app.panels().results);
        assert_eq!(app.notifications.active()[0].kind, NotificationKind::Success);
    }

    #[test]
    fn analyze_another_clears_cache() {
        let mut app = state();
        app.select_file(leaf());
        app.submit().unwrap();
        app.on_workflow_event(WorkflowEvent::Completed(healthy()));
        app.analyze_another().unwrap();
        assert!(app.last_result().is_none());
        assert!(app.upload().file().is_none());
        assert!(app.panels().upload);
    }

    #[test]
    fn double_submit_is_refused() {
        let mut app = state();
        app.select_file(leaf());
        app.submit().unwrap();
        assert_eq!(app.submit().unwrap_err(), TransitionError::UploadInFlight);
    }

    #[test]
    fn failure_notifies_and_restores_upload_panel() {
        let mut app = state();
        app.select_file(leaf());
        app.submit().unwrap();
        app.on_workflow_event(WorkflowEvent::Failed(MSG_NETWORK_ERROR.into()));
        let toast = &app.notifications.active()[0];
        assert_eq!(toast.kind, NotificationKind::Error);
        assert_eq!(toast.message, MSG_NETWORK_ERROR);
        assert!(app.panels().upload && app.panels().preview);
        assert!(app.last_result().is_none());
    }

    #[test]
    fn invalid_selection_raises_error_toast() {
        let mut app = state();
        assert!(!app.select_file(ImageFile::new("a.gif", "image/gif", vec![0])));
        assert_eq!(
            app.notifications.active()[0].message,
            "Please select a valid image file (JPG, PNG)"
        );
    }

    #[test]
    fn theme_toggle_through_state() {
        let mut app = state();
        assert_eq!(app.toggle_theme(), ThemeMode::Dark);
        assert_eq!(app.toggle_theme(), ThemeMode::Light);
    }
}
