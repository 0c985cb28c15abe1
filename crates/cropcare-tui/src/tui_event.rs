use cropcare_core::dashboard::{CropHealth, WeatherReport};
use cropcare_core::workflow::WorkflowEvent;
use cropcare_core::{HistoryTable, ImageFile};

use crate::model::auth::AuthTab;

/// Events flowing from background tasks to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// Progress and outcome of the running prediction.
    Workflow(WorkflowEvent),
    /// Login or registration finished; `Err` carries the message to show.
    Auth {
        tab: AuthTab,
        outcome: Result<(), String>,
    },
    Weather(Result<WeatherReport, String>),
    CropHealth(Result<Vec<CropHealth>, String>),
    History(Result<HistoryTable, String>),
    /// An image path was read from disk.
    FileLoaded(Result<ImageFile, String>),
}
