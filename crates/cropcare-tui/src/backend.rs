use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use cropcare_core::workflow::run_prediction;
use cropcare_core::{ApiClient, ClientError, ImageFile, LoadError};

use crate::model::auth::AuthTab;
use crate::tui_event::BackendEvent;

/// Work the app asks the runtime to do off the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Authenticate {
        tab: AuthTab,
        username: String,
        password: String,
    },
    Predict(ImageFile),
    LoadWeather,
    LoadCropHealth,
    LoadHistory,
    LoadFile(PathBuf),
}

/// Spawn a task for `command`; its outcome arrives on `tx`.
pub fn spawn(
    command: Command,
    client: ApiClient,
    tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    tokio::spawn(async move {
        run(command, &client, &tx, cancel).await;
    });
}

async fn run(
    command: Command,
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    let event = match command {
        Command::Authenticate {
            tab,
            username,
            password,
        } => {
            let outcome = match tab {
                AuthTab::Login => client.login(&username, &password).await,
                AuthTab::Register => client.register(&username, &password).await,
            };
            BackendEvent::Auth {
                tab,
                outcome: outcome.map_err(|e| auth_error_message(tab, &e)),
            }
        }
        Command::Predict(file) => {
            let progress_tx = tx.clone();
            let on_event = move |event| {
                let _ = progress_tx.send(BackendEvent::Workflow(event));
            };
            // Completion and failure are reported through `on_event`.
            let _ = run_prediction(client, &file, on_event, cancel).await;
            return;
        }
        Command::LoadWeather => {
            BackendEvent::Weather(client.weather(None).await.map_err(|e| e.to_string()))
        }
        Command::LoadCropHealth => {
            BackendEvent::CropHealth(client.crop_health().await.map_err(|e| e.to_string()))
        }
        Command::LoadHistory => {
            BackendEvent::History(client.history().await.map_err(|e| e.to_string()))
        }
        Command::LoadFile(path) => {
            let loaded = tokio::task::spawn_blocking(move || {
                ImageFile::from_path(&path).map_err(|e| match e {
                    LoadError::Invalid(invalid) => invalid.to_string(),
                    LoadError::Io(io) => format!("Cannot read {}: {io}", path.display()),
                })
            })
            .await
            .unwrap_or_else(|e| Err(format!("Task join error: {e}")));
            BackendEvent::FileLoaded(loaded)
        }
    };
    let _ = tx.send(event);
}

/// Server rejections are shown verbatim; anything else gets a generic line.
fn auth_error_message(tab: AuthTab, err: &ClientError) -> String {
    match err {
        ClientError::Rejected(msg) => msg.clone(),
        _ => {
            log::warn!("{} request failed: {err}", tab.label());
            match tab {
                AuthTab::Login => "An error occurred during login. Please try again.".to_string(),
                AuthTab::Register => "An error occurred during registration".to_string(),
            }
        }
    }
}
