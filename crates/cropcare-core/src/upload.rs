//! Upload workflow state machine.
//!
//! `UploadState` is the single source of truth for which panel is visible.
//! All changes go through [`UploadState::apply`], which also rejects a second
//! submission while one is in flight.

use std::io::Read;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::PredictionResult;
use crate::validation::{
    FileError, MAX_UPLOAD_BYTES, format_file_size, validate_upload, validate_upload_file,
};

/// An image held in memory, ready to preview and upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, inferring its MIME type from the extension.
    /// Type and size are checked against the file's metadata before any
    /// bytes are read.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let mime = mime_from_extension(path);
        let file = std::fs::File::open(path)?;
        let len = file.metadata()?.len();
        validate_upload(mime, len)?;

        // The file may have grown since the metadata check.
        let mut bytes = Vec::with_capacity(len as usize);
        file.take(MAX_UPLOAD_BYTES + 1).read_to_end(&mut bytes)?;
        validate_upload(mime, bytes.len() as u64)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, mime, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// `data:` URL of the bytes, the same thing a browser preview shows.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    pub fn preview(&self) -> Preview {
        Preview {
            name: self.name.clone(),
            size_label: format_file_size(self.size()),
            data_url: self.data_url(),
        }
    }
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("size", &self.bytes.len())
            .finish()
    }
}

pub fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Invalid(#[from] FileError),
}

/// Local preview, built without any network round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub name: String,
    pub size_label: String,
    pub data_url: String,
}

/// Every state past `Idle` carries the file and its preview. The preview is
/// built once, when the file is selected.
#[derive(Debug, Clone, Default)]
pub enum UploadState {
    #[default]
    Idle,
    PreviewReady {
        file: ImageFile,
        preview: Preview,
    },
    Uploading {
        file: ImageFile,
        preview: Preview,
    },
    Completed {
        file: ImageFile,
        preview: Preview,
        result: PredictionResult,
    },
    /// Back on the upload panel with the same file, ready to resubmit.
    Failed {
        file: ImageFile,
        preview: Preview,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub enum UploadEvent {
    Select(ImageFile),
    Remove,
    Submit,
    Succeeded(PredictionResult),
    Failed(String),
    AnalyzeAnother,
}

impl UploadEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Remove => "remove",
            Self::Submit => "submit",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
            Self::AnalyzeAnother => "analyze another",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("an upload is already in progress")]
    UploadInFlight,
    #[error(transparent)]
    InvalidFile(#[from] FileError),
    #[error("cannot {event} while {state}")]
    NotAllowed {
        state: &'static str,
        event: &'static str,
    },
}

/// Which panels a frontend should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Panels {
    pub upload: bool,
    pub preview: bool,
    pub loading: bool,
    pub results: bool,
}

impl UploadState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PreviewReady { .. } => "preview ready",
            Self::Uploading { .. } => "uploading",
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
        }
    }

    /// Apply one event. On error the state is left untouched.
    pub fn apply(&mut self, event: UploadEvent) -> Result<(), TransitionError> {
        let current = std::mem::take(self);
        let from = current.name();
        let label = event.name();

        let (next, outcome) = match (current, event) {
            (Self::Uploading { file, preview }, UploadEvent::Submit | UploadEvent::Select(_)) => {
                (Self::Uploading { file, preview }, Err(TransitionError::UploadInFlight))
            }
            (
                state @ (Self::Idle | Self::PreviewReady { .. } | Self::Failed { .. }),
                UploadEvent::Select(file),
            ) => match validate_upload_file(&file) {
                Ok(()) => {
                    let preview = file.preview();
                    (Self::PreviewReady { file, preview }, Ok(()))
                }
                Err(e) => (state, Err(e.into())),
            },
            (Self::PreviewReady { .. } | Self::Failed { .. }, UploadEvent::Remove) => {
                (Self::Idle, Ok(()))
            }
            (
                Self::PreviewReady { file, preview } | Self::Failed { file, preview, .. },
                UploadEvent::Submit,
            ) => (Self::Uploading { file, preview }, Ok(())),
            (Self::Uploading { file, preview }, UploadEvent::Succeeded(result)) => (
                Self::Completed {
                    file,
                    preview,
                    result,
                },
                Ok(()),
            ),
            (Self::Uploading { file, preview }, UploadEvent::Failed(message)) => (
                Self::Failed {
                    file,
                    preview,
                    message,
                },
                Ok(()),
            ),
            (Self::Completed { .. }, UploadEvent::AnalyzeAnother) => (Self::Idle, Ok(())),
            (state, _) => (
                state,
                Err(TransitionError::NotAllowed {
                    state: from,
                    event: label,
                }),
            ),
        };

        if outcome.is_ok() {
            log::debug!("upload: {from} --{label}--> {}", next.name());
        }
        *self = next;
        outcome
    }

    pub fn panels(&self) -> Panels {
        match self {
            Self::Idle => Panels {
                upload: true,
                ..Panels::default()
            },
            Self::PreviewReady { .. } | Self::Failed { .. } => Panels {
                upload: true,
                preview: true,
                ..Panels::default()
            },
            Self::Uploading { .. } => Panels {
                loading: true,
                ..Panels::default()
            },
            Self::Completed { .. } => Panels {
                results: true,
                ..Panels::default()
            },
        }
    }

    pub fn file(&self) -> Option<&ImageFile> {
        match self {
            Self::Idle => None,
            Self::PreviewReady { file, .. }
            | Self::Uploading { file, .. }
            | Self::Completed { file, .. }
            | Self::Failed { file, .. } => Some(file),
        }
    }

    pub fn preview(&self) -> Option<&Preview> {
        match self {
            Self::Idle => None,
            Self::PreviewReady { preview, .. }
            | Self::Uploading { preview, .. }
            | Self::Completed { preview, .. }
            | Self::Failed { preview, .. } => Some(preview),
        }
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            Self::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self, Self::Uploading { .. })
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::PreviewReady { .. } | Self::Failed { .. })
    }
}
