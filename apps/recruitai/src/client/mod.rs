// Screening form controller.
// Headless model of the upload form: file selection, submission, results and export.
// State is owned by `ScreeningForm`; views are plain data rendered through `markup`.

pub mod api;
pub mod controller;
pub mod drop_zone;
pub mod export;
pub mod files;
pub mod instructions;
pub mod markup;
pub mod notify;
pub mod progress;
pub mod render;
pub mod selection;

use thiserror::Error;

pub use api::{HttpScreeningApi, ScreeningApi};
pub use controller::ScreeningForm;

pub const GENERIC_FAILURE_MESSAGE: &str = "Screening failed. Please try again.";

/// Everything that can go wrong on the form. None of these is fatal; each is
/// shown in the error toast and the form stays usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// A required file is missing; no request is sent.
    #[error("{0}")]
    Validation(String),

    #[error("\"{name}\" is not supported. Use PDF, DOCX, or TXT.")]
    UnsupportedFileType { name: String },

    /// The service answered with a failure status or an `error` body.
    #[error("{0}")]
    RequestFailure(String),

    /// The request never produced a decodable answer.
    #[error("{0}")]
    Transport(String),
}
