// ============================================
// src/error.rs
// Error types; only MissingFields shows up in normal use
// ============================================

use std::path::PathBuf;

use thiserror::Error;

use crate::form::Field;

pub const MISSING_FIELDS_MESSAGE: &str =
    "Please fill out all fields before generating an activity.";

pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate activity. Please try again.";

#[derive(Error, Debug)]
pub enum AppError {
    /// One or more form fields were empty.
    #[error("{}", MISSING_FIELDS_MESSAGE)]
    MissingFields(Vec<Field>),

    /// The generation service failed upstream.
    #[error("{}", GENERATION_FAILED_MESSAGE)]
    GenerationFailed(String),

    /// A generation is already in flight.
    #[error("An activity is already being generated")]
    Busy,

    #[error("Invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
}

impl AppError {
    /// Process exit code for one-shot commands.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::MissingFields(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
