//! Error types and handling for the travel planner

use thiserror::Error;

/// Main error type for the travel planner
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The query was rejected before any lookup happened
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// Input datasets are corrupt (malformed durations, dangling city references, ...)
    #[error("Data integrity error: {message}")]
    DataIntegrity { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PlannerError {
    /// Create a new invalid query error
    pub fn invalid_query<S: Into<String>>(message: S) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a new data integrity error
    pub fn data_integrity<S: Into<String>>(message: S) -> Self {
        Self::DataIntegrity {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::InvalidQuery { message } => message.clone(),
            PlannerError::DataIntegrity { message } => {
                format!("The travel dataset is corrupt and cannot be used: {message}")
            }
            PlannerError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            PlannerError::Io { .. } => {
                "File operation failed. Please check that the data files exist and are readable."
                    .to_string()
            }
        }
    }
}

impl From<csv::Error> for PlannerError {
    fn from(err: csv::Error) -> Self {
        PlannerError::data_integrity(format!("Malformed CSV: {err}"))
    }
}
