use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TASK_CONFIG_PATH environment variable is required. Please set it to the full path of your task configuration file.")]
    ConfigMissing,

    #[error("TASK_CONFIG_PATH must be an absolute path. Got: {0}")]
    ConfigNotAbsolute(String),

    #[error("Task configuration file does not exist: {0}")]
    DocumentNotFound(String),

    #[error("{0}")]
    InvalidDocument(String),

    #[error("Invalid status value: {value}. Use one of: {options}")]
    InvalidStatus { value: String, options: String },

    #[error("Task with identifier '{0}' not found")]
    TaskNotFound(String),

    #[error("tasksResultOutputDir is not configured in the task configuration file. Please add it to the meta section.")]
    OutputDirNotConfigured,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl TaskError {
    pub fn to_error_code(&self) -> &'static str {
        match self {
            TaskError::TaskNotFound(_) => "TASK_NOT_FOUND",
            TaskError::InvalidStatus { .. } => "INVALID_STATUS",
            TaskError::InvalidDocument(_) | TaskError::JsonError(_) => "INVALID_DOCUMENT",
            TaskError::DocumentNotFound(_) => "DOCUMENT_NOT_FOUND",
            TaskError::ConfigMissing
            | TaskError::ConfigNotAbsolute(_)
            | TaskError::OutputDirNotConfigured => "CONFIG_ERROR",
            TaskError::IoError(_) => "IO_ERROR",
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            code: self.to_error_code().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            TaskError::TaskNotFound("9".into()).to_error_code(),
            "TASK_NOT_FOUND"
        );
        assert_eq!(TaskError::ConfigMissing.to_error_code(), "CONFIG_ERROR");
        assert_eq!(
            TaskError::InvalidDocument("bad".into()).to_error_code(),
            "INVALID_DOCUMENT"
        );
    }

    #[test]
    fn test_error_response_carries_message() {
        let resp = TaskError::TaskNotFound("auth".into()).to_error_response();
        assert_eq!(resp.code, "TASK_NOT_FOUND");
        assert_eq!(resp.error, "Task with identifier 'auth' not found");
    }
}
