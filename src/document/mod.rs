pub mod models;

use crate::error::{Result, TaskError};
use models::TaskDocument;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Reads and writes the task document wholesale.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if the document exists and is a regular file.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> Result<TaskDocument> {
        if !self.exists() {
            return Err(TaskError::DocumentNotFound(self.path.display().to_string()));
        }

        let content = std::fs::read_to_string(&self.path)?;
        let doc = parse_document(&content, &self.path)?;
        tracing::debug!(
            path = %self.path.display(),
            tasks = doc.tasks.len(),
            subtasks = doc.subtask_count(),
            "Loaded task document"
        );
        Ok(doc)
    }

    pub fn save(&self, doc: &TaskDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, content).map_err(|e| {
            TaskError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to save task configuration: {}", e),
            ))
        })?;
        tracing::debug!(path = %self.path.display(), "Saved task document");
        Ok(())
    }
}

/// Parse a task document, requiring a top-level `tasks` array.
pub fn parse_document(content: &str, path: &Path) -> Result<TaskDocument> {
    let value: Value = serde_json::from_str(content).map_err(|_| {
        TaskError::InvalidDocument(format!(
            "Invalid JSON format in configuration file: {}",
            path.display()
        ))
    })?;

    if !value.get("tasks").is_some_and(Value::is_array) {
        return Err(TaskError::InvalidDocument(
            "Configuration file must contain a \"tasks\" array".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| {
        TaskError::InvalidDocument(format!("Invalid task structure in {}: {}", path.display(), e))
    })
}
