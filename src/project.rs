use crate::document::TaskStore;
use crate::error::{Result, TaskError};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the task document.
pub const CONFIG_PATH_ENV: &str = "TASK_CONFIG_PATH";

/// Where the task document lives.
///
/// Built explicitly or at the process edge from `TASK_CONFIG_PATH`; the
/// scheduler never reads the environment itself.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub config_path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInfo {
    pub config_path: String,
    pub tasks_count: usize,
    pub subtasks_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks_result_output_dir: Option<String>,
}

impl ProjectContext {
    /// The path must be absolute.
    pub fn new(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_path.into();
        if !config_path.is_absolute() {
            return Err(TaskError::ConfigNotAbsolute(
                config_path.display().to_string(),
            ));
        }
        Ok(Self { config_path })
    }

    /// Read `TASK_CONFIG_PATH` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_env_value(std::env::var(CONFIG_PATH_ENV).ok())
    }

    pub fn from_env_value(value: Option<String>) -> Result<Self> {
        match value {
            Some(path) if !path.is_empty() => Self::new(path),
            _ => Err(TaskError::ConfigMissing),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn store(&self) -> TaskStore {
        TaskStore::new(&self.config_path)
    }

    /// Fail early when the document is missing or not a regular file.
    pub fn validate(&self) -> Result<()> {
        if self.store().exists() {
            Ok(())
        } else {
            Err(TaskError::DocumentNotFound(
                self.config_path.display().to_string(),
            ))
        }
    }

    pub fn info(&self) -> Result<ConfigInfo> {
        let doc = self.store().load()?;
        Ok(ConfigInfo {
            config_path: self.config_path.display().to_string(),
            tasks_count: doc.tasks.len(),
            subtasks_count: doc.subtask_count(),
            tasks_result_output_dir: doc.result_output_dir().ok().map(str::to_string),
        })
    }
}
