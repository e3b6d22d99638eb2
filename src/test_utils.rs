#[cfg(test)]
pub mod test_helpers {
    use crate::document::models::{Item, Task, TaskDocument};
    use crate::document::TaskStore;
    use crate::project::ProjectContext;
    use serde_json::Value;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// A task document written to a temporary directory.
    pub struct TestContext {
        pub path: PathBuf,
        pub _temp_dir: TempDir,
    }

    impl TestContext {
        pub fn new(doc: &TaskDocument) -> Self {
            Self::with_json(serde_json::to_value(doc).unwrap())
        }

        pub fn with_json(value: Value) -> Self {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("tasks.json");
            std::fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();

            Self {
                path,
                _temp_dir: temp_dir,
            }
        }

        pub fn project(&self) -> ProjectContext {
            ProjectContext::new(&self.path).unwrap()
        }

        pub fn store(&self) -> TaskStore {
            TaskStore::new(&self.path)
        }

        pub fn read_json(&self) -> Value {
            serde_json::from_str(&std::fs::read_to_string(&self.path).unwrap()).unwrap()
        }
    }

    pub fn task(number: i64, key: Option<&str>) -> Task {
        let mut item = Item::new(number.into()).with_title(&format!("Task {}", number));
        if let Some(key) = key {
            item = item.with_key(key);
        }
        Task::new(item)
    }

    pub fn subtask(number: &str, key: Option<&str>) -> Item {
        let mut item = Item::new(number.parse().unwrap());
        if let Some(key) = key {
            item = item.with_key(key);
        }
        item
    }

    /// An item with no `number`, as hand-edited documents sometimes carry.
    pub fn unnumbered(key: Option<&str>) -> Item {
        let mut item = Item::new(0.into()).with_title("Note");
        item.number = None;
        if let Some(key) = key {
            item = item.with_key(key);
        }
        item
    }
}
