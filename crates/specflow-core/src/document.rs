use crate::error::{Result, SpecError};
use crate::io;
use crate::paths;
use crate::task::{self, ParsedTasks};
use crate::types::TaskStatus;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The `tasks.md` of one spec, held as raw text.
///
/// Every read-modify-write goes through [`TaskDocument::set_status`], which
/// touches only the checkbox line of the target task.
#[derive(Debug, Clone)]
pub struct TaskDocument {
    pub spec: String,
    pub path: PathBuf,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub task_id: String,
    pub previous: TaskStatus,
    pub current: TaskStatus,
    pub changed: bool,
}

impl TaskDocument {
    pub fn load(root: &Path, spec: &str) -> Result<Self> {
        paths::validate_spec_name(spec)?;
        if !paths::spec_dir(root, spec).is_dir() {
            return Err(SpecError::SpecNotFound(spec.to_string()));
        }
        let path = paths::tasks_path(root, spec);
        if !path.exists() {
            return Err(SpecError::TasksFileMissing(spec.to_string()));
        }
        let text = std::fs::read_to_string(&path)?;
        Ok(Self {
            spec: spec.to_string(),
            path,
            text,
        })
    }

    pub fn parse(&self) -> ParsedTasks {
        task::parse_tasks(&self.text)
    }

    /// Move task `id` to `status` and persist the document.
    ///
    /// The file is only rewritten when the text actually changes.
    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> Result<StatusChange> {
        let parsed = self.parse();
        let previous = parsed
            .get(id)
            .map(|t| t.status)
            .ok_or_else(|| SpecError::TaskNotFound {
                spec: self.spec.clone(),
                id: id.to_string(),
            })?;

        let updated = task::update_task_status(&self.text, id, status);
        let changed = updated != self.text;
        if changed {
            io::atomic_write(&self.path, updated.as_bytes())?;
            self.text = updated;
        }

        Ok(StatusChange {
            task_id: id.to_string(),
            previous,
            current: status,
            changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TASKS: &str = "# Tasks\n\n- [ ] 1. First\n  - _Requirements: R1_\n\nNotes between tasks.\n\n- [ ] 2. Second\n  - Files: a.rs\n";

    fn write_spec(dir: &TempDir, name: &str, tasks: Option<&str>) {
        let spec_dir = paths::spec_dir(dir.path(), name);
        std::fs::create_dir_all(&spec_dir).unwrap();
        if let Some(text) = tasks {
            std::fs::write(spec_dir.join("tasks.md"), text).unwrap();
        }
    }

    #[test]
    fn load_and_parse() {
        let dir = TempDir::new().unwrap();
        write_spec(&dir, "auth", Some(TASKS));
        let doc = TaskDocument::load(dir.path(), "auth").unwrap();
        let parsed = doc.parse();
        assert_eq!(parsed.summary.total, 2);
        assert_eq!(parsed.summary.pending, 2);
    }

    #[test]
    fn set_status_rewrites_one_line() {
        let dir = TempDir::new().unwrap();
        write_spec(&dir, "auth", Some(TASKS));
        let mut doc = TaskDocument::load(dir.path(), "auth").unwrap();

        let change = doc.set_status("2", TaskStatus::InProgress).unwrap();
        assert!(change.changed);
        assert_eq!(change.previous, TaskStatus::Pending);

        let on_disk = std::fs::read_to_string(paths::tasks_path(dir.path(), "auth")).unwrap();
        assert_eq!(on_disk, TASKS.replace("- [ ] 2. Second", "- [-] 2. Second"));
        assert_eq!(doc.text, on_disk);
    }

    #[test]
    fn set_same_status_is_noop() {
        let dir = TempDir::new().unwrap();
        write_spec(&dir, "auth", Some(TASKS));
        let mut doc = TaskDocument::load(dir.path(), "auth").unwrap();
        let change = doc.set_status("1", TaskStatus::Pending).unwrap();
        assert!(!change.changed);
    }

    #[test]
    fn unknown_task_is_an_error() {
        let dir = TempDir::new().unwrap();
        write_spec(&dir, "auth", Some(TASKS));
        let mut doc = TaskDocument::load(dir.path(), "auth").unwrap();
        let err = doc.set_status("999", TaskStatus::Completed).unwrap_err();
        assert!(matches!(err, SpecError::TaskNotFound { .. }));
        let on_disk = std::fs::read_to_string(paths::tasks_path(dir.path(), "auth")).unwrap();
        assert_eq!(on_disk, TASKS);
    }

    #[test]
    fn missing_spec_and_missing_tasks() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            TaskDocument::load(dir.path(), "ghost"),
            Err(SpecError::SpecNotFound(_))
        ));
        write_spec(&dir, "draft", None);
        assert!(matches!(
            TaskDocument::load(dir.path(), "draft"),
            Err(SpecError::TasksFileMissing(_))
        ));
        assert!(matches!(
            TaskDocument::load(dir.path(), "../etc"),
            Err(SpecError::InvalidSpecName(_))
        ));
    }
}
