use crate::error::{Result, SpecError};
use crate::paths;
use crate::task::{self, TaskSummary};
use crate::types::{DocumentKind, SpecPhase};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub kind: DocumentKind,
    pub path: PathBuf,
    pub exists: bool,
    pub modified_at: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    fn inspect(root: &Path, spec: &str, kind: DocumentKind) -> Self {
        let path = paths::document_path(root, spec, kind);
        let modified_at = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);
        Self {
            kind,
            exists: path.is_file(),
            path,
            modified_at,
        }
    }
}

/// A spec directory and the state of its documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spec {
    pub name: String,
    pub phase: SpecPhase,
    pub documents: Vec<DocumentInfo>,
    /// Present once tasks.md exists.
    pub tasks: Option<TaskSummary>,
}

impl Spec {
    pub fn load(root: &Path, name: &str) -> Result<Self> {
        paths::validate_spec_name(name)?;
        if !paths::spec_dir(root, name).is_dir() {
            return Err(SpecError::SpecNotFound(name.to_string()));
        }

        let documents: Vec<DocumentInfo> = DocumentKind::all()
            .iter()
            .map(|&kind| DocumentInfo::inspect(root, name, kind))
            .collect();

        let tasks_path = paths::tasks_path(root, name);
        let tasks = if tasks_path.is_file() {
            let text = std::fs::read_to_string(&tasks_path)?;
            Some(task::parse_tasks(&text).summary)
        } else {
            None
        };

        let phase = derive_phase(&documents, tasks.as_ref());
        Ok(Self {
            name: name.to_string(),
            phase,
            documents,
            tasks,
        })
    }

    /// All specs under the specs directory, sorted by name. Directories whose
    /// names are not valid spec names are ignored.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = paths::specs_dir(root);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if paths::validate_spec_name(&name).is_ok() {
                names.push(name);
            }
        }
        names.sort();
        names.iter().map(|n| Spec::load(root, n)).collect()
    }

    pub fn progress(&self) -> u32 {
        self.tasks.as_ref().map_or(0, TaskSummary::percent_complete)
    }
}

fn derive_phase(documents: &[DocumentInfo], tasks: Option<&TaskSummary>) -> SpecPhase {
    let exists = |kind: DocumentKind| documents.iter().any(|d| d.kind == kind && d.exists);
    if !exists(DocumentKind::Requirements) {
        SpecPhase::Requirements
    } else if !exists(DocumentKind::Design) {
        SpecPhase::Design
    } else if !exists(DocumentKind::Tasks) {
        SpecPhase::Tasks
    } else if tasks.is_some_and(TaskSummary::all_completed) {
        SpecPhase::Completed
    } else {
        SpecPhase::Implementation
    }
}
