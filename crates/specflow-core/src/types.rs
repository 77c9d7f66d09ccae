use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Status of a checklist task, stored in markdown as the checkbox glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn all() -> &'static [TaskStatus] {
        &[
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
        ]
    }

    /// Character written between the checkbox brackets.
    pub fn glyph(self) -> char {
        match self {
            TaskStatus::Pending => ' ',
            TaskStatus::InProgress => '-',
            TaskStatus::Completed => 'x',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<TaskStatus> {
        match glyph {
            ' ' => Some(TaskStatus::Pending),
            '-' => Some(TaskStatus::InProgress),
            'x' => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = crate::error::SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" | "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(crate::error::SpecError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// DocumentKind
// ---------------------------------------------------------------------------

/// The markdown documents a spec moves through, in workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Requirements,
    Design,
    Tasks,
}

impl DocumentKind {
    pub fn all() -> &'static [DocumentKind] {
        &[
            DocumentKind::Requirements,
            DocumentKind::Design,
            DocumentKind::Tasks,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Requirements => "requirements",
            DocumentKind::Design => "design",
            DocumentKind::Tasks => "tasks",
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            DocumentKind::Requirements => "requirements.md",
            DocumentKind::Design => "design.md",
            DocumentKind::Tasks => "tasks.md",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SpecPhase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecPhase {
    Requirements,
    Design,
    Tasks,
    Implementation,
    Completed,
}

impl SpecPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SpecPhase::Requirements => "requirements",
            SpecPhase::Design => "design",
            SpecPhase::Tasks => "tasks",
            SpecPhase::Implementation => "implementation",
            SpecPhase::Completed => "completed",
        }
    }
}

impl fmt::Display for SpecPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
