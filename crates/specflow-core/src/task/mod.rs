//! Task model extracted from `tasks.md` checklists.
//!
//! A task is a checkbox line carrying a dotted numeric id. Metadata belongs to
//! the task whose checkbox precedes it, up to (not including) the next
//! checkbox line, so indentation never leaks metadata between tasks.

pub mod line;
pub mod prompt;
pub mod status;

use crate::types::TaskStatus;
use line::LineKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub use line::classify_line;
pub use prompt::{parse_structured_prompt, PromptSection};
pub use status::update_task_status;

static TASK_ID_RE: OnceLock<Regex> = OnceLock::new();

fn task_id_re() -> &'static Regex {
    TASK_ID_RE.get_or_init(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)*)\s*\.?\s+(.+)").unwrap())
}

/// Split checkbox text like `2.1. Build parser` into `("2.1", "Build parser")`.
pub(crate) fn split_task_id(text: &str) -> Option<(&str, &str)> {
    let caps = task_id_re().captures(text)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub description: String,
    pub status: TaskStatus,
    pub completed: bool,
    pub in_progress: bool,
    /// 0-based line of the checkbox; for navigation only.
    pub line_number: usize,
    pub indent_level: usize,
    /// No metadata at all: a section label written as a checkbox.
    pub is_header: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leverage: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub purposes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implementation_details: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_structured: Option<Vec<PromptSection>>,
}

impl Task {
    fn from_parts(id: &str, description: &str, status: TaskStatus, meta: TaskMetadata) -> Self {
        let is_header = meta.is_empty();
        let prompt_structured = meta.prompt.as_deref().and_then(parse_structured_prompt);
        Self {
            id: id.to_string(),
            description: description.trim().to_string(),
            status,
            completed: status == TaskStatus::Completed,
            in_progress: status == TaskStatus::InProgress,
            line_number: 0,
            indent_level: 0,
            is_header,
            requirements: meta.requirements,
            leverage: if meta.leverage.is_empty() {
                None
            } else {
                Some(meta.leverage.join(", "))
            },
            files: meta.files,
            purposes: meta.purposes,
            implementation_details: meta.implementation_details,
            prompt: meta.prompt,
            prompt_structured,
        }
    }

    /// A pending task that is real work rather than a section label.
    pub fn is_actionable(&self) -> bool {
        self.status == TaskStatus::Pending && !self.is_header
    }
}

// ---------------------------------------------------------------------------
// Metadata fold
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct TaskMetadata {
    requirements: Vec<String>,
    leverage: Vec<String>,
    files: Vec<String>,
    purposes: Vec<String>,
    implementation_details: Vec<String>,
    prompt: Option<String>,
}

impl TaskMetadata {
    fn is_empty(&self) -> bool {
        self.requirements.is_empty()
            && self.leverage.is_empty()
            && self.files.is_empty()
            && self.purposes.is_empty()
            && self.implementation_details.is_empty()
            && self.prompt.is_none()
    }
}

/// Accumulator for one metadata span. `open_prompt` holds an unterminated
/// multi-line prompt until a blank line, bullet or `Files:`/`Purpose:` line.
#[derive(Debug, Default)]
struct MetadataFold {
    meta: TaskMetadata,
    open_prompt: Option<String>,
}

impl MetadataFold {
    fn step(mut self, line: &&str) -> Self {
        if let Some(prompt) = self.open_prompt.as_mut() {
            if !line::ends_prompt(line) {
                prompt.push(' ');
                prompt.push_str(line::prompt_continuation(line));
                return self;
            }
            self.close_prompt();
        }

        match classify_line(line) {
            LineKind::Prompt { text, closed: true } => self.meta.prompt = non_empty(text),
            LineKind::Prompt {
                text,
                closed: false,
            } => self.open_prompt = Some(text.to_string()),
            LineKind::Requirements(items) => self
                .meta
                .requirements
                .extend(items.into_iter().map(String::from)),
            LineKind::Leverage(items) => self
                .meta
                .leverage
                .extend(items.into_iter().map(String::from)),
            LineKind::Files(files) => self.meta.files.extend(files),
            LineKind::Purpose(text) => self.meta.purposes.extend(non_empty(text)),
            LineKind::Bullet(text) => self.meta.implementation_details.extend(non_empty(text)),
            LineKind::Blank | LineKind::Checkbox | LineKind::Other => {}
        }
        self
    }

    fn close_prompt(&mut self) {
        if let Some(prompt) = self.open_prompt.take() {
            self.meta.prompt = non_empty(&prompt);
        }
    }

    fn finish(mut self) -> TaskMetadata {
        self.close_prompt();
        self.meta
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub headers: usize,
}

impl TaskSummary {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();
        Self {
            total: tasks.len(),
            completed: count(TaskStatus::Completed),
            in_progress: count(TaskStatus::InProgress),
            pending: count(TaskStatus::Pending),
            headers: tasks.iter().filter(|t| t.is_header).count(),
        }
    }

    /// Whole-number completion percentage; 0 for an empty list.
    pub fn percent_complete(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.completed * 100 / self.total) as u32
    }

    pub fn all_completed(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTasks {
    pub tasks: Vec<Task>,
    pub in_progress_task_id: Option<String>,
    pub summary: TaskSummary,
}

impl ParsedTasks {
    pub fn next_pending(&self) -> Option<&Task> {
        find_next_pending_task(&self.tasks)
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        get_task_by_id(&self.tasks, id)
    }
}

/// Extract every numbered checkbox task from `markdown`, in document order.
///
/// Checkbox lines without a numeric id are skipped but still end the
/// previous task's metadata span.
pub fn parse_tasks(markdown: &str) -> ParsedTasks {
    let lines: Vec<&str> = markdown.lines().collect();
    let checkboxes: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| line::is_checkbox(l))
        .map(|(i, _)| i)
        .collect();

    let tasks: Vec<Task> = checkboxes
        .iter()
        .enumerate()
        .filter_map(|(n, &start)| {
            let end = checkboxes.get(n + 1).copied().unwrap_or(lines.len());
            parse_task(start, lines[start], &lines[start + 1..end])
        })
        .collect();

    let in_progress_task_id = tasks
        .iter()
        .find(|t| t.status == TaskStatus::InProgress)
        .map(|t| t.id.clone());
    let summary = TaskSummary::from_tasks(&tasks);

    ParsedTasks {
        tasks,
        in_progress_task_id,
        summary,
    }
}

fn parse_task(line_number: usize, checkbox: &str, span: &[&str]) -> Option<Task> {
    let caps = status::task_line_re().captures(checkbox)?;
    let indent = caps.get(1)?.as_str();
    let status = TaskStatus::from_glyph(caps.get(2)?.as_str().chars().next()?)?;
    let (id, description) = split_task_id(caps.get(3)?.as_str())?;

    let meta = span
        .iter()
        .fold(MetadataFold::default(), MetadataFold::step)
        .finish();

    let mut task = Task::from_parts(id, description, status, meta);
    task.line_number = line_number;
    task.indent_level = indent.chars().count() / 2;
    Some(task)
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// First pending task in document order that is not a header.
pub fn find_next_pending_task(tasks: &[Task]) -> Option<&Task> {
    tasks.iter().find(|t| t.is_actionable())
}

/// First task with this id; duplicates resolve to the earliest occurrence.
pub fn get_task_by_id<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|t| t.id == id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
