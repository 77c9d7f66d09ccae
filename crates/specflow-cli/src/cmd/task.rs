use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use specflow_core::{
    config::Config,
    document::TaskDocument,
    task::{ParsedTasks, Task},
    types::TaskStatus,
    SpecError,
};
use std::path::Path;

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// List tasks with a progress summary
    List {
        /// Only show tasks with this status (pending, in-progress, completed)
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Show full details for a single task
    Get { id: String },
    /// Show the next pending task that is not a header
    Next,
    /// Mark a task in-progress
    Start { id: String },
    /// Mark a task completed
    Complete { id: String },
    /// Mark a task pending again
    Reset { id: String },
    /// Set a task's status explicitly
    SetStatus { id: String, status: TaskStatus },
    /// Print the implementation context of a task (prompt, requirements, files)
    Context { id: String },
}

pub fn run(
    root: &Path,
    spec: Option<&str>,
    subcmd: TaskSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let spec = resolve_spec(root, spec)?;
    tracing::debug!(spec = %spec, "selected spec");

    match subcmd {
        TaskSubcommand::List { status } => list(root, &spec, status, json),
        TaskSubcommand::Get { id } => get(root, &spec, &id, json),
        TaskSubcommand::Next => next(root, &spec, json),
        TaskSubcommand::Start { id } => set_status(root, &spec, &id, TaskStatus::InProgress, json),
        TaskSubcommand::Complete { id } => {
            set_status(root, &spec, &id, TaskStatus::Completed, json)
        }
        TaskSubcommand::Reset { id } => set_status(root, &spec, &id, TaskStatus::Pending, json),
        TaskSubcommand::SetStatus { id, status } => set_status(root, &spec, &id, status, json),
        TaskSubcommand::Context { id } => context(root, &spec, &id, json),
    }
}

fn resolve_spec(root: &Path, explicit: Option<&str>) -> anyhow::Result<String> {
    match Config::load(root) {
        Ok(config) => Ok(config.resolve_spec(explicit)?),
        Err(SpecError::NotInitialized) => explicit
            .map(str::to_string)
            .ok_or_else(|| SpecError::NoSpecSelected.into()),
        Err(e) => Err(e).context("failed to load config"),
    }
}

fn load(root: &Path, spec: &str) -> anyhow::Result<ParsedTasks> {
    let doc = TaskDocument::load(root, spec)
        .with_context(|| format!("failed to load tasks for spec '{spec}'"))?;
    Ok(doc.parse())
}

fn find<'a>(parsed: &'a ParsedTasks, spec: &str, id: &str) -> anyhow::Result<&'a Task> {
    parsed
        .get(id)
        .with_context(|| format!("task '{id}' not found in spec '{spec}'"))
}

fn list(root: &Path, spec: &str, status: Option<TaskStatus>, json: bool) -> anyhow::Result<()> {
    let parsed = load(root, spec)?;

    if json {
        match status {
            Some(s) => {
                let tasks: Vec<&Task> = parsed.tasks.iter().filter(|t| t.status == s).collect();
                print_json(&tasks)?;
            }
            None => print_json(&parsed)?,
        }
        return Ok(());
    }

    let s = &parsed.summary;
    println!(
        "{}/{} completed, {} in progress, {} pending ({} headers)",
        s.completed, s.total, s.in_progress, s.pending, s.headers
    );
    if let Some(id) = &parsed.in_progress_task_id {
        println!("Current: {id}");
    }
    println!();

    let rows: Vec<Vec<String>> = parsed
        .tasks
        .iter()
        .filter(|t| status.map_or(true, |s| t.status == s))
        .map(|t| {
            vec![
                format!("{}{}", "  ".repeat(t.indent_level), t.id),
                t.status.to_string(),
                t.description.clone(),
            ]
        })
        .collect();

    if rows.is_empty() {
        println!("No tasks in '{spec}'.");
        return Ok(());
    }
    print_table(&["ID", "STATUS", "DESCRIPTION"], rows);
    Ok(())
}

fn get(root: &Path, spec: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let parsed = load(root, spec)?;
    let task = find(&parsed, spec, id)?;

    if json {
        print_json(task)?;
        return Ok(());
    }

    println!("Task:        {}", task.id);
    println!("Status:      {}", task.status);
    println!("Description: {}", task.description);
    println!("Line:        {}", task.line_number + 1);
    if task.is_header {
        println!("Header:      yes (no metadata)");
    }
    if !task.requirements.is_empty() {
        println!("Requires:    {}", task.requirements.join(", "));
    }
    if let Some(leverage) = &task.leverage {
        println!("Leverage:    {leverage}");
    }
    if !task.files.is_empty() {
        println!("Files:       {}", task.files.join(", "));
    }
    Ok(())
}

fn next(root: &Path, spec: &str, json: bool) -> anyhow::Result<()> {
    let parsed = load(root, spec)?;
    let next = parsed.next_pending();

    if json {
        print_json(&serde_json::json!({
            "spec": spec,
            "task": next,
            "inProgressTaskId": parsed.in_progress_task_id,
            "summary": parsed.summary,
        }))?;
        return Ok(());
    }

    match next {
        Some(task) => println!("Next: [{}] {}", task.id, task.description),
        None if parsed.summary.pending == 0 => {
            println!("All tasks in '{spec}' are done or in progress.")
        }
        None => println!("No actionable pending tasks in '{spec}'."),
    }
    if let Some(id) = &parsed.in_progress_task_id {
        println!("In progress: {id}");
    }
    Ok(())
}

fn set_status(
    root: &Path,
    spec: &str,
    id: &str,
    status: TaskStatus,
    json: bool,
) -> anyhow::Result<()> {
    let mut doc = TaskDocument::load(root, spec)
        .with_context(|| format!("failed to load tasks for spec '{spec}'"))?;
    let change = doc
        .set_status(id, status)
        .with_context(|| format!("failed to update task '{id}'"))?;
    tracing::info!(
        spec = %spec,
        task = %id,
        from = %change.previous,
        to = %change.current,
        changed = change.changed,
        "task status updated"
    );

    if json {
        print_json(&serde_json::json!({
            "spec": spec,
            "taskId": change.task_id,
            "previous": change.previous,
            "status": change.current,
            "changed": change.changed,
        }))?;
    } else if change.changed {
        println!("Task [{id}]: {} -> {}", change.previous, change.current);
    } else {
        println!("Task [{id}] already {}", change.current);
    }
    Ok(())
}

fn context(root: &Path, spec: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let parsed = load(root, spec)?;
    let task = find(&parsed, spec, id)?;

    if json {
        print_json(&serde_json::json!({
            "spec": spec,
            "id": task.id,
            "description": task.description,
            "status": task.status,
            "requirements": task.requirements,
            "leverage": task.leverage,
            "files": task.files,
            "purposes": task.purposes,
            "implementationDetails": task.implementation_details,
            "prompt": task.prompt,
            "promptStructured": task.prompt_structured,
        }))?;
        return Ok(());
    }

    for line in render_context(spec, task) {
        println!("{line}");
    }
    Ok(())
}

fn render_context(spec: &str, task: &Task) -> Vec<String> {
    let mut out = vec![
        format!("# Task {} ({spec})", task.id),
        String::new(),
        task.description.clone(),
        format!("Status: {}", task.status),
    ];

    let lists = [
        ("Requirements", &task.requirements),
        ("Files", &task.files),
        ("Purpose", &task.purposes),
        ("Details", &task.implementation_details),
    ];
    for (label, items) in lists {
        if !items.is_empty() {
            out.push(String::new());
            out.push(format!("## {label}"));
            out.extend(items.iter().map(|i| format!("- {i}")));
        }
    }
    if let Some(leverage) = &task.leverage {
        out.push(String::new());
        out.push("## Leverage".to_string());
        out.push(leverage.clone());
    }

    match (&task.prompt_structured, &task.prompt) {
        (Some(sections), _) => {
            out.push(String::new());
            out.push("## Prompt".to_string());
            out.extend(sections.iter().map(|s| format!("{}: {}", s.key, s.value)));
        }
        (None, Some(prompt)) => {
            out.push(String::new());
            out.push("## Prompt".to_string());
            out.push(prompt.clone());
        }
        (None, None) => {}
    }
    out
}
