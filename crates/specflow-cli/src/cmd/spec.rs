use crate::output::{print_json, print_table, progress_bar};
use anyhow::Context;
use clap::Subcommand;
use specflow_core::spec::Spec;
use std::path::Path;

#[derive(Subcommand)]
pub enum SpecSubcommand {
    /// List all specs with their phase and task progress
    List,
    /// Show documents, phase and task summary for one spec
    Status { name: String },
}

pub fn run(root: &Path, subcmd: SpecSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SpecSubcommand::List => list(root, json),
        SpecSubcommand::Status { name } => status(root, &name, json),
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let specs = Spec::list(root).context("failed to list specs")?;

    if json {
        print_json(&specs)?;
        return Ok(());
    }

    if specs.is_empty() {
        println!("No specs.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = specs
        .iter()
        .map(|s| {
            let tasks = s
                .tasks
                .as_ref()
                .map(|t| format!("{}/{}", t.completed, t.total))
                .unwrap_or_else(|| "-".to_string());
            vec![
                s.name.clone(),
                s.phase.to_string(),
                tasks,
                progress_bar(s.progress(), 10),
            ]
        })
        .collect();
    print_table(&["NAME", "PHASE", "TASKS", "PROGRESS"], rows);
    Ok(())
}

fn status(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let spec = Spec::load(root, name).with_context(|| format!("spec '{name}' not found"))?;

    if json {
        print_json(&spec)?;
        return Ok(());
    }

    println!("Spec:   {}", spec.name);
    println!("Phase:  {}", spec.phase);
    println!();

    let rows: Vec<Vec<String>> = spec
        .documents
        .iter()
        .map(|d| {
            vec![
                d.kind.filename().to_string(),
                if d.exists { "yes" } else { "no" }.to_string(),
                d.modified_at
                    .map(|t| {
                        t.with_timezone(&chrono::Local)
                            .format("%Y-%m-%d %H:%M")
                            .to_string()
                    })
                    .unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["DOCUMENT", "EXISTS", "MODIFIED"], rows);

    if let Some(t) = &spec.tasks {
        println!();
        println!(
            "Tasks:  {} total, {} completed, {} in progress, {} pending, {} headers",
            t.total, t.completed, t.in_progress, t.pending, t.headers
        );
        println!("        {}", progress_bar(spec.progress(), 20));
    }
    Ok(())
}
