use crate::output::print_json;
use anyhow::Context;
use specflow_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path, name: Option<&str>, json: bool) -> anyhow::Result<()> {
    io::ensure_dir(&paths::specs_dir(root)).context("failed to create specs directory")?;

    let project = name
        .map(str::to_string)
        .or_else(|| root.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "project".to_string());
    let created = Config::new(project)
        .save_if_missing(root)
        .context("failed to write config.yaml")?;
    tracing::info!(root = %root.display(), created, "initialized spec workflow");

    if json {
        print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "config_created": created,
        }))?;
    } else if created {
        println!("Initialized {} in {}", paths::WORKFLOW_DIR, root.display());
    } else {
        println!("Already initialized: {}", paths::config_path(root).display());
    }
    Ok(())
}
