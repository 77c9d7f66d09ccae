use crate::error::{Result, SpecError};
use crate::types::DocumentKind;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const WORKFLOW_DIR: &str = ".spec-workflow";
pub const SPECS_DIR: &str = ".spec-workflow/specs";
pub const CONFIG_FILE: &str = ".spec-workflow/config.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn specs_dir(root: &Path) -> PathBuf {
    root.join(SPECS_DIR)
}

pub fn spec_dir(root: &Path, name: &str) -> PathBuf {
    specs_dir(root).join(name)
}

pub fn document_path(root: &Path, name: &str, kind: DocumentKind) -> PathBuf {
    spec_dir(root, name).join(kind.filename())
}

pub fn tasks_path(root: &Path, name: &str) -> PathBuf {
    document_path(root, name, DocumentKind::Tasks)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Spec name validation
// ---------------------------------------------------------------------------

static SPEC_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn spec_name_re() -> &'static Regex {
    SPEC_NAME_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_spec_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 64 || !spec_name_re().is_match(name) {
        return Err(SpecError::InvalidSpecName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
