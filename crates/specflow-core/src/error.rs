use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("not initialized: run 'specflow init'")]
    NotInitialized,

    #[error("spec not found: {0}")]
    SpecNotFound(String),

    #[error("spec '{0}' has no tasks.md")]
    TasksFileMissing(String),

    #[error("task '{id}' not found in spec '{spec}'")]
    TaskNotFound { spec: String, id: String },

    #[error("invalid spec name '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSpecName(String),

    #[error("invalid task status '{0}': expected pending, in-progress or completed")]
    InvalidStatus(String),

    #[error("no spec selected: pass --spec or set default_spec in config.yaml")]
    NoSpecSelected,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SpecError>;
