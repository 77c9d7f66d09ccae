use crate::error::{Result, SpecError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    /// Spec used by task commands when none is given explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_spec: Option<String>,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            default_spec: None,
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(SpecError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Write this config only when none exists yet. Returns true if written.
    pub fn save_if_missing(&self, root: &Path) -> Result<bool> {
        let data = serde_yaml::to_string(self)?;
        crate::io::write_if_missing(&paths::config_path(root), data.as_bytes())
    }

    /// Pick the spec to operate on: an explicit name wins over `default_spec`.
    pub fn resolve_spec(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.default_spec.clone())
            .ok_or(SpecError::NoSpecSelected)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self, root: &Path) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version != default_version() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("unknown config version {}", self.version),
            });
        }

        if self.project.name.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "project.name is empty".to_string(),
            });
        }

        if let Some(spec) = &self.default_spec {
            if paths::validate_spec_name(spec).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("default_spec '{spec}' is not a valid spec name"),
                });
            } else if !paths::spec_dir(root, spec).is_dir() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "default_spec '{spec}' does not exist under {}",
                        paths::SPECS_DIR
                    ),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::new("test-project");
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        assert!(!yaml.contains("default_spec"));
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.project.name, "test-project");
        assert_eq!(parsed.version, 1);
    }

    #[test]
    fn minimal_yaml_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("project:\n  name: demo\n").unwrap();
        assert_eq!(cfg.version, 1);
        assert!(cfg.default_spec.is_none());
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(Config::load(dir.path()), Err(SpecError::NotInitialized)));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::new("demo");
        cfg.default_spec = Some("auth".to_string());
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.default_spec.as_deref(), Some("auth"));
    }

    #[test]
    fn save_if_missing_keeps_existing_config() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::new("first");
        cfg.default_spec = Some("auth".to_string());
        assert!(cfg.save_if_missing(dir.path()).unwrap());

        assert!(!Config::new("second").save_if_missing(dir.path()).unwrap());
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.project.name, "first");
        assert_eq!(loaded.default_spec.as_deref(), Some("auth"));
    }

    #[test]
    fn resolve_spec_prefers_explicit() {
        let mut cfg = Config::new("demo");
        assert!(matches!(cfg.resolve_spec(None), Err(SpecError::NoSpecSelected)));
        cfg.default_spec = Some("auth".to_string());
        assert_eq!(cfg.resolve_spec(None).unwrap(), "auth");
        assert_eq!(cfg.resolve_spec(Some("billing")).unwrap(), "billing");
    }

    #[test]
    fn validate_default_spec() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::new("demo");
        assert!(cfg.validate(dir.path()).is_empty());

        cfg.default_spec = Some("Bad Name".to_string());
        let warnings = cfg.validate(dir.path());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);

        cfg.default_spec = Some("auth".to_string());
        let warnings = cfg.validate(dir.path());
        assert_eq!(warnings[0].level, WarnLevel::Warning);

        std::fs::create_dir_all(paths::spec_dir(dir.path(), "auth")).unwrap();
        assert!(cfg.validate(dir.path()).is_empty());
    }

    #[test]
    fn validate_version_and_name() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::new("  ");
        cfg.version = 7;
        let warnings = cfg.validate(dir.path());
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.level == WarnLevel::Warning));
    }
}
