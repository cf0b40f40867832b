use config::{Config, ConfigError, File as ConfigFile};
use glob::Pattern;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::error;

pub const CONFIG_FILE_STEM: &str = "dupe-sweep";
pub const DEFAULT_REPORT_PREFIX: &str = "duplicates_";
pub const DEFAULT_AUDIT_PREFIX: &str = "removal_log_";
pub const DEFAULT_LOG_FILE_NAME: &str = "dupe-sweep.log";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Directory tree walked by the scanner.
    pub root: PathBuf,
    /// Directory where reports and audit logs are written and discovered.
    pub output_dir: PathBuf,
    pub report_prefix: String,
    pub audit_prefix: String,
    /// File names belonging to the tool itself, never treated as data.
    pub excluded_names: Vec<String>,
    /// Glob patterns matched against full paths.
    pub ignore_patterns: Vec<String>,
    pub exclude_empty: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            report_prefix: DEFAULT_REPORT_PREFIX.to_string(),
            audit_prefix: DEFAULT_AUDIT_PREFIX.to_string(),
            excluded_names: vec![
                "dupe-sweep".to_string(),
                "dupe-sweep.exe".to_string(),
                format!("{}.toml", CONFIG_FILE_STEM),
                DEFAULT_LOG_FILE_NAME.to_string(),
            ],
            ignore_patterns: Vec::new(),
            exclude_empty: false,
        }
    }
}

impl SweepConfig {
    /// Scan `root`, writing reports next to where the tool is run from.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn exclusion_rules(&self) -> ExclusionRules {
        ExclusionRules::new(
            &self.excluded_names,
            &[self.report_prefix.as_str(), self.audit_prefix.as_str()],
            &self.ignore_patterns,
        )
    }
}

/// Load `dupe-sweep.toml` from the working directory if present, layered
/// over the built-in defaults.
pub fn load_configuration() -> Result<SweepConfig, ConfigError> {
    load_configuration_from(Path::new(CONFIG_FILE_STEM))
}

pub fn load_configuration_from(stem: &Path) -> Result<SweepConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name(&stem.to_string_lossy()).required(false))
        .build()?;
    builder.try_deserialize::<SweepConfig>()
}

/// Decides which walked entries are skipped before they are grouped.
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    names: Vec<String>,
    prefixes: Vec<String>,
    patterns: Vec<Pattern>,
}

impl ExclusionRules {
    pub fn new(names: &[String], prefixes: &[&str], ignore_globs: &[String]) -> Self {
        let patterns = ignore_globs
            .iter()
            .filter_map(|glob| match Pattern::new(glob) {
                Ok(p) => Some(p),
                Err(e) => {
                    error!("Invalid glob pattern '{}': {}", glob, e);
                    None
                }
            })
            .collect();

        Self {
            names: names.to_vec(),
            prefixes: prefixes
                .iter()
                .filter(|p| !p.is_empty())
                .map(|p| p.to_string())
                .collect(),
            patterns,
        }
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => return false,
        };

        self.names.iter().any(|n| *n == name)
            || self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
            || self.is_ignored(path)
    }

    /// Ignore-pattern check alone; applied to directories so matching
    /// subtrees are not descended.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.patterns.iter().any(|p| p.matches_path(path))
    }
}
