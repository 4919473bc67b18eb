use crate::output::Output;
use regex_lite::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_BRANCHES: usize = 20;
const DEFAULT_KEEP_PATTERNS: &[&str] = &["^main$", "^master$", "^develop$", "^staging$"];

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    database: DatabaseSection,
    #[serde(default)]
    tracking: TrackingSection,
    #[serde(default)]
    projects: Vec<ProjectSection>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TrackingSection {
    max_branches: Option<usize>,
    auto_track: Option<bool>,
    keep_patterns: Option<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProjectSection {
    #[allow(dead_code)]
    pub name: Option<String>,
    pub path: String,
    pub keep_patterns: Option<Vec<String>>,
}

/// Resolved configuration. Loading never fails: a missing file means
/// defaults, an unreadable one warns and falls back to defaults.
#[derive(Debug)]
pub struct Config {
    path: PathBuf,
    exists: bool,
    database_path: PathBuf,
    max_branches: usize,
    auto_track: bool,
    keep_patterns: Vec<String>,
    projects: Vec<ProjectSection>,
}

impl Config {
    pub fn load(custom_path: Option<&Path>, output: &Output) -> Self {
        let path = custom_path
            .map(Path::to_path_buf)
            .unwrap_or_else(default_config_path);
        let exists = path.is_file();

        let file = if exists {
            match read_config_file(&path) {
                Ok(file) => {
                    output.debug(&format!("Loaded config from {}", path.display()));
                    file
                }
                Err(detail) => {
                    output.warning(&format!("Error loading config file: {detail}"));
                    output.warning("Using default configuration");
                    ConfigFile::default()
                }
            }
        } else {
            ConfigFile::default()
        };

        resolve(file, path, exists)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn max_branches(&self) -> usize {
        self.max_branches
    }

    pub fn auto_track(&self) -> bool {
        self.auto_track
    }

    /// Keep patterns for `clear`: a per-project override wins over the
    /// global list. `project_path` is the canonical repository root.
    pub fn keep_patterns(&self, project_path: Option<&str>) -> &[String] {
        if let Some(project_path) = project_path {
            let project = self
                .projects
                .iter()
                .find(|project| project.path == project_path);
            if let Some(patterns) = project.and_then(|project| project.keep_patterns.as_ref()) {
                return patterns;
            }
        }
        &self.keep_patterns
    }

    pub fn default_config_content() -> String {
        r#"[database]
# SQLite database location (defaults to XDG_DATA_HOME/git-hop/branches.db)
# You can use environment variables like $XDG_DATA_HOME or $HOME
path = "$XDG_DATA_HOME/git-hop/branches.db"

[tracking]
# Maximum number of branches to track per project
max_branches = 20

# Automatically track branches on checkout (via git hook)
auto_track = true

# Global branch patterns to always keep when clearing (regex patterns)
keep_patterns = ["^main$", "^master$", "^develop$", "^staging$"]

# Example project-specific configuration
# [[projects]]
# name = "my-project"
# path = "/path/to/my-project"
# keep_patterns = ["^main$", "^feature/.*$"]
"#
        .to_string()
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, String> {
    let raw = std::fs::read_to_string(path).map_err(|err| err.to_string())?;
    toml::from_str(&raw).map_err(|err| err.to_string())
}

fn resolve(file: ConfigFile, path: PathBuf, exists: bool) -> Config {
    let database_path = file
        .database
        .path
        .map(|raw| PathBuf::from(expand_env_vars(&raw)))
        .unwrap_or_else(default_database_path);

    Config {
        path,
        exists,
        database_path,
        max_branches: file.tracking.max_branches.unwrap_or(DEFAULT_MAX_BRANCHES),
        auto_track: file.tracking.auto_track.unwrap_or(true),
        keep_patterns: file
            .tracking
            .keep_patterns
            .unwrap_or_else(default_keep_patterns),
        projects: file.projects,
    }
}

fn default_keep_patterns() -> Vec<String> {
    DEFAULT_KEEP_PATTERNS
        .iter()
        .map(|pattern| pattern.to_string())
        .collect()
}

/// XDG base directories: environment first, `dirs` fallback.
fn config_home() -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn data_home() -> PathBuf {
    std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_config_path() -> PathBuf {
    config_home().join("git-hop").join("config.toml")
}

pub fn default_database_path() -> PathBuf {
    data_home().join("git-hop").join("branches.db")
}

/// `$VAR` references resolve against the environment; unknown variables
/// are left as written.
fn expand_env_vars(value: &str) -> String {
    let pattern = match Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)") {
        Ok(pattern) => pattern,
        Err(_) => return value.to_string(),
    };
    pattern
        .replace_all(value, |captures: &regex_lite::Captures<'_>| {
            let name = &captures[1];
            std::env::var(name).unwrap_or_else(|_| captures[0].to_string())
        })
        .into_owned()
}
