use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".jira-cli";
pub const DEFAULT_STORY_POINTS_FIELD: &str = "customfield_10016";
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const MAX_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default, alias = "sprintId")]
    pub sprint_id: Option<u64>,
    #[serde(default = "default_output_folder", alias = "outputFolder")]
    pub output_folder: String,
    #[serde(default = "default_story_points_field", alias = "storyPointsColumn")]
    pub story_points_field: String,
    #[serde(default = "default_page_size", alias = "pageSize")]
    pub page_size: usize,
    pub server: ServerConfig,
    #[serde(default)]
    pub teams: Vec<TeamConfig>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_timeout_seconds", alias = "timeoutSeconds")]
    pub timeout_seconds: u64,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamConfig {
    pub name: String,
    /// Assignee email addresses.
    #[serde(default)]
    pub members: Vec<String>,
    /// Jira component names owned by the team.
    #[serde(default)]
    pub components: Vec<String>,
}

fn default_output_folder() -> String {
    "./output".to_string()
}

fn default_story_points_field() -> String {
    DEFAULT_STORY_POINTS_FIELD.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_seconds() -> u64 {
    30
}

impl ReportConfig {
    /// Load from a file; `.yml`/`.yaml` is read as YAML, anything else as TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("Read {} bytes of configuration from {}", content.len(), path.display());

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml") | Some("yaml") => Self::from_yaml_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        Ok(serde_yaml::from_str(&processed)?)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReportError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// `~/.jira-cli/config.toml`, falling back to `config.yml` when only that exists.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| ReportError::ConfigError {
            message: "could not determine the home directory".to_string(),
        })?;
        Ok(Self::config_path_in(&home))
    }

    fn config_path_in(home: &Path) -> PathBuf {
        let dir = home.join(CONFIG_DIR);

        let toml_path = dir.join("config.toml");
        if toml_path.exists() {
            return toml_path;
        }
        let yaml_path = dir.join("config.yml");
        if yaml_path.exists() {
            return yaml_path;
        }
        toml_path
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(mut self, sprint_id: Option<u64>, output_folder: Option<String>) -> Self {
        if let Some(id) = sprint_id {
            tracing::debug!("Sprint id overridden to {}", id);
            self.sprint_id = Some(id);
        }
        if let Some(folder) = output_folder {
            tracing::debug!("Output folder overridden to {}", folder);
            self.output_folder = folder;
        }
        self
    }

    pub fn require_sprint_id(&self) -> Result<u64> {
        validation::validate_required_field("sprint_id", &self.sprint_id).copied()
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("server.url", &self.server.url)?;
        validation::validate_non_empty_string("server.username", &self.server.username)?;
        validation::validate_range("server.timeout_seconds", self.server.timeout_seconds, 1, u64::MAX)?;
        validation::validate_path("output_folder", &self.output_folder)?;
        validation::validate_non_empty_string("story_points_field", &self.story_points_field)?;
        validation::validate_range("page_size", self.page_size, 1, MAX_PAGE_SIZE)?;

        for team in &self.teams {
            validation::validate_non_empty_string("teams.name", &team.name)?;
        }
        validation::validate_unique("teams.name", self.teams.iter().map(|t| t.name.as_str()))?;

        Ok(())
    }
}
