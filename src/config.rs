use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration file structure for prlens.
///
/// Allows users to save report settings and reuse them across runs.
/// Configuration files are loaded from the current directory or specified path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// GitHub connection settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Report windows and thresholds
    #[serde(default)]
    pub report: ReportConfig,

    /// Label names driving classification
    #[serde(default)]
    pub labels: LabelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// GitHub personal access token
    pub token: Option<String>,

    /// GitHub API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Repository path (e.g., 'owner/repo')
    pub repo_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReportConfig {
    /// Days of inactivity before an open community PR counts as stale
    #[serde(default = "default_stale_cutoff_days")]
    pub cutoff_days_for_stale_prs: i64,

    /// Lookback window for completed community PRs and help-wanted conversions
    #[serde(default = "default_completed_cutoff_days")]
    pub cutoff_days_for_completed_prs: i64,

    /// Stale-days threshold after which a PR row is flagged overdue
    #[serde(default = "default_sla_days")]
    pub community_pr_sla_days: i64,

    /// Path to the pipe-delimited area-owners document
    pub area_owners: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LabelConfig {
    /// Label marking community contributions
    #[serde(default = "default_community_label")]
    pub community_contribution: String,

    /// Label marking PRs that are waiting on their author
    #[serde(default = "default_pending_label")]
    pub pending_author_input: String,

    /// Label marking servicing/backport merges, which keep the original assignee accountable
    #[serde(default = "default_servicing_label")]
    pub servicing_approved: String,

    /// Label whose application converts an issue into a help-wanted item
    #[serde(default = "default_help_wanted_label")]
    pub help_wanted: String,

    /// Area label prefixes, highest priority first (without the trailing dash)
    #[serde(default = "default_area_prefixes")]
    pub area_prefixes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            report: ReportConfig::default(),
            labels: LabelConfig::default(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_base_url(),
            repo_path: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            cutoff_days_for_stale_prs: default_stale_cutoff_days(),
            cutoff_days_for_completed_prs: default_completed_cutoff_days(),
            community_pr_sla_days: default_sla_days(),
            area_owners: None,
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            community_contribution: default_community_label(),
            pending_author_input: default_pending_label(),
            servicing_approved: default_servicing_label(),
            help_wanted: default_help_wanted_label(),
            area_prefixes: default_area_prefixes(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_stale_cutoff_days() -> i64 {
    14
}

fn default_completed_cutoff_days() -> i64 {
    7
}

fn default_sla_days() -> i64 {
    60
}

fn default_community_label() -> String {
    "community-contribution".to_string()
}

fn default_pending_label() -> String {
    "pr: pending author input".to_string()
}

fn default_servicing_label() -> String {
    "servicing-approved".to_string()
}

fn default_help_wanted_label() -> String {
    "help wanted".to_string()
}

fn default_area_prefixes() -> Vec<String> {
    vec!["area".to_string()]
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./prlens.toml
    /// 3. ./prlens.json
    /// 4. ./prlens.yaml
    /// 5. ./prlens.yml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        Self::load_from_dir(Path::new("."))
    }

    /// Load configuration from the first candidate file found in `dir`,
    /// or defaults when none exists.
    fn load_from_dir(dir: &Path) -> Result<Self> {
        let candidates = ["prlens.toml", "prlens.json", "prlens.yaml", "prlens.yml"];

        for candidate in &candidates {
            let path = dir.join(candidate);
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }
}
