//! Grader configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::NUM_QUESTIONS;

/// Environment variable that overrides `num_questions`.
pub const NUM_QUESTIONS_ENV: &str = "SHEETGRADER_NUM_QUESTIONS";

/// Top-level sheetgrader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraderConfig {
    /// Number of answer columns on every sheet.
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,
    /// Add a "Total Points" column when scoring.
    #[serde(default)]
    pub include_points: bool,
    /// Output directory for results.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Output formats written by `score` (csv, json, html).
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
}

fn default_num_questions() -> usize {
    NUM_QUESTIONS
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./sheetgrader-results")
}
fn default_output_formats() -> Vec<String> {
    vec!["csv".to_string()]
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            num_questions: default_num_questions(),
            include_points: false,
            output_dir: default_output_dir(),
            output_formats: default_output_formats(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without an explicit path:
/// 1. `sheetgrader.toml` in the current directory
/// 2. `~/.config/sheetgrader/config.toml`
///
/// `SHEETGRADER_NUM_QUESTIONS` overrides the question count.
pub fn load_config_from(path: Option<&Path>) -> Result<GraderConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("sheetgrader.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GraderConfig::default(),
    };

    if let Ok(value) = std::env::var(NUM_QUESTIONS_ENV) {
        config.num_questions = value
            .trim()
            .parse()
            .with_context(|| format!("invalid {NUM_QUESTIONS_ENV}: '{value}'"))?;
    }

    anyhow::ensure!(config.num_questions >= 1, "num_questions must be at least 1");
    Ok(config)
}

/// Parse a TOML config document.
pub fn parse_config(content: &str) -> Result<GraderConfig> {
    Ok(toml::from_str::<GraderConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("sheetgrader"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GraderConfig::default();
        assert_eq!(config.num_questions, 75);
        assert!(!config.include_points);
        assert_eq!(config.output_formats, vec!["csv"]);
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config("num_questions = 50\ninclude_points = true\n").unwrap();
        assert_eq!(config.num_questions, 50);
        assert!(config.include_points);
        assert_eq!(config.output_dir, PathBuf::from("./sheetgrader-results"));
    }

    #[test]
    fn parse_rejects_wrong_types() {
        assert!(parse_config("num_questions = \"many\"").is_err());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/sheetgrader.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grader.toml");
        std::fs::write(&path, "output_formats = [\"csv\", \"json\"]\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.output_formats, vec!["csv", "json"]);
    }
}
