use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

impl LlmConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

impl Config {
    /// Minimal config for tests and commands that don't need the LLM.
    pub fn minimal(dataset_path: PathBuf) -> Self {
        Self {
            dataset: DatasetConfig { path: dataset_path },
            llm: LlmConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.dataset.path.as_os_str().is_empty() {
        anyhow::bail!("dataset.path must not be empty");
    }

    if config.llm.timeout_secs == 0 {
        anyhow::bail!("llm.timeout_secs must be > 0");
    }

    match config.llm.provider.as_str() {
        "disabled" | "gemini" => {}
        other => anyhow::bail!(
            "Unknown llm provider: '{}'. Must be disabled or gemini.",
            other
        ),
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config: Config = toml::from_str(
            r#"
            [dataset]
            path = "ranking.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.provider, "disabled");
        assert_eq!(config.llm.model, "gemini-2.5-flash-lite");
        assert_eq!(config.llm.timeout_secs, 30);
        assert!(!config.llm.is_enabled());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [dataset]
            path = "ranking.csv"

            [llm]
            provider = "openai"
            "#,
        )
        .unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Unknown llm provider"));
    }

    #[test]
    fn test_gemini_provider_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [dataset]
            path = "ranking.csv"

            [llm]
            provider = "gemini"
            model = "gemini-2.5-flash-lite"
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.llm.is_enabled());
    }
}
