use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use anyhow::{Result, anyhow};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    /// API key for the Gemini service. The GEMINI_API_KEY environment
    /// variable takes precedence; without either the assistant runs in
    /// degraded mode and answers with static text.
    pub gemini_api_key: Option<String>,
    /// Override for the support form relay endpoint.
    pub support_endpoint: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Resolve the Gemini API key: environment first, then config file.
    pub fn resolve_gemini_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.gemini_api_key.clone())
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("healthguard").join("config.json"))
    }
}
