use crate::error::{Result, VinculoError};
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VinculoConfig {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_web_port")]
    pub port: u16,
    #[serde(default = "default_web_host")]
    pub host: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            host: default_web_host(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Start with the demo projects instead of an empty store.
    #[serde(default = "default_true")]
    pub seed: bool,
    /// Sleep before each store call to mimic a remote database.
    #[serde(default)]
    pub simulate_latency: bool,
    /// Multiplier applied to the per-operation delays.
    #[serde(default = "default_latency_scale")]
    pub latency_scale: f64,
    /// Number of projects `recent` returns when the caller gives no count.
    #[serde(default = "default_recent_count")]
    pub recent_default: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed: true,
            simulate_latency: false,
            latency_scale: default_latency_scale(),
            recent_default: default_recent_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub env_var: Option<String>,
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_llm_provider(),
            model: default_llm_model(),
            api_key: None,
            base_url: None,
            env_var: None,
            max_tokens: default_llm_max_tokens(),
        }
    }
}

/// Valid LLM provider names.
pub const VALID_LLM_PROVIDERS: &[&str] = &["ollama", "openai", "gemini", "anthropic", "claude"];

// -- Defaults --

fn default_web_port() -> u16 {
    9002
}
fn default_web_host() -> String {
    "127.0.0.1".to_string()
}
fn default_true() -> bool {
    true
}
fn default_latency_scale() -> f64 {
    1.0
}
fn default_recent_count() -> usize {
    3
}
fn default_llm_provider() -> String {
    "gemini".to_string()
}
fn default_llm_model() -> String {
    "gemini-2.0-flash".to_string()
}
fn default_llm_max_tokens() -> usize {
    1024
}

impl VinculoConfig {
    /// Load configuration with three-layer TOML merge:
    /// 1. ~/.config/vinculo/config.toml (global)
    /// 2. .vinculo/config.toml (project)
    /// 3. .vinculo/config.local.toml (local, gitignored)
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let project_config = dir.join(".vinculo").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            let local_config = dir.join(".vinculo").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        let config = builder
            .build()
            .map_err(|e| VinculoError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| VinculoError::Config(e.to_string()))?;

        cfg.validate();
        Ok(cfg)
    }

    /// Defaults only (no files).
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Fix out-of-range values and return a warning for each one.
    /// Lenient: never rejects the config.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.store.latency_scale.is_finite() || self.store.latency_scale < 0.0 {
            warnings.push(format!(
                "store.latency_scale = {} is not a non-negative number, setting to 0",
                self.store.latency_scale
            ));
            self.store.latency_scale = 0.0;
        }

        if self.store.recent_default == 0 {
            warnings.push("store.recent_default = 0, setting to 1".to_string());
            self.store.recent_default = 1;
        }

        // Only checked when enabled: a disabled block may hold placeholders.
        if self.llm.enabled && !VALID_LLM_PROVIDERS.contains(&self.llm.provider.as_str()) {
            warnings.push(format!(
                "unknown LLM provider '{}', valid: {}",
                self.llm.provider,
                VALID_LLM_PROVIDERS.join(", ")
            ));
        }

        if self.llm.max_tokens == 0 {
            warnings.push("llm.max_tokens = 0, setting to 256".to_string());
            self.llm.max_tokens = 256;
        }

        if self.web.host.trim().is_empty() {
            warnings.push(format!(
                "web.host is empty, setting to {}",
                default_web_host()
            ));
            self.web.host = default_web_host();
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vinculo").join("config.toml"))
}

/// Resolve an API key: check config field first, then environment variable.
pub fn resolve_api_key(config: &LlmConfig, default_env_var: &str) -> Result<String> {
    if let Some(ref key) = config.api_key {
        if !key.is_empty() {
            return Ok(key.clone());
        }
    }

    let env_var_name = config.env_var.as_deref().unwrap_or(default_env_var);

    std::env::var(env_var_name).map_err(|_| {
        VinculoError::Config(format!(
            "{} LLM provider requires an API key (set llm.api_key or {})",
            config.provider, env_var_name
        ))
    })
}
