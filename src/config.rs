use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArcadiaConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub chat: ChatConfig,
    pub research: ResearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub memory_dir: String,
    pub temp_dir: String,
    pub default_user: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the local runtime (Ollama / llama.cpp server compatible).
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub models_dir: String,
    pub model_file: String,
    pub model_url: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChatConfig {
    pub max_context: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ResearchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub hits_per_backend: usize,
    pub max_pages: usize,
    pub excerpt_chars: usize,
}

impl Default for ArcadiaConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            llm: LlmConfig::default(),
            chat: ChatConfig::default(),
            research: ResearchConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            host: "127.0.0.1".into(),
            port: 8765,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            memory_dir: "~/.arcadia/memory".into(),
            temp_dir: "~/.arcadia/temp".into(),
            default_user: "default".into(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".into(),
            model: "phi4-mini".into(),
            max_tokens: 512,
            temperature: 0.7,
            models_dir: "~/.arcadia/models".into(),
            model_file: "phi-4-mini-q4_k_m.gguf".into(),
            model_url:
                "https://huggingface.co/TheBloke/phi-4-mini-GGUF/resolve/main/phi-4-mini-Q4_K_M.gguf"
                    .into(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { max_context: 30 }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
            hits_per_backend: 3,
            max_pages: 3,
            excerpt_chars: 2000,
        }
    }
}

/// Returns `~/.arcadia/`
pub fn default_arcadia_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".arcadia")
}

/// Returns the default config file path: `~/.arcadia/config.toml`
pub fn default_config_path() -> PathBuf {
    default_arcadia_dir().join("config.toml")
}

impl ArcadiaConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            ArcadiaConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (ARCADIA_MEMORY_DIR, ARCADIA_USER,
    /// ARCADIA_LOG_LEVEL, ARCADIA_LLM_URL, ARCADIA_MODEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ARCADIA_MEMORY_DIR") {
            self.storage.memory_dir = val;
        }
        if let Ok(val) = std::env::var("ARCADIA_USER") {
            self.storage.default_user = val;
        }
        if let Ok(val) = std::env::var("ARCADIA_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("ARCADIA_LLM_URL") {
            self.llm.base_url = val;
        }
        if let Ok(val) = std::env::var("ARCADIA_MODEL") {
            self.llm.model = val;
        }
    }

    pub fn resolved_memory_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.memory_dir)
    }

    pub fn resolved_temp_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.temp_dir)
    }

    /// Full path of the GGUF model file the runtime is expected to serve.
    pub fn resolved_model_path(&self) -> PathBuf {
        expand_tilde(&self.llm.models_dir).join(&self.llm.model_file)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
