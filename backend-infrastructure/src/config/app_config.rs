use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::RuntimeConfig;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub cors_origins: Vec<String>,
    pub archive_dir: String,
    pub use_object_store: bool,
    pub bucket_endpoint: String,
    pub bucket_name: String,
    pub bucket_token: Option<String>,
    pub use_gemini: bool,
    pub openai_model: String,
    pub gemini_model: String,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub model_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
            archive_dir: "./memory".to_string(),
            use_object_store: false,
            bucket_endpoint: String::new(),
            bucket_name: String::new(),
            bucket_token: None,
            use_gemini: false,
            openai_model: "gpt-4o-mini".to_string(),
            gemini_model: "gemini-2.0-flash".to_string(),
            openai_api_key: None,
            gemini_api_key: None,
            max_body_bytes: 8 * 1024 * 1024,
            request_timeout_seconds: 120,
            model_timeout_seconds: 60,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("GUARDIAN_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.resolve_paths(base_dir);
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(token) = &self.bucket_token {
            if token.trim().is_empty() {
                self.bucket_token = None;
            }
        }
        if let Some(key) = &self.openai_api_key {
            if key.trim().is_empty() {
                self.openai_api_key = None;
            }
        }
        if let Some(key) = &self.gemini_api_key {
            if key.trim().is_empty() {
                self.gemini_api_key = None;
            }
        }
        self.bucket_endpoint = self.bucket_endpoint.trim().trim_end_matches('/').to_string();
        self.bucket_name = self.bucket_name.trim().to_string();
        self.cors_origins = self
            .cors_origins
            .iter()
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.archive_dir = resolve_path(base, &self.archive_dir);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.use_object_store && (self.bucket_endpoint.is_empty() || self.bucket_name.is_empty()) {
            return Err(anyhow!(
                "use_object_store requires bucket_endpoint and bucket_name"
            ));
        }
        if !self.use_object_store && self.archive_dir.trim().is_empty() {
            return Err(anyhow!("archive_dir must not be empty"));
        }
        if self.use_gemini && self.gemini_model.trim().is_empty() {
            return Err(anyhow!("gemini_model must not be empty"));
        }
        if !self.use_gemini && self.openai_model.trim().is_empty() {
            return Err(anyhow!("openai_model must not be empty"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            cors_origins: self.cors_origins.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    /// Identifier of the model the active backend will use.
    pub fn active_model_id(&self) -> &str {
        if self.use_gemini {
            &self.gemini_model
        } else {
            &self.openai_model
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("GUARDIAN_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("GUARDIAN_CORS_ORIGINS") {
            self.cors_origins = parse_env_list(&value);
        }
        if let Ok(value) = env::var("GUARDIAN_ARCHIVE_DIR") {
            self.archive_dir = value;
        }
        if let Ok(value) = env::var("GUARDIAN_USE_OBJECT_STORE") {
            self.use_object_store = value.parse().unwrap_or(self.use_object_store);
        }
        if let Ok(value) = env::var("GUARDIAN_BUCKET_ENDPOINT") {
            self.bucket_endpoint = value;
        }
        if let Ok(value) = env::var("GUARDIAN_BUCKET_NAME") {
            self.bucket_name = value;
        }
        if let Ok(value) = env::var("GUARDIAN_BUCKET_TOKEN") {
            self.bucket_token = Some(value);
        }
        if let Ok(value) = env::var("GUARDIAN_USE_GEMINI") {
            self.use_gemini = value.parse().unwrap_or(self.use_gemini);
        }
        if let Ok(value) = env::var("GUARDIAN_OPENAI_MODEL") {
            self.openai_model = value;
        }
        if let Ok(value) = env::var("GUARDIAN_GEMINI_MODEL") {
            self.gemini_model = value;
        }
        // API keys are honored both prefixed and bare; the bare names are the
        // conventional ones the hosting environment usually provides.
        if let Ok(value) = env::var("GUARDIAN_OPENAI_API_KEY").or_else(|_| env::var("OPENAI_API_KEY")) {
            self.openai_api_key = Some(value);
        }
        if let Ok(value) = env::var("GUARDIAN_GEMINI_API_KEY").or_else(|_| env::var("GEMINI_API_KEY")) {
            self.gemini_api_key = Some(value);
        }
        if let Ok(value) = env::var("GUARDIAN_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("GUARDIAN_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("GUARDIAN_MODEL_TIMEOUT_SECONDS") {
            self.model_timeout_seconds = value.parse().unwrap_or(self.model_timeout_seconds);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

fn parse_env_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}
