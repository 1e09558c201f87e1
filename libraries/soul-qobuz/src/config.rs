/// Client configuration
use crate::error::{QobuzError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Application id issued by Qobuz
    #[serde(default)]
    pub app_id: String,

    /// Application secret, needed for signed requests
    #[serde(default)]
    pub app_secret: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ClientConfig {
    /// Config with defaults and the given app id.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Self::default()
        }
    }

    pub fn with_secret(mut self, app_secret: impl Into<String>) -> Self {
        self.app_secret = Some(app_secret.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path.filter(|p| p.exists()) {
            settings = settings.add_source(config::File::from(path));
        }

        // Override with environment variables (e.g. QOBUZ_APP_ID)
        settings = settings.add_source(config::Environment::with_prefix("QOBUZ").try_parsing(true));

        let config: Self = settings
            .build()
            .map_err(|e| QobuzError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| QobuzError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.app_id.is_empty() {
            return Err(QobuzError::Config(
                "app id is required (set QOBUZ_APP_ID)".to_string(),
            ));
        }

        if self.base_url.is_empty() {
            return Err(QobuzError::InvalidUrl("URL cannot be empty".into()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(QobuzError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        url::Url::parse(&self.base_url).map_err(|e| QobuzError::InvalidUrl(e.to_string()))?;

        Ok(())
    }
}

// Default values
fn default_base_url() -> String {
    "https://www.qobuz.com/api.json/0.2".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("SoulPlayer/{} (Qobuz)", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            app_id: String::new(),
            app_secret: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}
