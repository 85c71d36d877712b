use std::sync::Arc;

use carewatch_core::{FileTokenStore, StaticTokenStore, TokenStore};

const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            log_level: "info".to_string(),
        }
    }
}

impl CliConfig {
    pub fn load() -> Self {
        load_dotenv_files();

        let api_url =
            std::env::var("CAREWATCH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let token = std::env::var("CAREWATCH_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        let log_level = std::env::var("CAREWATCH_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        Self {
            api_url,
            token,
            log_level,
        }
    }

    /// The session store: the env token when present, otherwise the session
    /// file the login flow persists under the platform config dir.
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        if let Some(token) = &self.token {
            return Arc::new(StaticTokenStore::new(token.clone()));
        }
        match FileTokenStore::default_path() {
            Some(path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(StaticTokenStore::empty()),
        }
    }
}

fn load_dotenv_files() {
    let current_dir = std::env::current_dir().ok();

    let env_paths = [
        current_dir.as_ref().map(|d| d.join(".env")),
        current_dir.as_ref().map(|d| d.join(".env.local")),
        dirs::config_dir().map(|d| d.join("carewatch").join(".env")),
    ];

    for path in env_paths.iter().flatten() {
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
