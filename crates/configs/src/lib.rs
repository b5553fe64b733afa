use anyhow::anyhow;
use anyhow::Result;
use std::io::ErrorKind;
use serde::Deserialize;

pub mod env;

pub use env::{
    get_public_config, get_server_config, validate_env, ConfigError, PublicConfig, ServerConfig,
};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: HttpConfig,
}

/// Listen address and runtime sizing for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_or_env() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_or_env_with(&path, |k| std::env::var(k).ok())
    }

    /// TOML first. Only a missing file falls back to `SERVER_HOST`/`SERVER_PORT`/
    /// `TOKIO_WORKER_THREADS`; an unreadable or malformed file is an error.
    pub fn load_or_env_with<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => load_from_str(&content).map_err(|e| anyhow!("{path}: {e}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_lookup(&lookup)?,
            Err(e) => return Err(anyhow!("cannot read {path}: {e}")),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut server = HttpConfig::default();
        if let Some(host) = lookup("SERVER_HOST") {
            server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow!("SERVER_PORT must be a number in 1..=65535, got {port:?}"))?;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS") {
            let threads: usize = w
                .trim()
                .parse()
                .map_err(|_| anyhow!("TOKIO_WORKER_THREADS must be a positive number, got {w:?}"))?;
            server.worker_threads = Some(threads);
        }
        Ok(AppConfig { server })
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()
    }
}

impl HttpConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
