use serde::Deserialize;

/// Environment variable that overrides the default config path.
pub const CONFIG_ENV: &str = "DIGITSERVE_CONFIG";

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
}

#[derive(Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone)]
pub struct ModelConfig {
    /// Path to the SafeTensors checkpoint loaded at startup.
    pub ckpt_path: String,
}

/// Resolves the config file path: `DIGITSERVE_CONFIG` if set, `config.yaml` otherwise.
pub fn config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}
