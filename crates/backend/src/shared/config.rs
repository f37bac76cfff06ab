use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub crm: CrmConfig,
    pub import: ImportConfig,
}

/// Подключение к внешнему CRM API
#[derive(Debug, Deserialize, Clone)]
pub struct CrmConfig {
    pub base_url: String,
    pub api_token: String,
}

/// Политика throttling для bulk-отправки строк импорта
#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Максимум запросов в одно окно
    pub rate_limit_requests: u32,
    /// Длина окна в миллисекундах
    pub rate_limit_window_ms: u64,
    /// Сколько часов хранить завершенные сессии прогресса
    pub session_ttl_hours: i64,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[crm]
base_url = "http://localhost:8080"
api_token = ""

[import]
rate_limit_requests = 10
rate_limit_window_ms = 1000
session_ttl_hours = 24
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}
