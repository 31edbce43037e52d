use config::{Config, Environment, File};
use quotecast_core::config::{AppConfig, ConfigError};

/// 配置文件路径的环境变量
pub const CONFIG_PATH_VAR: &str = "QUOTECAST_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "quotecast.toml";
const ENV_PREFIX: &str = "QUOTECAST";
const ENV_SEPARATOR: &str = "__";

/// # Summary
/// 加载并校验应用配置。
///
/// # Logic
/// 1. 读取可选的配置文件（默认 `quotecast.toml`，可由 `QUOTECAST_CONFIG` 覆盖）。
/// 2. 叠加 `QUOTECAST__<SECTION>__<KEY>` 形式的环境变量。
/// 3. 反序列化为 `AppConfig` 并校验。
///
/// # Returns
/// 缺少必填项或取值非法时返回 `ConfigError`。
pub fn load() -> Result<AppConfig, ConfigError> {
    let path =
        std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_from(&path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

fn load_from(path: &str, env: Environment) -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(env)
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let config: AppConfig = settings
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
