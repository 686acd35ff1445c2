//! YAML configuration loading with environment variable substitution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use forecast_client::{AirKoreaConfig, KakaoConfig, KmaConfig};

// ============================================================================
// Configuration (weather.yaml)
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub forecast: KmaConfig,
    #[serde(default)]
    pub air_quality: AirKoreaConfig,
    #[serde(default)]
    pub geocoder: KakaoConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Redis,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_backend")]
    pub backend: CacheBackend,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,
}

fn default_backend() -> CacheBackend {
    CacheBackend::Redis
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_memory_capacity() -> usize {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            redis_url: default_redis_url(),
            memory_capacity: default_memory_capacity(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load and parse a config file with environment variable substitution.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;

    parse_config(&content)
}

fn parse_config(content: &str) -> Result<AppConfig> {
    let expanded = expand_env_vars(content)?;

    let config: AppConfig =
        serde_yaml::from_str(&expanded).with_context(|| "Failed to parse config YAML")?;

    validate_config(&config)?;

    Ok(config)
}

/// Expand `${VAR}` and `${VAR:-default}` references.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::new();
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut var_expr = String::new();
            let mut brace_count = 1;

            while brace_count > 0 {
                match chars.next() {
                    Some('{') => {
                        brace_count += 1;
                        var_expr.push('{');
                    }
                    Some('}') => {
                        brace_count -= 1;
                        if brace_count > 0 {
                            var_expr.push('}');
                        }
                    }
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// Resolve `VAR` or `VAR:-default`; an empty value counts as unset.
fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}

fn validate_config(config: &AppConfig) -> Result<()> {
    for (name, timeout) in [
        ("forecast", config.forecast.timeout_secs),
        ("air_quality", config.air_quality.timeout_secs),
        ("geocoder", config.geocoder.timeout_secs),
    ] {
        anyhow::ensure!(timeout > 0, "{} timeout_secs must be greater than 0", name);
    }

    anyhow::ensure!(
        config.forecast.num_of_rows > 0,
        "forecast num_of_rows must be greater than 0"
    );

    match config.cache.backend {
        CacheBackend::Redis => anyhow::ensure!(
            !config.cache.redis_url.is_empty(),
            "cache redis_url cannot be empty for the redis backend"
        ),
        CacheBackend::Memory => anyhow::ensure!(
            config.cache.memory_capacity > 0,
            "cache memory_capacity must be greater than 0"
        ),
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_expand_env_vars_simple() {
        std::env::set_var("WEATHER_TEST_VAR", "test_value");
        let result = expand_env_vars("prefix_${WEATHER_TEST_VAR}_suffix").unwrap();
        assert_eq!(result, "prefix_test_value_suffix");
    }

    #[test]
    fn test_expand_env_vars_with_default() {
        std::env::remove_var("WEATHER_NONEXISTENT_VAR");
        let result = expand_env_vars("value_${WEATHER_NONEXISTENT_VAR:-default}_end").unwrap();
        assert_eq!(result, "value_default_end");
    }

    #[test]
    fn test_expand_env_vars_missing_required() {
        std::env::remove_var("WEATHER_REQUIRED_VAR");
        assert!(expand_env_vars("${WEATHER_REQUIRED_VAR}").is_err());
    }

    #[test]
    fn test_expand_env_vars_unclosed() {
        assert!(expand_env_vars("key: ${UNCLOSED").is_err());
    }

    #[test]
    fn test_resolve_var_expr_empty_uses_default() {
        std::env::set_var("WEATHER_EMPTY_VAR", "");
        assert_eq!(resolve_var_expr("WEATHER_EMPTY_VAR:-fallback").unwrap(), "fallback");
    }

    #[test]
    fn test_resolve_var_expr_override_default() {
        std::env::set_var("WEATHER_SET_VAR", "custom");
        assert_eq!(resolve_var_expr("WEATHER_SET_VAR:-default").unwrap(), "custom");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.forecast.num_of_rows, 1000);
        assert!(config.forecast.base_url.contains("getVilageFcst"));
    }

    #[test]
    fn test_parse_memory_backend() {
        std::env::set_var("WEATHER_TEST_KMA_KEY", "kma-secret");
        let config = parse_config(
            r#"
forecast:
  auth_key: "${WEATHER_TEST_KMA_KEY}"
  timeout_secs: 3
cache:
  backend: memory
  memory_capacity: 64
"#,
        )
        .unwrap();

        assert_eq!(config.forecast.auth_key, "kma-secret");
        assert_eq!(config.forecast.timeout_secs, 3);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.memory_capacity, 64);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = parse_config("geocoder:\n  timeout_secs: 0\n").unwrap_err();
        assert!(err.to_string().contains("geocoder"));
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cache:\n  backend: memory\n  memory_capacity: 8").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.cache.memory_capacity, 8);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_config("/nonexistent/weather.yaml").is_err());
    }

    #[test]
    fn test_shipped_config_parses() {
        std::env::set_var("KMA_AUTH_KEY", "from-env");
        let shipped = include_str!("../config/weather.yaml");
        let config = parse_config(shipped).unwrap();
        assert_eq!(config.forecast.auth_key, "from-env");
        assert_eq!(config.geocoder.timeout_secs, 5);
    }
}
