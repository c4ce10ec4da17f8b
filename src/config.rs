use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_CACHE_TTL_SECS: u64 = 30;

/// Client settings, read from the environment with sensible defaults.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub debounce: Duration,
    pub cache_ttl: Duration,
    pub export_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            export_dir: std::env::temp_dir(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("INVENTORY_API_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let debounce =
            Duration::from_millis(env_u64("INVENTORY_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS));
        let cache_ttl =
            Duration::from_secs(env_u64("INVENTORY_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS));
        let export_dir = std::env::var("INVENTORY_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir());
        ClientConfig { base_url, debounce, cache_ttl, export_dir }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring non-numeric {}={}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.debounce, Duration::from_millis(300));
        assert_eq!(cfg.cache_ttl, Duration::from_secs(30));
        assert!(cfg.base_url.starts_with("http"));
    }
}
