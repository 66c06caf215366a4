use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub environment: String,
    pub api_prefix: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub trusted_hosts: Vec<String>,
    pub rate_limit_enabled: bool,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst_size: u32,
    pub request_timeout_seconds: u64,
    pub max_body_bytes: usize,
    pub category_catalog_path: Option<String>,
    pub keyword_table_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            app_name: env_or("APP_NAME", "Fintrack API"),
            environment: env_or("ENVIRONMENT", "development"),
            api_prefix: normalize_prefix(&env_or("API_PREFIX", "/v1")),
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse_or("PORT", 8000),
            cors_origins: parse_csv(&env_or("CORS_ORIGINS", "http://localhost:5173")),
            trusted_hosts: parse_csv(&env_or("TRUSTED_HOSTS", "localhost,127.0.0.1")),
            rate_limit_enabled: env_parse_bool_or("RATE_LIMIT_ENABLED", true),
            rate_limit_per_second: env_parse_or("RATE_LIMIT_PER_SECOND", 10),
            rate_limit_burst_size: env_parse_or("RATE_LIMIT_BURST_SIZE", 100),
            request_timeout_seconds: env_parse_or("REQUEST_TIMEOUT_SECONDS", 30),
            max_body_bytes: env_parse_or("MAX_BODY_BYTES", 256 * 1024),
            category_catalog_path: env_opt("CATEGORY_CATALOG_PATH"),
            keyword_table_path: env_opt("KEYWORD_TABLE_PATH"),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.trim().eq_ignore_ascii_case("production")
    }

    /// Any host is accepted when the list contains `*`.
    pub fn allows_any_host(&self) -> bool {
        self.trusted_hosts.iter().any(|host| host.trim() == "*")
    }
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_parse_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    env_opt(key)
        .and_then(|raw| raw.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_parse_bool_or(key: &str, default: bool) -> bool {
    parse_bool(env_opt(key).as_deref()).unwrap_or(default)
}

fn parse_bool(raw: Option<&str>) -> Option<bool> {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("1" | "true" | "yes" | "on") => Some(true),
        Some("0" | "false" | "no" | "off") => Some(false),
        _ => None,
    }
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn normalize_prefix(raw: &str) -> String {
    let mut prefix = raw.trim().to_string();
    if prefix.is_empty() {
        return "/v1".to_string();
    }
    if !prefix.starts_with('/') {
        prefix.insert(0, '/');
    }
    while prefix.ends_with('/') && prefix.len() > 1 {
        prefix.pop();
    }
    prefix
}

#[cfg(test)]
impl AppConfig {
    pub fn for_tests() -> Self {
        Self {
            app_name: "Fintrack API".to_string(),
            environment: "test".to_string(),
            api_prefix: "/v1".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            trusted_hosts: vec!["localhost".to_string(), "127.0.0.1".to_string()],
            rate_limit_enabled: false,
            rate_limit_per_second: 10,
            rate_limit_burst_size: 100,
            request_timeout_seconds: 5,
            max_body_bytes: 64 * 1024,
            category_catalog_path: None,
            keyword_table_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_prefix, parse_bool, parse_csv, AppConfig};

    #[test]
    fn normalizes_prefix() {
        assert_eq!(normalize_prefix("v1"), "/v1");
        assert_eq!(normalize_prefix("/v1/"), "/v1");
        assert_eq!(normalize_prefix(""), "/v1");
        assert_eq!(normalize_prefix(" /api/v2// "), "/api/v2");
    }

    #[test]
    fn parses_bool_flags() {
        assert_eq!(parse_bool(Some("YES")), Some(true));
        assert_eq!(parse_bool(Some("off")), Some(false));
        assert_eq!(parse_bool(Some("maybe")), None);
        assert_eq!(parse_bool(None), None);
    }

    #[test]
    fn csv_drops_blank_items() {
        assert_eq!(
            parse_csv(" localhost, ,127.0.0.1 ,"),
            vec!["localhost".to_string(), "127.0.0.1".to_string()]
        );
    }

    #[test]
    fn wildcard_host_detection() {
        let mut config = AppConfig::for_tests();
        assert!(!config.allows_any_host());
        config.trusted_hosts.push(" * ".to_string());
        assert!(config.allows_any_host());
        assert!(!config.is_production());
    }
}
