//! API Configuration Module
//!
//! Bind address and CORS settings for the HTTP server, loaded from
//! environment variables with permissive development defaults.

use std::net::SocketAddr;

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Host the server binds to.
    pub bind: String,

    pub port: u16,

    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
            cors_allow_credentials: false,
            cors_max_age_secs: 86400,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `QUORUM_API_BIND`: host to bind (default: 0.0.0.0)
    /// - `PORT` or `QUORUM_API_PORT`: port (default: 8000)
    /// - `QUORUM_CORS_ORIGINS`: comma-separated allowed origins (empty = allow all)
    /// - `QUORUM_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `QUORUM_CORS_MAX_AGE_SECS`: preflight cache duration (default: 86400)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cors_origins = lookup("QUORUM_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let port = lookup("PORT")
            .or_else(|| lookup("QUORUM_API_PORT"))
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        Self {
            bind: lookup("QUORUM_API_BIND")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.bind),
            port,
            cors_origins,
            cors_allow_credentials: lookup("QUORUM_CORS_ALLOW_CREDENTIALS")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
            cors_max_age_secs: lookup("QUORUM_CORS_MAX_AGE_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.cors_max_age_secs),
        }
    }

    /// Resolve the socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.bind, self.port).parse()
    }

    /// Check if running in production mode (strict CORS).
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            return true;
        }

        self.cors_origins.iter().any(|allowed| {
            if allowed == origin {
                return true;
            }
            // Wildcard subdomains: *.example.org
            if let Some(pattern) = allowed.strip_prefix("*.") {
                if let Some(origin_domain) = origin.strip_prefix("https://") {
                    return origin_domain == pattern
                        || origin_domain.ends_with(&format!(".{}", pattern));
                }
            }
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.bind_addr().unwrap().port(), 8000);
        assert!(!config.is_production());
    }

    #[test]
    fn test_port_precedence() {
        let config = ApiConfig::from_lookup(lookup(&[("PORT", "9100"), ("QUORUM_API_PORT", "9200")]));
        assert_eq!(config.port, 9100);

        let config = ApiConfig::from_lookup(lookup(&[("QUORUM_API_PORT", "9200")]));
        assert_eq!(config.port, 9200);

        let config = ApiConfig::from_lookup(lookup(&[("PORT", "not-a-port")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_cors_origins_parsing() {
        let config = ApiConfig::from_lookup(lookup(&[(
            "QUORUM_CORS_ORIGINS",
            "https://quorum.run, ,https://*.quorum.run",
        )]));
        assert_eq!(config.cors_origins.len(), 2);
        assert!(config.is_production());
    }

    #[test]
    fn test_origin_allowed_production() {
        let config = ApiConfig {
            cors_origins: vec!["https://quorum.run".to_string(), "*.quorum.run".to_string()],
            ..ApiConfig::default()
        };
        assert!(config.is_origin_allowed("https://quorum.run"));
        assert!(config.is_origin_allowed("https://app.quorum.run"));
        assert!(!config.is_origin_allowed("https://evilquorum.run"));
        assert!(!config.is_origin_allowed("http://localhost:3000"));
    }

    #[test]
    fn test_bad_bind_host() {
        let config = ApiConfig {
            bind: "not a host".to_string(),
            ..ApiConfig::default()
        };
        assert!(config.bind_addr().is_err());
    }
}
