// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub function: FunctionConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Extra access log line per request (carries the sanitized URL only)
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
}

/// HTTP trigger configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FunctionConfig {
    /// Function name, last route segment
    pub name: String,
    /// Route prefix in front of the function name (empty for none)
    pub route_prefix: String,
    /// Scheme assumed for origin-form requests (TLS terminates upstream)
    pub public_scheme: String,
    /// Take the scheme from `X-Forwarded-Proto` when present
    pub trust_forwarded_proto: bool,
}

impl FunctionConfig {
    /// Path the trigger listens on, e.g. `/api/smmsg`
    pub fn route(&self) -> String {
        let prefix = self.route_prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("/{}", self.name)
        } else {
            format!("/{prefix}/{}", self.name)
        }
    }
}

/// URL validation configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ValidationConfig {
    #[serde(default)]
    pub allowed_domains: AllowedDomainsConfig,
}

/// Host allow-list; inert unless `enabled`
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AllowedDomainsConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Hostnames accepted exactly and as dot-suffix (`example.com` admits `api.example.com`)
    #[serde(default)]
    pub domains: Vec<String>,
}

/// Routes configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RoutesConfig {
    /// Health check configuration
    #[serde(default)]
    pub health: HealthConfig,
}

/// Health check configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}
