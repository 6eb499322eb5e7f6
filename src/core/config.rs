//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults. Identity-provider
//! settings are mandatory when the authenticated HTTP transport is selected:
//! the server refuses to start misconfigured.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::{Error, Result};
use super::transport::TransportConfig;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Identity-provider and resource metadata settings.
    pub auth: AuthConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Identity-provider configuration for bearer-token validation.
///
/// `issuer` and `audience` are required whenever the HTTP transport is in
/// use; their absence is a fatal startup condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// OIDC issuer URL tokens must originate from (e.g.
    /// `https://login.example.com/tenant/v2.0`).
    pub issuer: String,

    /// Expected `aud` claim (e.g. `api://my-client-id`).
    pub audience: String,

    /// Scope name advertised in the protected-resource metadata.
    pub scope: String,

    /// Public URL of this server, used as the protected resource identifier.
    pub server_url: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: String::new(),
            audience: String::new(),
            scope: "mcp.tool".to_string(),
            server_url: "http://localhost:5115/".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "todo-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            auth: AuthConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_AUTH_ISSUER`.
    ///
    /// Returns an error when the selected transport requires bearer
    /// authentication and `MCP_AUTH_ISSUER` or `MCP_AUTH_AUDIENCE` is unset.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        // Load identity-provider settings
        if let Ok(issuer) = std::env::var("MCP_AUTH_ISSUER") {
            config.auth.issuer = issuer;
        }
        if let Ok(audience) = std::env::var("MCP_AUTH_AUDIENCE") {
            config.auth.audience = audience;
        }
        if let Ok(scope) = std::env::var("MCP_AUTH_SCOPE") {
            config.auth.scope = scope;
        }
        if let Ok(server_url) = std::env::var("MCP_SERVER_URL") {
            config.auth.server_url = server_url;
        }

        if config.transport.requires_auth() {
            if config.auth.issuer.is_empty() {
                return Err(Error::config(
                    "MCP_AUTH_ISSUER is required for the HTTP transport",
                ));
            }
            if config.auth.audience.is_empty() {
                return Err(Error::config(
                    "MCP_AUTH_AUDIENCE is required for the HTTP transport",
                ));
            }
            info!(
                "Bearer authentication enabled (issuer: {}, audience: {})",
                config.auth.issuer, config.auth.audience
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn clear_auth_env() {
        unsafe {
            std::env::remove_var("MCP_AUTH_ISSUER");
            std::env::remove_var("MCP_AUTH_AUDIENCE");
            std::env::remove_var("MCP_AUTH_SCOPE");
            std::env::remove_var("MCP_TRANSPORT");
        }
    }

    #[test]
    fn test_auth_defaults() {
        let auth = AuthConfig::default();
        assert_eq!(auth.scope, "mcp.tool");
        assert_eq!(auth.server_url, "http://localhost:5115/");
        assert!(auth.issuer.is_empty());
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_requires_issuer_and_audience() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_auth_env();
        unsafe {
            std::env::set_var("MCP_TRANSPORT", "http");
        }

        let result = Config::from_env();
        assert!(result.is_err());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("MCP_AUTH_ISSUER"));

        clear_auth_env();
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_with_auth_settings() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_auth_env();
        unsafe {
            std::env::set_var("MCP_TRANSPORT", "http");
            std::env::set_var("MCP_AUTH_ISSUER", "https://login.example.com/t/v2.0");
            std::env::set_var("MCP_AUTH_AUDIENCE", "api://client-id");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.auth.issuer, "https://login.example.com/t/v2.0");
        assert_eq!(config.auth.audience, "api://client-id");
        assert_eq!(config.auth.scope, "mcp.tool");

        clear_auth_env();
    }

    #[cfg(feature = "stdio")]
    #[test]
    fn test_stdio_does_not_require_auth_settings() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_auth_env();
        unsafe {
            std::env::set_var("MCP_TRANSPORT", "stdio");
        }

        let config = Config::from_env().unwrap();
        assert!(!config.transport.requires_auth());

        clear_auth_env();
    }
}
