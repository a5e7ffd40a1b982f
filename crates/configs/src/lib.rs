use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: JwtConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_acquire_timeout() -> u64 { 30 }

// Pool sizes must match the serde defaults; a derived Default would
// zero them and produce a pool nothing can acquire from.
impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

/// Token signing configuration. Loaded once at startup and passed by
/// reference into the token service; never ambient global state.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    #[serde(default = "default_jwt_secret")]
    pub secret: String,
    #[serde(default = "default_jwt_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_jwt_ttl")]
    pub ttl_minutes: i64,
}

fn default_jwt_secret() -> String { "dev-secret-change-me".into() }
fn default_jwt_algorithm() -> String { "HS256".into() }
fn default_jwt_ttl() -> i64 { 60 }

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
            algorithm: default_jwt_algorithm(),
            ttl_minutes: default_jwt_ttl(),
        }
    }
}

impl JwtConfig {
    /// Fill unset fields from `JWT_SECRET`, `JWT_ALGORITHM` and
    /// `JWT_EXPIRE_MINUTES` environment variables.
    pub fn overlay_env(&mut self) {
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.secret = secret;
        }
        if let Ok(alg) = std::env::var("JWT_ALGORITHM") {
            self.algorithm = alg;
        }
        if let Ok(ttl) = std::env::var("JWT_EXPIRE_MINUTES") {
            if let Ok(mins) = ttl.parse::<i64>() {
                self.ttl_minutes = mins;
            }
        }
    }
}

/// Load from `path` if it exists. A missing file means "run on defaults";
/// a file that exists but fails to read or parse is an error, never a
/// silent fallback.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            toml::from_str(&content).map_err(|e| anyhow!("invalid config file {path}: {e}"))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow!("cannot read config file {path}: {e}")),
    }
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = load_or_default(&path)?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.auth.overlay_env();
        if self.auth.ttl_minutes <= 0 {
            return Err(anyhow!("auth.ttl_minutes must be positive"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // TOML takes precedence; fall back to DATABASE_URL
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_defaults() {
        let cfg = JwtConfig::default();
        assert_eq!(cfg.algorithm, "HS256");
        assert_eq!(cfg.ttl_minutes, 60);
    }

    #[test]
    fn server_defaults() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn database_defaults_give_usable_pool() {
        let cfg = DatabaseConfig::default();
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.min_connections, 2);
        assert_eq!(cfg.acquire_timeout_secs, 30);
        // The env-only path goes through AppConfig::default too
        assert_eq!(AppConfig::default().database.max_connections, 10);
    }

    #[test]
    fn missing_database_section_keeps_pool_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.database.acquire_timeout_secs, 30);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("loyalty_cfg_does_not_exist.toml");
        let cfg = load_or_default(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn malformed_file_is_an_error_not_defaults() {
        let path = std::env::temp_dir().join("loyalty_cfg_malformed.toml");
        std::fs::write(&path, "[server\nport = not-a-number").unwrap();
        let err = load_or_default(path.to_str().unwrap());
        assert!(err.is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn parse_full_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "postgres://localhost/loyalty"

            [auth]
            secret = "s3cret"
            ttl_minutes = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.auth.secret, "s3cret");
        assert_eq!(cfg.auth.ttl_minutes, 5);
    }
}
