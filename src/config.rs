use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Clinic";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DB_PATH: &str = "clinic.db";
/// Token lifetime: 24 hours.
pub const DEFAULT_JWT_EXPIRATION_SECS: i64 = 86_400;

const DEV_JWT_SECRET: &str = "clinic-development-secret-change-me";

/// Default tracing directive when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "clinic_lib=info,clinic=info,tower_http=info"
}

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub jwt_expiration_secs: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup("CLINIC_ADDR").unwrap_or_else(|| DEFAULT_ADDR.into());
        let addr = raw_addr.parse().map_err(|_| ConfigError::Invalid {
            key: "CLINIC_ADDR",
            value: raw_addr.clone(),
        })?;

        let db_path = lookup("CLINIC_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let jwt_expiration_secs = match lookup("JWT_EXPIRATION_SECS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "JWT_EXPIRATION_SECS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_JWT_EXPIRATION_SECS,
        };

        Ok(Self {
            addr,
            db_path,
            jwt_secret,
            jwt_expiration_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.db_path, PathBuf::from("clinic.db"));
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.jwt_expiration_secs, 86_400);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("CLINIC_ADDR", "127.0.0.1:9000"),
            ("CLINIC_DB_PATH", "/tmp/x.db"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRATION_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.jwt_expiration_secs, 60);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(ServerConfig::from_lookup(lookup_from(&[("CLINIC_ADDR", "nope")])).is_err());
        assert!(
            ServerConfig::from_lookup(lookup_from(&[("JWT_EXPIRATION_SECS", "-5")])).is_err()
        );
    }

    #[test]
    fn app_name_is_clinic() {
        assert_eq!(APP_NAME, "Clinic");
    }
}
