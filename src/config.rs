use std::net::SocketAddr;
use std::path::PathBuf;

use crate::models::Actor;

/// Application-level constants
pub const APP_NAME: &str = "Clinic Portal";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP bind address (loopback only).
pub const DEFAULT_ADDR: &str = "127.0.0.1:8787";

/// Doctor used when a request does not name one.
pub const DEFAULT_ACTOR_ID: &str = "dr-james";
pub const DEFAULT_ACTOR_NAME: &str = "Dr. James Martin";

const ENV_ADDR: &str = "CLINIC_PORTAL_ADDR";
const ENV_DB: &str = "CLINIC_PORTAL_DB";
const ENV_ACTOR_ID: &str = "CLINIC_PORTAL_ACTOR_ID";
const ENV_ACTOR_NAME: &str = "CLINIC_PORTAL_ACTOR_NAME";
const ENV_SEED: &str = "CLINIC_PORTAL_SEED";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,clinic_portal_lib=debug,tower_http=info"
}

/// Get the application data directory
/// ~/ClinicPortal/ on all platforms
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("ClinicPortal"))
}

/// Default location for the SQLite store when persistence is requested
/// without an explicit path.
pub fn default_database_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join("portal.db"))
}

/// Where the portal keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Process-local; everything is gone on restart.
    Memory,
    Sqlite(PathBuf),
}

/// Startup configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub addr: SocketAddr,
    pub storage: StorageConfig,
    pub default_actor: Actor,
    pub seed_fixtures: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            storage: StorageConfig::Memory,
            default_actor: Actor::new(DEFAULT_ACTOR_ID, DEFAULT_ACTOR_NAME),
            seed_fixtures: true,
        }
    }
}

impl PortalConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let addr = match lookup(ENV_ADDR) {
            Some(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
                var: ENV_ADDR,
                reason: format!("{e}"),
            })?,
            None => defaults.addr,
        };

        let storage = match lookup(ENV_DB).filter(|s| !s.trim().is_empty()).as_deref() {
            Some("default") => StorageConfig::Sqlite(default_database_path().ok_or(
                ConfigError::Invalid {
                    var: ENV_DB,
                    reason: "cannot determine home directory".into(),
                },
            )?),
            Some(path) => StorageConfig::Sqlite(PathBuf::from(path)),
            None => StorageConfig::Memory,
        };

        let default_actor = Actor::new(
            lookup(ENV_ACTOR_ID).unwrap_or(defaults.default_actor.id),
            lookup(ENV_ACTOR_NAME).unwrap_or(defaults.default_actor.name),
        );

        let seed_fixtures = match lookup(ENV_SEED).as_deref() {
            None => true,
            Some("1") | Some("true") => true,
            Some("0") | Some("false") => false,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: ENV_SEED,
                    reason: format!("expected 0 or 1, got {other}"),
                })
            }
        };

        Ok(Self {
            addr,
            storage,
            default_actor,
            seed_fixtures,
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
    fn app_data_dir_under_home() {
        let dir = app_data_dir().unwrap();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("ClinicPortal"));
    }

    #[test]
    fn default_addr_matches_constant() {
        assert_eq!(PortalConfig::default().addr.to_string(), DEFAULT_ADDR);
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = PortalConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.storage, StorageConfig::Memory);
        assert_eq!(cfg.default_actor.id, "dr-james");
        assert_eq!(cfg.default_actor.name, "Dr. James Martin");
        assert!(cfg.seed_fixtures);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = PortalConfig::from_lookup(lookup(&[
            ("CLINIC_PORTAL_ADDR", "0.0.0.0:9000"),
            ("CLINIC_PORTAL_DB", "/tmp/portal.db"),
            ("CLINIC_PORTAL_ACTOR_ID", "dr-sarah"),
            ("CLINIC_PORTAL_ACTOR_NAME", "Dr. Sarah Johnson"),
            ("CLINIC_PORTAL_SEED", "0"),
        ]))
        .unwrap();
        assert_eq!(cfg.addr.port(), 9000);
        assert_eq!(cfg.storage, StorageConfig::Sqlite(PathBuf::from("/tmp/portal.db")));
        assert_eq!(cfg.default_actor, Actor::new("dr-sarah", "Dr. Sarah Johnson"));
        assert!(!cfg.seed_fixtures);
    }

    #[test]
    fn default_keyword_uses_app_data_dir() {
        let cfg = PortalConfig::from_lookup(lookup(&[("CLINIC_PORTAL_DB", "default")])).unwrap();
        match cfg.storage {
            StorageConfig::Sqlite(path) => {
                assert!(path.starts_with(app_data_dir().unwrap()));
                assert!(path.ends_with("portal.db"));
            }
            other => panic!("expected sqlite storage, got {other:?}"),
        }
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(PortalConfig::from_lookup(lookup(&[("CLINIC_PORTAL_ADDR", "nowhere")])).is_err());
        assert!(PortalConfig::from_lookup(lookup(&[("CLINIC_PORTAL_SEED", "maybe")])).is_err());
    }

    #[test]
    fn default_log_filter_parses_with_http_spans() {
        let filter = tracing_subscriber::EnvFilter::try_new(default_log_filter());
        assert!(filter.is_ok());
        assert!(default_log_filter().contains("tower_http="));
    }

    #[test]
    fn app_name_is_clinic_portal() {
        assert_eq!(APP_NAME, "Clinic Portal");
    }
}
