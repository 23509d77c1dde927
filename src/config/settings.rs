//! Process settings from environment variables (a `.env` file is honoured by the binary).

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub store: StoreKind,
    /// Preset name or path to a JSON resource definition.
    pub resource: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub body_limit_bytes: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("STORE").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Env {
                    name: "STORE",
                    message: format!("expected 'postgres' or 'memory', got '{}'", other),
                })
            }
        };
        Ok(Settings {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost/resource_api".into()),
            store,
            resource: lookup("RESOURCE").unwrap_or_else(|| "posts".into()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".into()),
            max_connections: parse_var(&lookup, "MAX_CONNECTIONS", 5)?,
            body_limit_bytes: parse_var(&lookup, "BODY_LIMIT_BYTES", 1024 * 1024)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Env {
            name,
            message: e.to_string(),
        }),
    }
}
