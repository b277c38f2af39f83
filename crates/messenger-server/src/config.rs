use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Server settings, read from `MESSENGER_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub table: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = lookup("MESSENGER_DB_PATH").unwrap_or_else(|| "messenger.db".into());
        let table = lookup("MESSENGER_TABLE").unwrap_or_else(|| "messenger".into());
        let host = lookup("MESSENGER_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = lookup("MESSENGER_PORT")
            .unwrap_or_else(|| "8000".into())
            .parse()
            .context("MESSENGER_PORT must be a port number")?;

        Ok(Self {
            db_path: db_path.into(),
            table,
            host,
            port,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(
            config,
            Config {
                db_path: "messenger.db".into(),
                table: "messenger".into(),
                host: "0.0.0.0".into(),
                port: 8000,
            }
        );
        assert_eq!(config.addr().unwrap().port(), 8000);
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            ("MESSENGER_DB_PATH", "/tmp/inbox.db"),
            ("MESSENGER_TABLE", "inbox"),
            ("MESSENGER_HOST", "127.0.0.1"),
            ("MESSENGER_PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/inbox.db"));
        assert_eq!(config.table, "inbox");
        assert_eq!(config.addr().unwrap().to_string(), "127.0.0.1:9000");
    }

    #[test]
    fn bad_port_is_rejected() {
        assert!(Config::from_lookup(lookup(&[("MESSENGER_PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("MESSENGER_PORT", "70000")])).is_err());
    }

    #[test]
    fn bad_host_is_rejected() {
        let config = Config::from_lookup(lookup(&[("MESSENGER_HOST", "not a host")])).unwrap();
        assert!(config.addr().is_err());
    }
}
