use anyhow::{bail, Context, Result};
use std::env;

/// Process configuration, read once at boot.
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage table holding the items. Required.
    pub table_name: String,
    /// PostgreSQL connection string. Optional only in dev mode.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env(dev_mode: bool) -> Result<Self> {
        Self::from_lookup(dev_mode, |key| env::var(key).ok())
    }

    fn from_lookup(dev_mode: bool, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let table_name = lookup("TABLE_NAME")
            .filter(|t| !t.trim().is_empty())
            .context("TABLE_NAME environment variable is required")?;
        if !is_identifier(&table_name) {
            bail!(
                "TABLE_NAME must be a plain identifier ([A-Za-z_][A-Za-z0-9_]*), got {:?}",
                table_name
            );
        }

        let database_url = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty());
        if database_url.is_none() && !dev_mode {
            bail!("DATABASE_URL must be set (or pass --dev-mode to use the in-memory store)");
        }

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(p) => p
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", p))?,
            None => 3000,
        };

        Ok(Self {
            table_name,
            database_url,
            host,
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
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
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn missing_table_name_fails() {
        let err = Config::from_lookup(true, lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("TABLE_NAME"));
    }

    #[test]
    fn table_name_must_be_identifier() {
        let err = Config::from_lookup(true, lookup(&[("TABLE_NAME", "items; drop")])).unwrap_err();
        assert!(err.to_string().contains("plain identifier"));
        assert!(Config::from_lookup(true, lookup(&[("TABLE_NAME", "1items")])).is_err());
    }

    #[test]
    fn database_url_required_outside_dev_mode() {
        let vars = [("TABLE_NAME", "items")];
        assert!(Config::from_lookup(false, lookup(&vars)).is_err());
        let config = Config::from_lookup(true, lookup(&vars)).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn defaults_host_and_port() {
        let config = Config::from_lookup(
            false,
            lookup(&[
                ("TABLE_NAME", "crud_items"),
                ("DATABASE_URL", "postgres://localhost/app"),
            ]),
        )
        .unwrap();
        assert_eq!(config.table_name, "crud_items");
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn bad_port_fails() {
        let vars = [("TABLE_NAME", "items"), ("PORT", "http")];
        assert!(Config::from_lookup(true, lookup(&vars)).is_err());
    }
}
