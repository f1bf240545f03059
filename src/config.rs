use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;

pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["https://tanguyhardion.github.io"];

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_reasoning_effort: Option<String>,
    pub allowed_origins: Vec<String>,
    pub log_store: Option<LogStoreConfig>,
}

#[derive(Debug, Clone)]
pub struct LogStoreConfig {
    pub url: String,
    pub key: String,
    pub table: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = get_var(&lookup, "OPENAI_API_KEY")?;

        let openai_reasoning_effort = match lookup("OPENAI_REASONING_EFFORT") {
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(raw.trim().to_string()),
            None => Some("minimal".to_string()),
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| {
                DEFAULT_ALLOWED_ORIGINS
                    .iter()
                    .map(|o| o.to_string())
                    .collect()
            });

        let log_store = match (non_empty(&lookup, "SUPABASE_URL"), non_empty(&lookup, "SUPABASE_KEY")) {
            (Some(url), Some(key)) => Some(LogStoreConfig {
                url: url.trim_end_matches('/').to_string(),
                key,
                table: get_var_or(&lookup, "LOG_TABLE", "logs"),
            }),
            _ => None,
        };

        Ok(Self {
            server_address: get_var_or(&lookup, "SERVER_ADDRESS", "0.0.0.0:3000"),
            openai_api_key,
            openai_base_url: get_var_or(&lookup, "OPENAI_BASE_URL", "https://api.openai.com/v1")
                .trim_end_matches('/')
                .to_string(),
            openai_model: get_var_or(&lookup, "OPENAI_MODEL", "gpt-5-nano"),
            openai_reasoning_effort,
            allowed_origins,
            log_store,
        })
    }
}

fn get_var<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, name)
        .ok_or_else(|| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_var_or<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, name).unwrap_or_else(|| default.to_string())
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_api_key_fails_fast() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("OPENAI_API_KEY")));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.server_address, "0.0.0.0:3000");
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.openai_model, "gpt-5-nano");
        assert_eq!(config.openai_reasoning_effort.as_deref(), Some("minimal"));
        assert_eq!(config.allowed_origins, vec!["https://tanguyhardion.github.io"]);
        assert!(config.log_store.is_none());
    }

    #[test]
    fn empty_reasoning_effort_disables_it() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_REASONING_EFFORT", ""),
        ]))
        .unwrap();
        assert!(config.openai_reasoning_effort.is_none());
    }

    #[test]
    fn log_store_needs_both_url_and_key() {
        let only_url = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SUPABASE_URL", "https://db.example.com"),
        ]))
        .unwrap();
        assert!(only_url.log_store.is_none());

        let both = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SUPABASE_URL", "https://db.example.com/"),
            ("SUPABASE_KEY", "anon"),
        ]))
        .unwrap();
        let store = both.log_store.unwrap();
        assert_eq!(store.url, "https://db.example.com");
        assert_eq!(store.table, "logs");
    }

    #[test]
    fn parse_origins_trims_and_drops_empty_entries() {
        assert_eq!(
            parse_origins(" http://localhost:3000/, ,https://a.example "),
            vec!["http://localhost:3000", "https://a.example"]
        );
    }
}
