use anyhow::{Context, Result, anyhow};

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_HTTP_PORT: u16 = 9000;
const DEFAULT_BACKEND_URL: &str = "http://localhost:9000";

/// SMTP connection settings owned by the notification provider.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

impl SmtpConfig {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SMTP_HOST").context("Missing environment variable: SMTP_HOST")?;

        let port = match lookup("SMTP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .context("SMTP_PORT must be a valid u16 integer")?,
            None => DEFAULT_SMTP_PORT,
        };

        let user = lookup("SMTP_USERNAME").unwrap_or_default();
        let password = lookup("SMTP_PASSWORD").unwrap_or_default();

        let from = lookup("SMTP_FROM_EMAIL")
            .context("Missing environment variable: SMTP_FROM_EMAIL")?;

        Ok(Self {
            host,
            port,
            user,
            password,
            from,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend_url: String,
    pub store_cors: Vec<String>,
    pub dev_mode: bool,
    pub enable_file_log: bool,
    pub otel_endpoint: Option<String>,
    pub smtp: SmtpConfig,
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .context("PORT must be a valid u16 integer")?,
            None => DEFAULT_HTTP_PORT,
        };

        let backend_url = lookup("BACKEND_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let store_cors = lookup("STORE_CORS")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();

        let dev_mode = parse_flag(lookup("DEV_MODE").as_deref(), "DEV_MODE")?;
        let enable_file_log =
            parse_flag(lookup("ENABLE_FILE_LOG").as_deref(), "ENABLE_FILE_LOG")?;

        let otel_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.is_empty());

        let smtp = SmtpConfig::from_lookup(&lookup).context("failed smtp config")?;

        Ok(Self {
            port,
            backend_url,
            store_cors,
            dev_mode,
            enable_file_log,
            otel_endpoint,
            smtp,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: Option<&str>, name: &str) -> Result<bool> {
    match raw {
        None | Some("") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(anyhow!("{name} must be 'true' or 'false', got '{other}'")),
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
    fn smtp_config_defaults_port() {
        let config = SmtpConfig::from_lookup(lookup_from(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_FROM_EMAIL", "shop@example.com"),
        ]))
        .unwrap();

        assert_eq!(config.port, 587);
        assert_eq!(config.user, "");
        assert_eq!(config.from, "shop@example.com");
    }

    #[test]
    fn smtp_config_requires_host() {
        let err = SmtpConfig::from_lookup(lookup_from(&[("SMTP_FROM_EMAIL", "a@b.com")]))
            .unwrap_err();
        assert!(err.to_string().contains("SMTP_HOST"));
    }

    #[test]
    fn smtp_config_rejects_bad_port() {
        let result = SmtpConfig::from_lookup(lookup_from(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "not-a-port"),
            ("SMTP_FROM_EMAIL", "a@b.com"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = SmtpConfig::from_lookup(lookup_from(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PASSWORD", "hunter2"),
            ("SMTP_FROM_EMAIL", "a@b.com"),
        ]))
        .unwrap();

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn config_trims_backend_url_and_splits_cors() {
        let config = Config::from_lookup(lookup_from(&[
            ("BACKEND_URL", "https://store.test/"),
            ("STORE_CORS", "http://localhost:8000, https://shop.test,"),
            ("DEV_MODE", "1"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_FROM_EMAIL", "a@b.com"),
        ]))
        .unwrap();

        assert_eq!(config.backend_url, "https://store.test");
        assert_eq!(
            config.store_cors,
            vec!["http://localhost:8000", "https://shop.test"]
        );
        assert!(config.dev_mode);
        assert!(!config.enable_file_log);
        assert_eq!(config.port, 9000);
        assert!(config.otel_endpoint.is_none());
    }

    #[test]
    fn config_defaults_backend_url() {
        let config = Config::from_lookup(lookup_from(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_FROM_EMAIL", "a@b.com"),
        ]))
        .unwrap();

        assert_eq!(config.backend_url, "http://localhost:9000");
    }

    #[test]
    fn config_rejects_bad_flag() {
        let result = Config::from_lookup(lookup_from(&[
            ("ENABLE_FILE_LOG", "yes"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_FROM_EMAIL", "a@b.com"),
        ]));
        assert!(result.is_err());
    }
}
