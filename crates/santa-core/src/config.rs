//! Runtime configuration, read once and passed down explicitly.

use thiserror::Error;

use crate::assign::DEFAULT_MAX_ATTEMPTS;

pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
/// Should be overridden in any real deployment.
pub const DEFAULT_ADMIN_PASSPHRASE: &str = "admin123";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender_email: String,
    pub sender_password: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_server: DEFAULT_SMTP_SERVER.into(),
            smtp_port: DEFAULT_SMTP_PORT,
            sender_email: String::new(),
            sender_password: String::new(),
        }
    }
}

impl MailConfig {
    /// Sending needs both a sender address and its credential.
    pub fn is_configured(&self) -> bool {
        !self.sender_email.is_empty() && !self.sender_password.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub mail: MailConfig,
    pub admin_passphrase: String,
    pub max_draw_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mail: MailConfig::default(),
            admin_passphrase: DEFAULT_ADMIN_PASSPHRASE.into(),
            max_draw_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            mail: MailConfig {
                smtp_server: lookup("SANTA_SMTP_SERVER").unwrap_or(defaults.mail.smtp_server),
                smtp_port: parse(&lookup, "SANTA_SMTP_PORT")?.unwrap_or(defaults.mail.smtp_port),
                sender_email: lookup("SANTA_SENDER_EMAIL").unwrap_or_default(),
                sender_password: lookup("SANTA_SENDER_PASSWORD").unwrap_or_default(),
            },
            admin_passphrase: lookup("SANTA_ADMIN_PASSPHRASE").unwrap_or(defaults.admin_passphrase),
            max_draw_attempts: parse(&lookup, "SANTA_MAX_DRAW_ATTEMPTS")?
                .unwrap_or(defaults.max_draw_attempts),
        })
    }
}

fn parse<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.mail.smtp_server, "smtp.gmail.com");
        assert_eq!(cfg.mail.smtp_port, 587);
        assert_eq!(cfg.admin_passphrase, "admin123");
        assert_eq!(cfg.max_draw_attempts, 100);
        assert!(!cfg.mail.is_configured());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("SANTA_SMTP_SERVER", "mail.example.com"),
            ("SANTA_SMTP_PORT", "2525"),
            ("SANTA_SENDER_EMAIL", "santa@example.com"),
            ("SANTA_SENDER_PASSWORD", "reindeer"),
            ("SANTA_ADMIN_PASSPHRASE", "north-pole"),
            ("SANTA_MAX_DRAW_ATTEMPTS", "250"),
        ]))
        .unwrap();

        assert_eq!(cfg.mail.smtp_server, "mail.example.com");
        assert_eq!(cfg.mail.smtp_port, 2525);
        assert!(cfg.mail.is_configured());
        assert_eq!(cfg.admin_passphrase, "north-pole");
        assert_eq!(cfg.max_draw_attempts, 250);
    }

    #[test]
    fn malformed_number_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("SANTA_SMTP_PORT", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SANTA_SMTP_PORT", .. }));
    }
}
