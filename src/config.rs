use crate::switcher::LanguageKeys;
use anyhow::{bail, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Language persistence
    pub storage_key: String,
    pub query_param: String,

    // Mobile toggle drag
    pub drag_threshold_px: f64,

    // Edit overlay (demo only, not access control)
    pub admin_username: String,
    pub admin_password: String,
    pub admin_flag_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: "giorgio-vigna-lang".to_string(),
            query_param: "lang".to_string(),
            drag_threshold_px: 20.0,
            admin_username: "admin".to_string(),
            admin_password: "vigna2024".to_string(),
            admin_flag_key: "giorgio-vigna-admin".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let drag_threshold_px = match std::env::var("DRAG_THRESHOLD_PX") {
            Ok(value) => {
                let parsed: f64 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("DRAG_THRESHOLD_PX is not a number: {}", value))?;
                if !parsed.is_finite() || parsed <= 0.0 {
                    bail!("DRAG_THRESHOLD_PX must be a positive number, got {}", value);
                }
                parsed
            }
            Err(_) => defaults.drag_threshold_px,
        };

        Ok(Self {
            storage_key: std::env::var("LANG_STORAGE_KEY").unwrap_or(defaults.storage_key),
            query_param: std::env::var("LANG_QUERY_PARAM").unwrap_or(defaults.query_param),

            drag_threshold_px,

            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            admin_flag_key: std::env::var("ADMIN_FLAG_KEY").unwrap_or(defaults.admin_flag_key),
        })
    }

    pub fn language_keys(&self) -> LanguageKeys {
        LanguageKeys {
            query_param: self.query_param.clone(),
            storage_key: self.storage_key.clone(),
        }
    }
}
