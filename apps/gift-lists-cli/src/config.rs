//! Layered application configuration.

use std::path::Path;

use anyhow::{Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use gift_lists::config::GiftListsConfig;
use serde::{Deserialize, Serialize};

/// Environment variables with this prefix override file values, with `__`
/// separating nested keys (`GIFT_LISTS__LOGGING__LEVEL=debug`).
pub const ENV_PREFIX: &str = "GIFT_LISTS__";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub gift_lists: GiftListsConfig,
}

impl AppConfig {
    /// Defaults, then the YAML file (if any), then `GIFT_LISTS__*` variables.
    ///
    /// # Errors
    /// Fails when the file is unreadable or a value has the wrong shape.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Each `-v` selects a more verbose level, replacing the configured one.
    pub fn apply_verbosity(&mut self, verbose: u8) {
        let level = match verbose {
            0 => return,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        level.clone_into(&mut self.logging.level);
    }

    /// # Errors
    /// Fails when a limit is zero or the budget thresholds are out of order.
    pub fn validate(&self) -> Result<()> {
        let service = &self.gift_lists.service;
        if service.max_name_length == 0 || service.max_text_length == 0 {
            bail!("gift_lists.service: length limits must be positive");
        }
        let budget = &self.gift_lists.budget;
        if budget.caution_percent.is_sign_negative() {
            bail!("gift_lists.budget.caution_percent cannot be negative");
        }
        if budget.caution_percent > budget.warning_percent {
            bail!(
                "gift_lists.budget: caution_percent ({}) exceeds warning_percent ({})",
                budget.caution_percent,
                budget.warning_percent
            );
        }
        Ok(())
    }
}
