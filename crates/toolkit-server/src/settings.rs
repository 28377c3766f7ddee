//! Server Settings
//!
//! Read from the environment (after `.env` is loaded).

use std::path::PathBuf;

use toolkit_core::{Configuration, Result};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    /// `STRIPE_SECRET_KEY`; absent means the in-memory provider is used
    pub stripe_secret_key: Option<String>,

    /// `STRIPE_ACCOUNT`; connected account every call is scoped to
    pub account: Option<String>,

    /// `TOOLKIT_CONFIG`; path to the configuration JSON
    pub config_path: Option<PathBuf>,

    /// `BIND_ADDR`
    pub bind_addr: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            stripe_secret_key: non_empty("STRIPE_SECRET_KEY"),
            account: non_empty("STRIPE_ACCOUNT"),
            config_path: non_empty("TOOLKIT_CONFIG").map(PathBuf::from),
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
        }
    }

    /// Load the configuration file, with `STRIPE_ACCOUNT` overriding its context
    pub fn configuration(&self) -> Result<Configuration> {
        let configuration = match &self.config_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading toolkit configuration");
                Configuration::from_file(path)?
            }
            None => {
                tracing::warn!("TOOLKIT_CONFIG not set - no operations are allowed");
                Configuration::new()
            }
        };

        Ok(match &self.account {
            Some(account) => configuration.with_account(account),
            None => configuration,
        })
    }
}
