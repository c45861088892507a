//! Settings.
//!
//! Loaded from an optional TOML file, then overridden by `HELPERKIT_*`
//! environment variables (`HELPERKIT_APP_NAMESPACE=shop`,
//! `HELPERKIT_DEFAULT_FILTER=trim,lower`). Missing keys keep their defaults.

use std::collections::HashMap;
use std::path::Path;

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::Filter;
use crate::token::DEFAULT_TOKEN_NAME;

pub const ENV_PREFIX: &str = "HELPERKIT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root namespace short validator names are resolved into.
    pub app_namespace: String,
    /// Session key and form field name of issued tokens.
    pub token_name: String,
    /// Input filters applied when a caller passes none.
    pub default_filter: Vec<String>,
    /// `tracing_subscriber::EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_namespace: "app".to_owned(),
            token_name: DEFAULT_TOKEN_NAME.to_owned(),
            default_filter: Vec::new(),
            log_filter: "info".to_owned(),
        }
    }
}

impl Settings {
    /// File (if given and present) plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        let settings = builder.add_source(environment(None)).build()?.try_deserialize()?;
        Ok(settings)
    }

    /// TOML text plus an explicit set of environment variables, for callers
    /// that keep configuration elsewhere.
    pub fn from_sources(toml: &str, env: HashMap<String, String>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .add_source(environment(Some(env)))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Self::from_sources(toml, HashMap::new())
    }

    pub fn default_filter(&self) -> Filter {
        self.default_filter.iter().cloned().collect()
    }
}

fn environment(source: Option<HashMap<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("default_filter")
        .source(source)
}
