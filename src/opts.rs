//! Process options handed to the wrapped clients.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Master configuration file used when none is configured.
pub const DEFAULT_CONF_FILE: &str = "/etc/salt/master";

/// Options the wrapped clients are built from.
///
/// Only `conf_file` is interpreted here. Everything else is carried as an
/// opaque map for the runner and wheel factories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiOpts {
    /// Path of the master configuration file.
    pub conf_file: PathBuf,
    /// Remaining settings, untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ApiOpts {
    /// Options pointing at the given master configuration file.
    pub fn new(conf_file: impl Into<PathBuf>) -> Self {
        Self {
            conf_file: conf_file.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Load options from a config file (extension optional) layered with
    /// `SALTAPI_*` environment variables.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load_from(config_path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SALTAPI"))
            .set_default("conf_file", DEFAULT_CONF_FILE)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Builder-style setting of an extra option.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn conf_file(&self) -> &Path {
        &self.conf_file
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

impl Default for ApiOpts {
    fn default() -> Self {
        Self::new(DEFAULT_CONF_FILE)
    }
}
