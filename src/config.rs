//! Process-wide SDK configuration.
//!
//! The native library keeps its app registration, verbose
//! level and logger file as global state. [`SdkConfig`]
//! collects them so they are set once, at startup, through
//! the designated setters. Fields left unset are not
//! touched.

use std::{fs::File, io::BufReader, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use serde_derive::*;
use tracing::{debug, warn};

use crate::{bridge::Bridge, native::Dirp, types::*};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SdkConfig {
    pub app_key: Option<String>,
    pub verbose_level: Option<VerboseLevel>,
    pub logger_file: Option<PathBuf>,
}

impl SdkConfig {
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing sdk config {}", path.display()))
    }

    /// Fields set in `other` replace those in `self`.
    pub fn merge(mut self, other: SdkConfig) -> Self {
        if other.app_key.is_some() {
            self.app_key = other.app_key;
        }
        if other.verbose_level.is_some() {
            self.verbose_level = other.verbose_level;
        }
        if other.logger_file.is_some() {
            self.logger_file = other.logger_file;
        }
        self
    }

    /// Register, then set the verbose level, then the logger
    /// file. Fails if registration is rejected.
    pub fn apply<D: Dirp>(&self, bridge: &Bridge<D>) -> Result<()> {
        if let Some(key) = &self.app_key {
            RetCode::check(bridge.register_app(key)).context("could not register app")?;
            debug!("app registered");
        }
        if let Some(level) = self.verbose_level {
            bridge.set_verbose_level(level);
            debug!(?level, "sdk verbose level set");
        }
        if let Some(path) = &self.logger_file {
            match path.to_str() {
                Some(file_name) => {
                    bridge.set_logger_file(file_name);
                    debug!(file_name, "sdk logger file set");
                }
                None => {
                    warn!(path = %path.display(), "logger file is not valid UTF-8; ignored")
                }
            }
        }
        Ok(())
    }
}
