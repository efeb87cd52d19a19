use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::super::args::CommonArgs;
use crate::config::{ExtractConfig, load_config};
use crate::runtime::{Intl, load_locales};

/// A loaded project: where paths are resolved from, and its config with
/// command line overrides applied.
pub struct Project {
    pub root: PathBuf,
    pub config: ExtractConfig,
}

impl Project {
    pub fn load(common: &CommonArgs) -> Result<Self> {
        let start_dir = match &common.path {
            Some(path) => path.clone(),
            None => env::current_dir().context("Failed to get current directory")?,
        };
        let loaded = load_config(&start_dir)?;
        let root = loaded.project_root(&start_dir);
        match &loaded.path {
            Some(path) => debug!(config = %path.display(), "loaded config"),
            None => debug!("no config file found, using defaults"),
        }

        let mut config = loaded.config;
        if let Some(dir) = &common.locales_dir {
            config.locales_dir = dir.clone();
        }
        if let Some(lang) = &common.default_language {
            config.default_language = lang.clone();
        }
        Ok(Self { root, config })
    }

    /// Build a formatting context from the configured locale files.
    pub fn intl(&self) -> Result<Intl> {
        self.config.validate()?;
        let dir = self.root.join(&self.config.locales_dir);
        let locales = load_locales(&dir, &self.config.locales)?;
        Ok(Intl::with_default_language(
            locales,
            self.config.default_language.clone(),
        ))
    }
}
