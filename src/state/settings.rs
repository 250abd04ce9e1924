//! Persistent settings.

use serde::{Deserialize, Serialize};

use crate::connection::DEFAULT_BATCH_SIZE;
use crate::error::{Error, Result};
use crate::helpers::validate_mongodb_uri;
use crate::prune::{CollectionMatcher, MatcherConfig, PruneOptions};

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_uri")]
    pub uri: String,
    /// Cursor batch size for collection listings
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    #[serde(default)]
    pub prune: PruneSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneSettings {
    #[serde(default)]
    pub matcher: MatcherConfig,
}

/// Values from the command line or the environment; `None` keeps the file's value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub uri: Option<String>,
    pub batch_size: Option<u32>,
    pub matcher: Option<MatcherConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            batch_size: default_batch_size(),
            prune: PruneSettings::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        validate_mongodb_uri(&self.uri)?;
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".into()));
        }
        CollectionMatcher::from_config(&self.prune.matcher)?;
        Ok(())
    }

    /// Layer `overrides` on top of the loaded settings.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(uri) = overrides.uri {
            self.uri = uri;
        }
        if let Some(batch_size) = overrides.batch_size {
            self.batch_size = batch_size;
        }
        if let Some(matcher) = overrides.matcher {
            self.prune.matcher = matcher;
        }
        self
    }

    pub fn prune_options(&self, dry_run: bool) -> Result<PruneOptions> {
        Ok(PruneOptions {
            matcher: CollectionMatcher::from_config(&self.prune.matcher)?,
            dry_run,
            batch_size: self.batch_size,
        })
    }
}

fn default_uri() -> String {
    DEFAULT_URI.to_string()
}

fn default_batch_size() -> u32 {
    DEFAULT_BATCH_SIZE
}
