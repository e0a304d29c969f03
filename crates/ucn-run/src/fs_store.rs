// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed [`ConfigStore`]: one `<key>.json` file per key.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::config::{ConfigError, ConfigStore};

/// Stores configs as JSON files under a base directory.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Store rooted at `base`, created if missing.
    pub fn new(base: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let base = base.into();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Store rooted at the user config directory (e.g. `~/.config/ucn`).
    pub fn user() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "ucn")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Self::new(proj.config_dir())
    }

    /// Base directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }

    /// [`Self::path_for`], refusing keys that would escape the base directory.
    fn checked_path(&self, key: &str) -> Result<PathBuf, ConfigError> {
        let plain = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\']);
        if plain {
            Ok(self.path_for(key))
        } else {
            Err(ConfigError::Other(format!("invalid config key {key:?}")))
        }
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        fs::read(self.checked_path(key)?).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::Io(err),
        })
    }

    /// Writes a sibling `.tmp` file, then renames it over the target.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.checked_path(key)?;
        fs::create_dir_all(&self.base)?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, data)?;
        if let Err(err) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(ConfigError::Io(err));
        }
        debug!(path = %path.display(), bytes = data.len(), "config saved");
        Ok(())
    }
}
