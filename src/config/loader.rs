//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::schema::Config;
use crate::error::{Result, TfstyleError};

/// Config file name looked up in the module directory.
pub const CONFIG_FILE_NAME: &str = ".tfstyle.yml";

/// Find the config file for a module directory, if one exists.
pub fn find_config(module_dir: &Path) -> Option<PathBuf> {
    let path = module_dir.join(CONFIG_FILE_NAME);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TfstyleError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            TfstyleError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into a [`Config`].
///
/// An empty document is the default config.
pub fn parse_config(content: &str, source_path: &Path) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    serde_yaml::from_str(content).map_err(|e| TfstyleError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the config for a module.
///
/// An explicit path must exist. Without one, `.tfstyle.yml` in the module
/// directory is used when present, otherwise the default config.
pub fn load_config(module_dir: &Path, explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        debug!("Loading config from {}", path.display());
        return load_config_file(path);
    }

    match find_config(module_dir) {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            load_config_file(&path)
        }
        None => {
            debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            Ok(Config::default())
        }
    }
}
