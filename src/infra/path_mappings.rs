use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const PATH_MAPPINGS_FILE_NAME: &str = "claude_paths_config.json";

/// Encoded folder name to real path.
pub type PathMappings = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum LoadPathMappingsError {
    #[error("failed to read path mappings: {0}")]
    Read(#[from] io::Error),

    #[error("failed to parse path mappings: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SavePathMappingsError {
    #[error("failed to encode path mappings: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write path mappings: {0}")]
    Write(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ResolvePathMappingsFileError {
    #[error("failed to locate the running executable: {0}")]
    CurrentExe(#[from] io::Error),

    #[error("executable has no parent directory: {0}")]
    NoParent(String),
}

/// Store location: `CCLAUNCHER_PATHS_CONFIG`, else next to the executable.
pub fn resolve_path_mappings_file() -> Result<PathBuf, ResolvePathMappingsFileError> {
    if let Some(override_file) = std::env::var_os("CCLAUNCHER_PATHS_CONFIG") {
        return Ok(PathBuf::from(override_file));
    }

    let exe = std::env::current_exe()?;
    let Some(dir) = exe.parent() else {
        return Err(ResolvePathMappingsFileError::NoParent(
            exe.display().to_string(),
        ));
    };
    Ok(dir.join(PATH_MAPPINGS_FILE_NAME))
}

/// Persisted folder-name to path map, stored as one flat JSON object.
///
/// Every write rewrites the whole file. There is no locking: two processes
/// writing at once may lose one of the updates.
#[derive(Clone, Debug)]
pub struct PathMappingStore {
    path: PathBuf,
}

impl PathMappingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_load(&self) -> Result<PathMappings, LoadPathMappingsError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(PathMappings::new());
            }
            Err(error) => return Err(error.into()),
        };

        let file: PathMappingsFile = serde_json::from_str(&raw)?;
        Ok(file.mappings)
    }

    /// Missing or unreadable stores load as empty.
    pub fn load(&self) -> PathMappings {
        self.try_load().unwrap_or_else(|error| {
            tracing::warn!(path = %self.path.display(), "{error}; treating as empty");
            PathMappings::new()
        })
    }

    /// Unreadable stores miss. Logged at debug level, once per lookup.
    pub fn get(&self, name: &str) -> Option<String> {
        match self.try_load() {
            Ok(mut mappings) => mappings.remove(name),
            Err(error) => {
                tracing::debug!(path = %self.path.display(), name, "{error}");
                None
            }
        }
    }

    pub fn try_save(&self, mappings: &PathMappings) -> Result<(), SavePathMappingsError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let file = PathMappingsFile {
            mappings: mappings.clone(),
        };
        let text = serde_json::to_string_pretty(&file)?;
        fs::write(&tmp, text)?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }

    /// Write failures are logged and dropped.
    pub fn save(&self, mappings: &PathMappings) {
        if let Err(error) = self.try_save(mappings) {
            tracing::warn!(path = %self.path.display(), "{error}");
        }
    }

    pub fn try_put(&self, name: &str, path: &str) -> Result<(), SavePathMappingsError> {
        let mut mappings = self.load();
        mappings.insert(name.to_string(), path.to_string());
        self.try_save(&mappings)
    }

    pub fn put(&self, name: &str, path: &str) {
        let mut mappings = self.load();
        mappings.insert(name.to_string(), path.to_string());
        self.save(&mappings);
    }
}

/// On-disk shape: the bare map, with no version or wrapper keys.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
struct PathMappingsFile {
    mappings: PathMappings,
}
