use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Environment variable that overrides the default data directory
pub const DATA_DIR_ENV: &str = "BUDGET_TRACKER_DATA_DIR";

/// File in the default data directory that points somewhere else
const REDIRECT_FILE: &str = ".budget_redirect";

/// Marker file that identifies a user directory
pub const BUDGET_FILE: &str = "budget.yaml";

/// CsvConnection manages the data directory and each user's subdirectory
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: Arc<Mutex<PathBuf>>,
}

impl CsvConnection {
    /// Create a new connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Could not create data directory {}", base_path.display())
            })?;
            info!("Created data directory {}", base_path.display());
        }

        Ok(Self {
            base_directory: Arc::new(Mutex::new(base_path)),
        })
    }

    /// Create a connection in the default data directory
    pub fn new_default() -> Result<Self> {
        Self::new(Self::default_data_directory()?)
    }

    /// Resolve the data directory.
    ///
    /// `BUDGET_TRACKER_DATA_DIR` wins; otherwise `~/Documents/Budget Tracker`,
    /// following a redirect file there if one exists.
    pub fn default_data_directory() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                info!("Using data directory from {}: {}", DATA_DIR_ENV, dir);
                return Ok(PathBuf::from(dir.trim()));
            }
        }

        let home_dir = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| anyhow!("Could not determine home directory"))?;
        let default_data_dir = PathBuf::from(home_dir).join("Documents").join("Budget Tracker");

        let redirect_file = default_data_dir.join(REDIRECT_FILE);
        if !redirect_file.exists() {
            debug!("No redirect file, using {}", default_data_dir.display());
            return Ok(default_data_dir);
        }

        match fs::read_to_string(&redirect_file) {
            Ok(redirected_path) => {
                let path = PathBuf::from(redirected_path.trim());
                if path.exists() {
                    info!("Found redirect file, using data directory: {}", path.display());
                    Ok(path)
                } else {
                    warn!(
                        "Redirect file points to non-existent directory: {}. Using default.",
                        path.display()
                    );
                    Ok(default_data_dir)
                }
            }
            Err(e) => {
                error!("Failed to read redirect file: {}. Using default directory.", e);
                Ok(default_data_dir)
            }
        }
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> PathBuf {
        self.base_directory
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Directory holding one user's files
    pub fn user_directory(&self, user_key: &str) -> PathBuf {
        self.base_directory()
            .join(Self::generate_safe_directory_name(user_key))
    }

    /// Create the user's directory if missing and return it
    pub fn ensure_user_directory(&self, user_key: &str) -> Result<PathBuf> {
        let user_dir = self.user_directory(user_key);
        if !user_dir.exists() {
            fs::create_dir_all(&user_dir).with_context(|| {
                format!("Could not create user directory {}", user_dir.display())
            })?;
            info!("Created user directory {}", user_dir.display());
        }
        Ok(user_dir)
    }

    /// Names of every directory that holds a budget file, sorted
    pub fn list_user_directories(&self) -> Result<Vec<String>> {
        let base_dir = self.base_directory();
        let mut directories = Vec::new();

        if !base_dir.exists() {
            return Ok(directories);
        }

        for entry in fs::read_dir(&base_dir)? {
            let path = entry?.path();
            if !path.is_dir() || !path.join(BUDGET_FILE).exists() {
                continue;
            }
            match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => directories.push(name.to_string()),
                None => warn!("Skipping directory with invalid name: {:?}", path),
            }
        }

        directories.sort();
        Ok(directories)
    }

    /// Filesystem-safe directory name for a user key.
    ///
    /// "Jane Doe" -> "jane_doe", "123456789" -> "123456789"
    pub fn generate_safe_directory_name(user_key: &str) -> String {
        let mapped: String = user_key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();

        let mut collapsed = String::new();
        let mut last_was_underscore = false;
        for c in mapped.chars() {
            if c == '_' {
                if !last_was_underscore {
                    collapsed.push('_');
                }
                last_was_underscore = true;
            } else {
                collapsed.push(c);
                last_was_underscore = false;
            }
        }

        let trimmed = collapsed.trim_matches('_');
        if trimmed.is_empty() {
            "user".to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Write a file atomically: write to a temp file, then rename
    pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents)
            .with_context(|| format!("Could not write {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Could not replace {}", path.display()))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_safe_directory_names() {
        assert_eq!(CsvConnection::generate_safe_directory_name("Jane Doe"), "jane_doe");
        assert_eq!(CsvConnection::generate_safe_directory_name("123456789"), "123456789");
        assert_eq!(CsvConnection::generate_safe_directory_name("  a--b  "), "a_b");
        assert_eq!(CsvConnection::generate_safe_directory_name("../"), "user");
    }

    #[test]
    fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("data");

        let connection = CsvConnection::new(&base).unwrap();

        assert!(base.exists());
        assert_eq!(connection.base_directory(), base);
    }

    #[test]
    fn test_list_user_directories_requires_budget_file() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();

        let with_budget = connection.ensure_user_directory("bob").unwrap();
        fs::write(with_budget.join(BUDGET_FILE), "").unwrap();
        connection.ensure_user_directory("empty").unwrap();
        fs::write(temp_dir.path().join("global_config.yaml"), "").unwrap();

        assert_eq!(connection.list_user_directories().unwrap(), vec!["bob".to_string()]);
    }

    #[test]
    fn test_write_atomic_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budget.yaml");

        CsvConnection::write_atomic(&path, b"first").unwrap();
        CsvConnection::write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!path.with_extension("tmp").exists());
    }
}
