//! [`ConfigDir`] builder for context resolution test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name of the main config document inside a [`ConfigDir`].
pub const CONFIG_FILE: &str = "config.yaml";

/// A temporary directory holding a config document and its include files.
///
/// # Example
///
/// ```rust,no_run
/// use kh_test_utils::ConfigDir;
///
/// let dir = ConfigDir::new();
/// dir.write_config("common: {}\nstaging:\n  kubectl: []\n");
/// dir.write_file("vars/db.yaml", "host: db.local\n");
/// assert!(dir.config_path().exists());
/// ```
pub struct ConfigDir {
    temp_dir: TempDir,
}

impl Default for ConfigDir {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigDir {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new()
                .unwrap_or_else(|e| panic!("ConfigDir::new: failed to create temp dir: {e}")),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the main config document (which may not exist yet).
    pub fn config_path(&self) -> PathBuf {
        self.root().join(CONFIG_FILE)
    }

    /// Write the main config document.
    pub fn write_config(&self, content: &str) -> PathBuf {
        self.write_file(CONFIG_FILE, content)
    }

    /// Write `content` to `relative` under the root, creating parent
    /// directories, and return the absolute path.
    ///
    /// # Panics
    /// Panics if the filesystem operations fail.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("ConfigDir::write_file: failed to create {}: {e}", parent.display())
            });
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("ConfigDir::write_file: failed to write {}: {e}", path.display()));
        path
    }

    /// Include marker for `relative`, using the file's absolute path.
    pub fn include_marker(&self, relative: &str) -> String {
        let path = self.root().join(relative).to_string_lossy().replace('\\', "/");
        format!("{{{{ file = '{path}' }}}}")
    }
}

/// Env marker for `name`.
pub fn env_marker(name: &str) -> String {
    format!("{{{{ env = '{name}' }}}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers() {
        assert_eq!(env_marker("HOME"), "{{ env = 'HOME' }}");

        let dir = ConfigDir::new();
        let marker = dir.include_marker("vars.yaml");
        assert!(marker.starts_with("{{ file = '"));
        assert!(marker.ends_with("vars.yaml' }}"));
    }

    #[test]
    fn test_write_file_creates_parents() {
        let dir = ConfigDir::new();
        let path = dir.write_file("a/b/c.yaml", "x: 1\n");
        assert_eq!(fs::read_to_string(path).unwrap(), "x: 1\n");
    }
}
