//! Uploads directory configuration.
//!
//! The HTTP layer resolves `databasePath`/`filename` request fields against
//! this root; the orchestrator and its tools never construct these paths
//! themselves (spec.md §6 Filesystem).

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    #[serde(default = "default_root")]
    pub root: String,
}

impl UploadsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.root.trim().is_empty() {
            return Err(ValidationError::InvalidUploadsRoot);
        }
        Ok(())
    }

    /// Joins a filename onto the uploads root, rejecting path separators
    /// and `..` the way the `/query` HTTP wrapper does (spec.md §6).
    pub fn resolve(&self, filename: &str) -> Result<std::path::PathBuf, ValidationError> {
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            return Err(ValidationError::InvalidUploadsRoot);
        }
        Ok(std::path::Path::new(&self.root).join(filename))
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self { root: default_root() }
    }
}

fn default_root() -> String {
    "./uploads".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_root_is_uploads() {
        assert_eq!(UploadsConfig::default().root, "./uploads");
    }

    #[test]
    fn validate_rejects_empty_root() {
        let config = UploadsConfig { root: "".to_string() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn resolve_joins_filename_onto_root() {
        let config = UploadsConfig { root: "./uploads".to_string() };
        let resolved = config.resolve("database_123.db").unwrap();
        assert_eq!(resolved, std::path::PathBuf::from("./uploads/database_123.db"));
    }

    #[test]
    fn resolve_rejects_path_separators_and_dotdot() {
        let config = UploadsConfig::default();
        assert!(config.resolve("../etc/passwd").is_err());
        assert!(config.resolve("sub/dir.db").is_err());
        assert!(config.resolve("sub\\dir.db").is_err());
    }
}
