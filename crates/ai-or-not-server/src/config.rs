//! YAML configuration loading for the inference server.
//!
//! Loads [`ServerConfig`] from a YAML file on disk, falling back to defaults
//! when no file is specified.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub listen_addr: String,
    /// Directory holding versioned model artifacts.
    pub artifacts_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            artifacts_dir: PathBuf::from("model_artifacts"),
        }
    }
}

/// Load a [`ServerConfig`] from a YAML file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the YAML is invalid.
pub fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;
    let config: ServerConfig = serde_yaml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config YAML: {}", e))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper to write YAML to a temp file and return the path.
    fn write_yaml(yaml: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(yaml.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_load_config_full() {
        let yaml = r#"
listen_addr: "127.0.0.1:8080"
artifacts_dir: "/var/lib/ai-or-not/artifacts"
"#;
        let f = write_yaml(yaml);
        let config = load_config(f.path()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(
            config.artifacts_dir,
            PathBuf::from("/var/lib/ai-or-not/artifacts")
        );
    }

    #[test]
    fn test_load_config_partial_uses_defaults() {
        let f = write_yaml("listen_addr: \"127.0.0.1:9000\"\n");
        let config = load_config(f.path()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.artifacts_dir, PathBuf::from("model_artifacts"));
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config(Path::new("/nonexistent/config.yaml")).is_err());
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let f = write_yaml("listen_addr: [not: {valid");
        assert!(load_config(f.path()).is_err());
    }
}
