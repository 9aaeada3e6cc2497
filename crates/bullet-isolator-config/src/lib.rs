use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// How list depth is measured in the notes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentSetting {
    /// One tab per level
    #[default]
    Tabs,
    /// Use whatever the origin document uses
    Auto,
    /// Fixed number of spaces per level
    Spaces(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub notes_path: PathBuf,
    /// Side document location, relative to `notes_path`
    #[serde(default = "default_side_document")]
    pub side_document: PathBuf,
    /// Regular expression recognizing a bullet line; `"- "` prefix when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet_pattern: Option<String>,
    #[serde(default)]
    pub indent: IndentSetting,
}

fn default_side_document() -> PathBuf {
    PathBuf::from("bullet-isolator.md")
}

impl Config {
    pub fn new(notes_path: PathBuf) -> Self {
        Self {
            notes_path,
            side_document: default_side_document(),
            bullet_pattern: None,
            indent: IndentSetting::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded config path
        config.notes_path = Self::expand_path(&config.notes_path).unwrap_or(config.notes_path);

        Ok(Some(config))
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/bullet-isolator");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        // Should contain the expected config file name
        assert!(path_str.ends_with(".config/bullet-isolator/config.toml"));
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: Config = toml::from_str(r#"notes_path = "/tmp/notes""#).unwrap();

        assert_eq!(config, Config::new(PathBuf::from("/tmp/notes")));
        assert_eq!(config.side_document, PathBuf::from("bullet-isolator.md"));
        assert_eq!(config.indent, IndentSetting::Tabs);
        assert_eq!(config.bullet_pattern, None);
    }

    #[test]
    fn test_full_config() {
        let config_content = r#"
notes_path = "/tmp/notes"
side_document = "scratch/isolated.md"
bullet_pattern = "^[-*+] "
indent = { spaces = 4 }
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(config.side_document, PathBuf::from("scratch/isolated.md"));
        assert_eq!(config.bullet_pattern.as_deref(), Some("^[-*+] "));
        assert_eq!(config.indent, IndentSetting::Spaces(4));
    }

    #[test]
    fn test_indent_auto() {
        let config: Config = toml::from_str("notes_path = \"/n\"\nindent = \"auto\"").unwrap();
        assert_eq!(config.indent, IndentSetting::Auto);
    }

    #[test]
    fn test_unknown_indent_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "notes_path = \"/n\"\nindent = \"sideways\"").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            bullet_pattern: Some(r"^\d+\. ".to_string()),
            indent: IndentSetting::Spaces(2),
            ..Config::new(PathBuf::from("/tmp/test-notes"))
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("BULLET_ISOLATOR_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$BULLET_ISOLATOR_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path);

        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/subdir")));

        unsafe {
            env::remove_var("BULLET_ISOLATOR_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_relative_path() {
        let path = PathBuf::from("relative/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            side_document: PathBuf::from("inbox/isolated.md"),
            indent: IndentSetting::Auto,
            ..Config::new(PathBuf::from("/tmp/test-notes"))
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_load_expands_notes_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "notes_path = \"~/test/notes\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        let expanded_path = config.notes_path.to_string_lossy();
        assert!(!expanded_path.starts_with('~'));
        assert!(expanded_path.contains("test/notes"));
    }
}
