//! Generator options.
//!
//! Options are usually read from `.morph/config.toml` in the project root:
//!
//! ```toml
//! enforce_not_null = false
//! non_constructor_properties = "auto"   # ignore | auto | strict
//! ignore_unmapped_target_properties = false
//! enabled_converters = ["IntToEnumConverter"]
//! ```

use morph_schema::ConverterId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How target properties that are not constructor parameters get populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NonConstructorProperties {
    /// Only properties named by an explicit directive are set.
    Ignore,
    /// Every mutable property with a mapping is set; the rest are left alone.
    #[default]
    Auto,
    /// Like `Auto`, but a mutable property without mapping is an error.
    Strict,
}

/// Global policy for one generator run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MapperOptions {
    /// Allow nullable-to-non-null conversions by emitting `!!`.
    pub enforce_not_null: bool,
    pub non_constructor_properties: NonConstructorProperties,
    /// Skip unmapped target properties in strict mode instead of failing.
    pub ignore_unmapped_target_properties: bool,
    /// Converters enabled in addition to the enabled-by-default ones.
    pub enabled_converters: Vec<ConverterId>,
}

/// Error loading options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl MapperOptions {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `.morph/config.toml` under `root`, falling back to defaults when the
    /// file does not exist.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(".morph").join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn with_enforce_not_null(mut self, enforce: bool) -> Self {
        self.enforce_not_null = enforce;
        self
    }

    pub fn with_non_constructor_properties(mut self, policy: NonConstructorProperties) -> Self {
        self.non_constructor_properties = policy;
        self
    }

    pub fn with_ignore_unmapped_target_properties(mut self, ignore: bool) -> Self {
        self.ignore_unmapped_target_properties = ignore;
        self
    }

    pub fn enabling(mut self, id: impl Into<ConverterId>) -> Self {
        self.enabled_converters.push(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let options = MapperOptions::default();
        assert!(!options.enforce_not_null);
        assert_eq!(options.non_constructor_properties, NonConstructorProperties::Auto);
        assert!(options.enabled_converters.is_empty());
    }

    #[test]
    fn test_from_toml() {
        let options = MapperOptions::from_toml_str(
            r#"
enforce_not_null = true
non_constructor_properties = "strict"
enabled_converters = ["IntToEnumConverter"]
"#,
        )
        .unwrap();
        assert!(options.enforce_not_null);
        assert_eq!(options.non_constructor_properties, NonConstructorProperties::Strict);
        assert!(!options.ignore_unmapped_target_properties);
        assert_eq!(options.enabled_converters, vec![ConverterId::from("IntToEnumConverter")]);
    }

    #[test]
    fn test_invalid_policy() {
        let err = MapperOptions::from_toml_str("non_constructor_properties = \"sometimes\"");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_discover_project_config() {
        let dir = TempDir::new().unwrap();
        assert_eq!(MapperOptions::discover(dir.path()).unwrap(), MapperOptions::default());

        let config_dir = dir.path().join(".morph");
        std::fs::create_dir_all(&config_dir).unwrap();
        let mut file = std::fs::File::create(config_dir.join("config.toml")).unwrap();
        writeln!(file, "non_constructor_properties = \"ignore\"").unwrap();

        let options = MapperOptions::discover(dir.path()).unwrap();
        assert_eq!(options.non_constructor_properties, NonConstructorProperties::Ignore);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = MapperOptions::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
