//! `tsphp.toml` project configuration.
//!
//! ```toml
//! [emit]
//! namespace = "App\\Models"
//! helper_namespace = "\\"
//! ```
//!
//! The file is looked up from the input file's directory upwards; the first
//! one found wins. Command line flags override its values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tsphp_emitter::{EmitOptions, DEFAULT_HELPER_NAMESPACE};

pub const CONFIG_FILE: &str = "tsphp.toml";

/// Template written by `tsphp init`.
pub const DEFAULT_CONFIG: &str = r#"# tsphp configuration

[emit]
# PHP namespace declared at the top of every generated file.
# namespace = "App"

# Prefix for generated helper calls such as array_merge.
helper_namespace = "\\"
"#;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    pub namespace: Option<String>,
    pub helper_namespace: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub emit: EmitConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Nearest `tsphp.toml` in `dir` or one of its ancestors.
    pub fn discover(dir: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        for ancestor in dir.ancestors() {
            let candidate = ancestor.join(CONFIG_FILE);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                log::debug!("using config {}", candidate.display());
                return Ok(Some((candidate, config)));
            }
        }
        Ok(None)
    }

    /// Config for an input file; defaults when none is found.
    pub fn for_input(input: &Path) -> Result<Self, ConfigError> {
        let dir = match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Ok(Self::discover(dir)?.map(|(_, config)| config).unwrap_or_default())
    }

    /// Emitter options, with flag values taking precedence.
    pub fn emit_options(
        &self,
        namespace: Option<String>,
        helper_namespace: Option<String>,
    ) -> EmitOptions {
        EmitOptions {
            namespace: namespace
                .or_else(|| self.emit.namespace.clone())
                .filter(|ns| !ns.is_empty()),
            helper_namespace: helper_namespace
                .or_else(|| self.emit.helper_namespace.clone())
                .unwrap_or_else(|| DEFAULT_HELPER_NAMESPACE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_template_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.emit.namespace, None);
        assert_eq!(config.emit.helper_namespace.as_deref(), Some("\\"));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        let options = config.emit_options(None, None);
        assert_eq!(options, EmitOptions::default());
    }

    #[test]
    fn test_flags_override_file() {
        let config: Config =
            toml::from_str("[emit]\nnamespace = \"App\"\nhelper_namespace = \"\\\\H\\\\\"\n")
                .unwrap();
        let from_file = config.emit_options(None, None);
        assert_eq!(from_file.namespace.as_deref(), Some("App"));
        assert_eq!(from_file.helper_namespace, "\\H\\");

        let overridden = config.emit_options(Some("Other".to_string()), Some(String::new()));
        assert_eq!(overridden.namespace.as_deref(), Some("Other"));
        assert_eq!(overridden.helper_namespace, "");
    }

    #[test]
    fn test_discover_walks_up() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[emit]\nnamespace = \"Root\"\n",
        )
        .unwrap();
        let nested = dir.path().join("src").join("models");
        std::fs::create_dir_all(&nested).unwrap();

        let (path, config) = Config::discover(&nested).unwrap().unwrap();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE);
        assert_eq!(config.emit.namespace.as_deref(), Some("Root"));

        let input = nested.join("user.ts");
        let config = Config::for_input(&input).unwrap();
        assert_eq!(config.emit.namespace.as_deref(), Some("Root"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[emit\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn test_wrong_value_type_is_rejected() {
        let err = toml::from_str::<Config>("[emit]\nnamespace = 3\n");
        assert!(err.is_err());
    }
}
