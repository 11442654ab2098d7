//! Configuration loading and validation.
//!
//! Sources are layered, later ones overriding earlier ones:
//! 1. Built-in defaults ([`Config::default()`]).
//! 2. A configuration file: the path given explicitly, or `cheeseshop.toml`
//!    in the platform configuration directory if it exists. TOML, YAML and
//!    JSON are accepted, picked by file extension.
//! 3. Environment variables prefixed with `CHEESESHOP_`, with `__`
//!    separating nested keys (`CHEESESHOP_STORAGE__ROOT=/srv/cheeseshop`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

pub const ENV_PREFIX: &str = "CHEESESHOP_";
pub const FILE_NAME: &str = "cheeseshop.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite catalog database.
    pub database: PathBuf,
    pub storage: StorageConfig,
    pub paths: PathsConfig,
    /// Host serving unpacked documentation bundles.
    pub docs_host: String,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from("cheeseshop.db"),
            storage: StorageConfig::default(),
            paths: PathsConfig::default(),
            docs_host: "pythonhosted.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Absolute root directory of the artifact store.
    pub root: PathBuf,
}
impl Default for StorageConfig {
    fn default() -> Self {
        Self { root: PathBuf::from("/srv/cheeseshop") }
    }
}

/// Locations inside the artifact store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    pub packages: PathBuf,
    pub documentation: PathBuf,
}
impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            packages: PathBuf::from("data/packages"),
            documentation: PathBuf::from("data/packagedocs"),
        }
    }
}

impl Config {
    /// Load and validate the configuration.
    ///
    /// An explicit `path` must exist; without one, the default configuration
    /// file is used only if present.
    #[instrument(level = "debug")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(path)?.extract().or_raise(|| ErrorKind::Invalid)?;
        config.validate()?;
        tracing::debug!(?config, "Loaded configuration");
        Ok(config)
    }

    /// The layered configuration sources, before extraction.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        let figment = match path {
            Some(path) => {
                if !path.is_file() {
                    exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
                }
                merge_file(figment, path)?
            },
            None => match default_file().filter(|path| path.is_file()) {
                Some(path) => {
                    tracing::debug!(path = %path.display(), "Using default configuration file");
                    merge_file(figment, &path)?
                },
                None => figment,
            },
        };
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Validation("database"));
        }
        if !self.storage.root.is_absolute() {
            exn::bail!(ErrorKind::Validation("storage.root"));
        }
        if self.docs_host.trim().is_empty() {
            exn::bail!(ErrorKind::Validation("docs_host"));
        }
        Ok(())
    }
}

/// `cheeseshop.toml` in the platform configuration directory.
pub fn default_file() -> Option<PathBuf> {
    ProjectDirs::from("org", "cheeseshop", "cheeseshop").map(|dirs| dirs.config_dir().join(FILE_NAME))
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    Ok(match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => figment.merge(Toml::file_exact(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
        Some("json") => figment.merge(Json::file_exact(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[rstest]
    #[case("cheeseshop.toml", "docs_host = \"docs.example.com\"\n[storage]\nroot = \"/data\"\n")]
    #[case("cheeseshop.yaml", "docs_host: docs.example.com\nstorage:\n  root: /data\n")]
    #[case("cheeseshop.yml", "docs_host: docs.example.com\nstorage:\n  root: /data\n")]
    #[case("cheeseshop.json", r#"{"docs_host": "docs.example.com", "storage": {"root": "/data"}}"#)]
    fn test_file_formats(#[case] name: &str, #[case] contents: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, name, contents);
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.docs_host, "docs.example.com");
        assert_eq!(config.storage.root, PathBuf::from("/data"));
        // Untouched values keep their defaults.
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "cheeseshop.ini", "docs_host=x");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "cheeseshop.toml", "storage = 42\n");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid));
    }

    #[rstest]
    #[case("[storage]\nroot = \"relative/root\"\n", "storage.root")]
    #[case("docs_host = \"  \"\n", "docs_host")]
    #[case("database = \"\"\n", "database")]
    fn test_validation(#[case] contents: &str, #[case] field: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "cheeseshop.toml", contents);
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(f) if *f == field));
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "cheeseshop.toml",
                r#"
                    database = "/var/lib/cheeseshop/index.db"
                    docs_host = "docs.example.com"

                    [storage]
                    root = "/srv/file"
                "#,
            )?;
            jail.set_env("CHEESESHOP_STORAGE__ROOT", "/srv/env");
            jail.set_env("CHEESESHOP_PATHS__PACKAGES", "mirror/packages");
            let config = Config::load(Some(Path::new("cheeseshop.toml"))).unwrap();
            assert_eq!(config.database, PathBuf::from("/var/lib/cheeseshop/index.db"));
            assert_eq!(config.docs_host, "docs.example.com");
            assert_eq!(config.storage.root, PathBuf::from("/srv/env"));
            assert_eq!(config.paths.packages, PathBuf::from("mirror/packages"));
            assert_eq!(config.paths.documentation, PathBuf::from("data/packagedocs"));
            Ok(())
        });
    }

    #[test]
    fn test_env_is_validated() {
        Jail::expect_with(|jail| {
            jail.create_file("cheeseshop.toml", "")?;
            jail.set_env("CHEESESHOP_STORAGE__ROOT", "not/absolute");
            let err = Config::load(Some(Path::new("cheeseshop.toml"))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Validation("storage.root")));
            Ok(())
        });
    }
}
