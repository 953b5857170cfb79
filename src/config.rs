use cb_blocks::storage::loader::DEFAULT_DOCUMENT_NAME;
use cb_util::log;
use cb_util::parking_lot::RwLock;
use cb_util::toml;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CONFIG_FILE: &str = "settings.toml";

#[derive(Clone, Debug, Serialize, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Storage {
    /// The `storage` tree lives directly inside this directory
    #[default(PathBuf::from("closedblocks"))]
    pub data_dir: PathBuf,
    #[default(DEFAULT_DOCUMENT_NAME.to_owned())]
    pub document_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Performance {
    // leave two cores for the host server itself
    #[default(cb_util::num_cpus::get().saturating_sub(2).max(1) as u32)]
    pub load_threads: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WorldEntry {
    /// Hyphenated or trimmed identity token
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Host {
    pub worlds: Vec<WorldEntry>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Integrations {
    /// The item provider integration is only supported when this directory exists
    pub item_provider_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Debugging {
    #[default("info".to_owned())]
    pub log_level: String,
    #[default(PathBuf::from("log4rs.toml"))]
    pub log_config: PathBuf,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: Storage,
    pub performance: Performance,
    pub host: Host,
    pub integrations: Integrations,
    pub debugging: Debugging,
}

pub type ConfigHandle = Arc<RwLock<Config>>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("couldn't access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't load config from TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("couldn't serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path` (or defaults when it doesn't exist yet) and writes the
    /// completed configuration back so new options show up in the file.
    pub fn standard_load(path: &Path) -> Result<ConfigHandle, ConfigError> {
        let io_error = |source: std::io::Error| ConfigError::Io {
            path: path.to_owned(),
            source,
        };
        let mut cfg = Config::new();
        match std::fs::read_to_string(path) {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("Creating new {}", path.display());
            }
            Err(e) => return Err(io_error(e)),
            Ok(cfg_text) => cfg.load_from_toml(&cfg_text)?,
        }
        let cfg_text = cfg.save_toml()?;
        std::fs::write(path, cfg_text).map_err(io_error)?;
        Ok(Arc::new(RwLock::new(cfg)))
    }

    pub fn load_from_toml(&mut self, config: &str) -> Result<(), ConfigError> {
        *self = toml::from_str(config)?;
        Ok(())
    }

    pub fn save_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut cfg = Config::new();
        cfg.load_from_toml(
            r#"
[storage]
data_dir = "plugins/ClosedBlocks"

[[host.worlds]]
id = "6ba7b8109dad11d180b400c04fd430c8"
name = "world"
"#,
        )
        .unwrap();
        assert_eq!(cfg.storage.data_dir, PathBuf::from("plugins/ClosedBlocks"));
        assert_eq!(cfg.storage.document_name, "data.json");
        assert_eq!(cfg.host.worlds.len(), 1);
        assert_eq!(cfg.debugging.log_level, "info");
        assert!(cfg.performance.load_threads >= 1);
        assert!(cfg.integrations.item_provider_dir.is_none());
    }

    #[test]
    fn standard_load_creates_and_rereads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let created = Config::standard_load(&path).unwrap();
        assert!(path.exists());
        created.write().storage.document_name = "blocks.json".to_owned();
        let text = created.read().save_toml().unwrap();
        std::fs::write(&path, text).unwrap();
        let reloaded = Config::standard_load(&path).unwrap();
        assert_eq!(reloaded.read().storage.document_name, "blocks.json");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let mut cfg = Config::new();
        assert!(matches!(
            cfg.load_from_toml("storage = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
