//! Configuration de l'application
//!
//! Lue depuis un fichier JSON (`config.json` par défaut, ou le chemin de la variable
//! d'environnement `REQDESK_CONFIG`). Un fichier absent donne la configuration par défaut,
//! une clé absente prend sa valeur par défaut.

use std::{fmt, path::{Path, PathBuf}, time::Duration};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "REQDESK_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Serde(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "Unable to read configuration: {}", e),
            Error::Serde(e) => write!(f, "Unable to parse configuration: {}", e),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL du backend, sans slash final
    pub base_url: String,
    /// Fichier où le jeton de session est conservé
    pub session_file: PathBuf,
    /// Dossier des pièces jointes téléchargées
    pub download_dir: PathBuf,
    pub request_timeout_secs: u64,
    /// Niveau de log. Si absent, dépend du type de build.
    pub log_level: Option<LogLevel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            session_file: PathBuf::from("session.json"),
            download_dir: PathBuf::from("."),
            request_timeout_secs: 30,
            log_level: None,
        }
    }
}

impl Config {
    pub fn read_file<P: AsRef<Path>>(filepath: P) -> Result<Self, Error> {
        let content = std::fs::read_to_string(filepath.as_ref()).map_err(Error::Io)?;
        let mut config: Config = serde_json::from_str(&content).map_err(Error::Serde)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }
    /// Lit le fichier s'il existe, sinon la configuration par défaut.
    pub fn read_file_or_default<P: AsRef<Path>>(filepath: P) -> Result<Self, Error> {
        if filepath.as_ref().exists() {
            Self::read_file(filepath)
        } else {
            Ok(Self::default())
        }
    }
    /// Chemin du fichier de configuration
    pub fn path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
    pub fn load() -> Result<Self, Error> {
        Self::read_file_or_default(Self::path())
    }
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
    pub fn log_filter(&self) -> Option<log::LevelFilter> {
        self.log_level.map(log::LevelFilter::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::read_file_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"base_url": "http://api.local:9000/", "log_level": "info"}}"#).unwrap();
        let config = Config::read_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://api.local:9000");
        assert_eq!(config.log_filter(), Some(log::LevelFilter::Info));
        assert_eq!(config.session_file, PathBuf::from("session.json"));
    }

    #[test]
    fn invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(Config::read_file(file.path()), Err(Error::Serde(_))));
    }
}
