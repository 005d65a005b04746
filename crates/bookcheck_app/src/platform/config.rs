use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bookcheck_engine::UploadSettings;
use bookcheck_logging::{bc_info, DEFAULT_LOG_FILE};
use serde::Deserialize;
use thiserror::Error;

use super::cli::Cli;

const CONFIG_FILENAME: &str = "bookcheck.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("no backend URL: pass --backend-url, set BOOKCHECK_BACKEND_URL, or add backend_url to bookcheck.ron")]
    MissingBackendUrl,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    backend_url: Option<String>,
    connect_timeout_secs: Option<u64>,
    stream_timeout_secs: Option<u64>,
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upload: UploadSettings,
    pub log_file: PathBuf,
    pub verbose: bool,
}

/// Resolves settings: command line (and environment) first, then the RON file, then defaults.
pub fn load(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let file = match &cli.config {
        Some(path) => read_file_config(path)?,
        None => read_optional_file_config(Path::new(CONFIG_FILENAME))?,
    };
    resolve(cli, file)
}

fn resolve(cli: &Cli, file: FileConfig) -> Result<AppConfig, ConfigError> {
    let defaults = UploadSettings::default();
    let backend_url = cli
        .backend_url
        .clone()
        .or(file.backend_url)
        .filter(|url| !url.trim().is_empty())
        .ok_or(ConfigError::MissingBackendUrl)?;

    let upload = UploadSettings {
        backend_url,
        connect_timeout: file
            .connect_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.connect_timeout),
        stream_timeout: cli
            .stream_timeout_secs
            .or(file.stream_timeout_secs)
            .map(Duration::from_secs)
            .or(defaults.stream_timeout),
    };

    Ok(AppConfig {
        upload,
        log_file: cli
            .log_file
            .clone()
            .or(file.log_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        verbose: cli.verbose,
    })
}

fn read_optional_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    match read_file_config(path) {
        Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            Ok(FileConfig::default())
        }
        other => other,
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    bc_info!("Loaded settings from {:?}", path);
    Ok(config)
}
