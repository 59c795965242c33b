use crate::schema::Throughput;

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct ConfigFile {
    throughput: Option<Throughput>,
    poll: Option<PollConfig>,
    sampledata: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub max_attempts: Option<u32>,
}

impl ConfigFile {
    pub fn new<P: AsRef<Path>>(path: Option<P>) -> Self {
        path.map(read_config).unwrap_or_default()
    }

    pub fn throughput(&self) -> Option<Throughput> {
        self.throughput
    }

    pub fn poll(&self) -> Option<PollConfig> {
        self.poll
    }

    pub fn sampledata(&self) -> Option<PathBuf> {
        self.sampledata.clone()
    }
}

fn read_config<P: AsRef<Path>>(path: P) -> ConfigFile {
    _read_config(path).unwrap_or_else(|err| {
        warn!("{err}");
        warn!("Skip reading config file.");
        ConfigFile::default()
    })
}

fn _read_config<P: AsRef<Path>>(path: P) -> Result<ConfigFile, String> {
    let content = fs::read_to_string(&path)
        .map_err(|err| format!("Failed to read: {}. {err}", path.as_ref().to_string_lossy()))?;
    let file: ConfigFile = serde_yaml::from_str(&content)
        .map_err(|err| format!("Failed to deserialize config file: {err}"))?;

    if let Some(Throughput { read, write }) = file.throughput {
        if read < 1 || write < 1 {
            return Err(format!(
                "Throughput must be positive, got read: {read}, write: {write}"
            ));
        }
    }

    if let Some(PollConfig {
        interval_ms,
        max_attempts,
    }) = file.poll
    {
        if interval_ms == 0 {
            return Err("Poll interval must be positive, got interval_ms: 0".to_string());
        }
        if max_attempts == Some(0) {
            return Err("Poll attempts must be positive, got max_attempts: 0".to_string());
        }
    }

    Ok(file)
}
