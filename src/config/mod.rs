use crate::poll::{Bounded, FixedInterval, PollPolicy};
use crate::schema::{Registry, Throughput};

use std::path::{Path, PathBuf};
use tokio::time::Duration;

mod file;

use file::ConfigFile;
pub use file::PollConfig;

const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
const DEFAULT_SAMPLEDATA: &str = "sampledata";

#[derive(Debug, Clone)]
pub struct Config {
    endpoint_url: Option<String>,
    throughput: Throughput,
    poll: PollConfig,
    sampledata: PathBuf,
}

impl Config {
    pub fn load<P: AsRef<Path>>(conf_path: Option<P>, endpoint_url: Option<String>) -> Self {
        let file = ConfigFile::new(conf_path);

        Self {
            endpoint_url,
            throughput: file.throughput().unwrap_or_default(),
            poll: file.poll().unwrap_or(PollConfig {
                interval_ms: DEFAULT_POLL_INTERVAL_MS,
                max_attempts: None,
            }),
            sampledata: file
                .sampledata()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SAMPLEDATA)),
        }
    }

    pub fn endpoint_url(&self) -> Option<String> {
        self.endpoint_url.clone()
    }

    pub fn throughput(&self) -> Throughput {
        self.throughput
    }

    pub fn registry(&self) -> Registry {
        Registry::forum(self.throughput)
    }

    pub fn poll_policy(&self) -> Box<dyn PollPolicy> {
        let interval = Duration::from_millis(self.poll.interval_ms);

        match self.poll.max_attempts {
            Some(max_attempts) => Box::new(Bounded::new(interval, max_attempts)),
            None => Box::new(FixedInterval::new(interval)),
        }
    }

    pub fn sampledata(&self) -> &Path {
        self.sampledata.as_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_uses_defaults_without_a_file() {
        let config = Config::load(None::<&str>, None);

        assert_eq!(config.endpoint_url(), None);
        assert_eq!(config.throughput(), Throughput { read: 20, write: 20 });
        assert_eq!(config.sampledata(), Path::new("sampledata"));
        assert_eq!(
            config.poll_policy().next_delay(1_000),
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn it_applies_the_file() {
        let config = Config::load(
            Some("src/config/test/valid.yml"),
            Some("http://localhost:8000".into()),
        );

        assert_eq!(config.endpoint_url(), Some("http://localhost:8000".into()));
        assert!(config
            .registry()
            .specs()
            .iter()
            .all(|s| s.throughput == Throughput { read: 5, write: 10 }));
        assert_eq!(config.sampledata(), Path::new("fixtures/forum"));

        let policy = config.poll_policy();
        assert_eq!(policy.next_delay(1), Some(Duration::from_millis(250)));
        assert_eq!(policy.next_delay(40), None);
    }
}
