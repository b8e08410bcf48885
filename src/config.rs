
use std::time::Duration;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 50021;

#[cfg(target_os = "linux")]
pub const DEFAULT_PLAY_COMMAND: &str = "aplay";
#[cfg(not(target_os = "linux"))]
pub const DEFAULT_PLAY_COMMAND: &str = "play -q -t wav -";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub play_command: String,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            play_command: DEFAULT_PLAY_COMMAND.to_owned(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("VOICEVOX_HOST").unwrap_or(defaults.host);
        let port = std::env::var("VOICEVOX_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);
        let play_command = std::env::var("VOICEVOX_PLAY_CMD")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.play_command);
        let timeout = std::env::var("VOICEVOX_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .or(defaults.timeout);

        Self {
            host,
            port,
            play_command,
            timeout,
        }
    }

    pub fn with_play_command(mut self, play_command: impl Into<String>) -> Self {
        self.play_command = play_command.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
