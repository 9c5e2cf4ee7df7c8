use serde::Deserialize;
use std::path::Path;
use tracing::Level;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    InvalidLogLevel(String),
    ZeroMailboxCapacity,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "could not read config: {}", e),
            ConfigError::Toml(e) => write!(f, "invalid config: {}", e),
            ConfigError::InvalidLogLevel(l) => write!(f, "unknown `log_level` {:?}", l),
            ConfigError::ZeroMailboxCapacity => {
                write!(f, "`mailbox_capacity` must be greater than zero")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Toml(e)
    }
}

/// Console settings, read from a TOML file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub prompt: String,
    pub banner: bool,
    pub log_level: String,
    pub mailbox_capacity: usize,
    pub desk_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "cmd > ".into(),
            banner: true,
            log_level: "warn".into(),
            mailbox_capacity: 100,
            desk_name: None,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn level(&self) -> Result<Level, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.level()?;
        if self.mailbox_capacity == 0 {
            return Err(ConfigError::ZeroMailboxCapacity);
        }
        Ok(())
    }
}
