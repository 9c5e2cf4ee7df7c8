pub mod command;
pub mod config;
pub mod desk;
pub mod queue;

pub use command::{Command, ParseCommandError};
pub use config::{Config, ConfigError};
pub use desk::{Desk, DeskClosed};
pub use queue::{Buzzer, NotInQueue, ServiceQueue};

pub type GenericError = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, GenericError>;
