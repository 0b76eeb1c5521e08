pub mod config;
pub mod error;

pub use config::GenesisConfig;
pub use error::{GenesisError, Result};
