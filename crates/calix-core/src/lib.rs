//! Calix Core — errors, configuration, transcript log.

pub mod config;
pub mod error;
pub mod transcript;

pub use config::{CalixConfig, DEFAULT_WORKER_PORT};
pub use error::{Error, Result};
pub use transcript::Transcript;
