//! Error type for the fallible edges of the crate.
//!
//! Record parsing, dictionary queries and expression evaluation never fail
//! (they yield fewer results instead); only configuration, compiled artifacts
//! and the external converter report errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    ConfigDecode(#[from] toml::de::Error),

    #[error("cannot serialize configuration: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("phrase index error: {0}")]
    Index(#[from] fst::Error),

    #[error("phrase payload error: {0}")]
    Payload(#[from] bincode::Error),

    /// The index and payload artifacts do not describe the same dictionary.
    #[error("inconsistent dictionary artifacts: index has {keys} keys, payload has {payloads}")]
    ArtifactMismatch { keys: usize, payloads: usize },

    #[error("converter `{program}` failed: {reason}")]
    Converter { program: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
