//! Result and Error types for the crate.
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result containing an error variant from this module.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration error variants
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// IO error while reading or writing a configuration file.
    #[error("failed to access config file `{}`", path.display())]
    #[diagnostic(help("check that the config root contains the file"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Deserialize error, this wraps a [`toml::de::Error`]
    #[error("failed to parse config file `{}`", path.display())]
    Deserialize {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Serialize error, this wraps a [`toml::ser::Error`]
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// The config did not serialize to a TOML table.
    #[error("config `{0}` does not serialize to a table")]
    NotATable(&'static str),
}
