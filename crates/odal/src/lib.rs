//! # odal
//!
//! Layered configuration loading for the robot.
//!
//! Every configuration type lives in a single TOML file inside a config root (usually
//! `./config/`). A robot can override part of that file by placing a file with the same name in
//! its overlay root (usually `./config/overlay/<robot name>/`). Keys present in the overlay replace
//! the keys of the main file, nested tables are merged recursively.
use std::fs;
use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};
use toml::{Table, Value};

pub mod error;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;

/// A configuration that is stored as a TOML file.
pub trait Config: Serialize + DeserializeOwned {
    /// File name of this config, relative to a config root.
    const PATH: &'static str;

    /// Load the config from `root`.
    fn load(root: impl AsRef<Path>) -> Result<Self> {
        let table = read_table(&root.as_ref().join(Self::PATH))?;
        from_table(table, &root.as_ref().join(Self::PATH))
    }

    /// Load the config from `root`, with the overlay stored in `overlay_root` applied on top.
    ///
    /// A missing overlay file is not an error, the main config is returned as is.
    fn load_with_overlay(root: impl AsRef<Path>, overlay_root: impl AsRef<Path>) -> Result<Self> {
        let main_path = root.as_ref().join(Self::PATH);
        let overlay_path = overlay_root.as_ref().join(Self::PATH);

        let main = read_table(&main_path)?;
        if !overlay_path.exists() {
            tracing::debug!(path = %overlay_path.display(), "no config overlay found");
            return from_table(main, &main_path);
        }

        let overlay = read_table(&overlay_path)?;
        tracing::debug!(path = %overlay_path.display(), "applying config overlay");
        from_table(merge(main, overlay, false), &overlay_path)
    }

    /// Store the difference between `self` and `main` as an overlay in `overlay_root`.
    fn save_as_overlay(&self, main: &Self, overlay_root: impl AsRef<Path>) -> Result<()> {
        let diff = extract_diff(&to_table::<Self>(main)?, &to_table::<Self>(self)?);
        let path = overlay_root.as_ref().join(Self::PATH);

        let contents = toml::to_string_pretty(&diff)?;
        fs::write(&path, contents).map_err(|source| Error::Io { path, source })
    }
}

/// Merge `overlay` into `main`.
///
/// Keys that exist in both tables take the overlay value, unless both values are tables, in which
/// case they are merged recursively. Keys that only exist in the overlay are added when `add_keys`
/// is set, and dropped otherwise.
#[must_use]
pub fn merge(main: Table, mut overlay: Table, add_keys: bool) -> Table {
    let mut merged = Table::new();

    for (key, value) in main {
        let merged_value = match (value, overlay.remove(&key)) {
            (Value::Table(main_table), Some(Value::Table(overlay_table))) => {
                Value::Table(merge(main_table, overlay_table, add_keys))
            }
            (_, Some(overlay_value)) => overlay_value,
            (value, None) => value,
        };
        merged.insert(key, merged_value);
    }

    if add_keys {
        merged.extend(overlay);
    }

    merged
}

/// Compute the keys of `changed` that differ from `main`.
///
/// Nested tables are compared recursively, so the result only contains the leaves that changed.
#[must_use]
pub fn extract_diff(main: &Table, changed: &Table) -> Table {
    let mut diff = Table::new();

    for (key, value) in changed {
        match (main.get(key), value) {
            (Some(Value::Table(main_table)), Value::Table(changed_table)) => {
                let nested = extract_diff(main_table, changed_table);
                if !nested.is_empty() {
                    diff.insert(key.clone(), Value::Table(nested));
                }
            }
            (Some(main_value), value) if main_value == value => {}
            _ => {
                diff.insert(key.clone(), value.clone());
            }
        }
    }

    diff
}

fn read_table(path: &Path) -> Result<Table> {
    let contents = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    contents.parse().map_err(|source| Error::Deserialize {
        path: path.to_path_buf(),
        source,
    })
}

fn from_table<T: DeserializeOwned>(table: Table, path: &Path) -> Result<T> {
    Value::Table(table)
        .try_into()
        .map_err(|source| Error::Deserialize {
            path: path.to_path_buf(),
            source,
        })
}

fn to_table<T: Config>(config: &T) -> Result<Table> {
    match Value::try_from(config)? {
        Value::Table(table) => Ok(table),
        _ => Err(Error::NotATable(T::PATH)),
    }
}
