//! Reading and writing `config.toml` under the draft home.
use std::fs::{self, File};
use std::io::{self, Read as _};
use std::path::Path;

use super::{Config, ConfigState};
use crate::error::ConfigError;
use crate::home::Home;

/// Load the config file under `home`.
///
/// The file handle is opened once and dropped before decoding, on every
/// exit path.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be opened or
/// read, and [`ConfigError::Format`] if its contents are not UTF-8 or not a
/// flat table of string values. A missing file is not an error.
pub fn load(home: &Home) -> Result<ConfigState, ConfigError> {
    let path = home.config();

    let bytes = match read_existing(&path) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            tracing::debug!("no config file at {}", path.display());
            return Ok(ConfigState::Absent);
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };

    let content = String::from_utf8(bytes).map_err(|e| ConfigError::Format {
        path: path.display().to_string(),
        message: e.utf8_error().to_string(),
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Format {
        path: path.display().to_string(),
        message: describe_toml_error(&e, &content),
    })?;

    tracing::debug!(
        "loaded {} setting(s) from {}",
        config.len(),
        path.display()
    );
    Ok(ConfigState::Loaded(config))
}

/// Write `config` to the config file under `home`, creating the home
/// directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Write`] if the directory cannot be created or the
/// file cannot be written.
pub fn save(home: &Home, config: &Config) -> Result<(), ConfigError> {
    let path = home.config();
    let write_error = |source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    };

    let body = toml::to_string(config)
        .map_err(|e| write_error(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    fs::create_dir_all(home.as_path()).map_err(write_error)?;
    fs::write(&path, body).map_err(write_error)?;

    tracing::debug!("wrote {} setting(s) to {}", config.len(), path.display());
    Ok(())
}

/// Read the raw bytes of `path`, mapping "not found" to `None`.
fn read_existing(path: &Path) -> io::Result<Option<Vec<u8>>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

/// Render a decoder error as a single line, prefixed with the line number
/// when the decoder reports a location.
fn describe_toml_error(err: &toml::de::Error, content: &str) -> String {
    let line = err
        .span()
        .and_then(|span| content.get(..span.start))
        .map(|before| before.matches('\n').count() + 1);
    match line {
        Some(line) => format!("line {line}: {}", err.message()),
        None => err.message().to_string(),
    }
}
