use std::{io::ErrorKind, path::Path};

use crate::errors::IndexError;

/// A profile entry picked out of `profiles.ini`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDescriptor {
    pub path: String,
    pub is_relative: bool,
}

/// Finds the default profile in the registry at `registry`.
///
/// Lines are scanned top to bottom while remembering the latest `Path`,
/// `IsRelative` and `Default` values. Scanning stops as soon as a `Default`
/// equals `1`; otherwise the last pair seen wins, even if it belongs to a
/// non-default profile.
pub fn default_profile(registry: &Path) -> Result<ProfileDescriptor, IndexError> {
    let data = match std::fs::read_to_string(registry) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(IndexError::RegistryNotFound(registry.to_path_buf()))
        }
        Err(source) => {
            return Err(IndexError::ReadError {
                path: registry.to_path_buf(),
                source,
            })
        }
    };

    parse_registry(&data).ok_or_else(|| IndexError::ProfileMissing(registry.to_path_buf()))
}

pub fn parse_registry(data: &str) -> Option<ProfileDescriptor> {
    let mut last_path: Option<&str> = None;
    let mut last_is_relative: Option<&str> = None;
    let mut last_default: Option<&str> = None;

    for line in data.lines() {
        let Some((key, value)) = split_key_value(line) else {
            continue;
        };

        match key {
            "Path" => last_path = Some(value),
            "IsRelative" => last_is_relative = Some(value),
            "Default" => last_default = Some(value),
            _ => {}
        }

        if last_default.map(str::trim) == Some("1") {
            break;
        }
    }

    last_path.map(|path| ProfileDescriptor {
        path: path.to_string(),
        is_relative: last_is_relative.map(str::trim) == Some("1"),
    })
}

// `key=value` with a non-empty key and value; section headers and blanks don't match
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches('\r');
    let (key, value) = line.split_once('=')?;
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}
