//! Configuration and state file I/O.
//!
//! Configuration is YAML with the resource attributes at the top level.
//! State is pretty-printed JSON.

use std::path::Path;

use commerce_discounts_provider::{ProductDiscountConfig, ResourceData};

use super::CommandError;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CommandError + '_ {
    move |source| CommandError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load a configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<ProductDiscountConfig, CommandError> {
    let contents = std::fs::read_to_string(path).map_err(io_error(path))?;
    serde_yaml::from_str(&contents).map_err(|source| CommandError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a state file, returning `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_state(path: &Path) -> Result<Option<ResourceData>, CommandError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(path)(e)),
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| CommandError::StateFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Write a state file, replacing any previous contents.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_state(path: &Path, state: &ResourceData) -> Result<(), CommandError> {
    let json = serde_json::to_string_pretty(state).map_err(|source| CommandError::StateFile {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json + "\n").map_err(io_error(path))
}

/// Remove a state file. A missing file is not an error.
///
/// # Errors
///
/// Returns an error if an existing file cannot be removed.
pub fn remove_state(path: &Path) -> Result<(), CommandError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error(path)(e)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use commerce_discounts_core::{LocalizedString, ProductDiscountId};
    use commerce_discounts_provider::resource::ValueBlock;

    use super::*;

    fn temp_path(extension: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ctd-test-{}.{extension}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_load_config() {
        let path = temp_path("yaml");
        std::fs::write(
            &path,
            "name:\n  en: Summer\nkey: summer\nis_active: true\nvalid_from: \"2024-06-01\"\nvalue:\n  - type: relative\n    permyriad: 1500\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.name, LocalizedString::new().with("en", "Summer"));
        assert_eq!(config.key.as_deref(), Some("summer"));
        assert!(config.is_active);
        assert_eq!(config.valid_from.as_deref(), Some("2024-06-01"));
        assert_eq!(config.value, vec![ValueBlock::relative(1500)]);
    }

    #[test]
    fn test_load_config_reports_path() {
        let path = temp_path("yaml");
        std::fs::write(&path, "key: [unterminated").unwrap();

        let err = load_config(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, CommandError::ConfigFile { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn test_missing_state_is_none() {
        assert!(load_state(&temp_path("json")).unwrap().is_none());
    }

    #[test]
    fn test_state_save_load_remove() {
        let path = temp_path("json");
        let state = ResourceData {
            id: Some(ProductDiscountId::parse("pd-1").unwrap()),
            version: 5,
            ..ResourceData::default()
        };

        save_state(&path, &state).unwrap();
        assert_eq!(load_state(&path).unwrap(), Some(state));

        remove_state(&path).unwrap();
        assert!(!path.exists());

        // Removing twice is fine
        remove_state(&path).unwrap();
    }
}
