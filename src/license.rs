//! License bodies written below the copyright line of `LICENSE`.

use std::fs;
use std::path::PathBuf;

use log::debug;

use crate::error::{Error, Result};

const EMBEDDED: [(&str, &str); 4] = [
    ("BSD2", include_str!("../licenses/BSD2")),
    ("BSD3", include_str!("../licenses/BSD3")),
    ("ISC", include_str!("../licenses/ISC")),
    ("MIT", include_str!("../licenses/MIT")),
];

/// A source of license bodies keyed by identifier.
pub trait LicenseStore {
    /// Returns the body of license `id`.
    ///
    /// # Errors
    /// * `Error::UnknownLicenseError` if the store has no license `id`
    fn read_body(&self, id: &str) -> Result<String>;

    /// Identifiers the store knows, sorted.
    fn available(&self) -> Vec<String>;

    fn unknown(&self, id: &str) -> Error {
        Error::UnknownLicenseError {
            license: id.to_string(),
            available: self.available().join(", "),
        }
    }
}

/// The licenses shipped with pkgbaker.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedLicenses;

impl LicenseStore for EmbeddedLicenses {
    fn read_body(&self, id: &str) -> Result<String> {
        EMBEDDED
            .iter()
            .find(|(name, _)| *name == id)
            .map(|(_, body)| body.to_string())
            .ok_or_else(|| self.unknown(id))
    }

    fn available(&self) -> Vec<String> {
        EMBEDDED.iter().map(|(name, _)| name.to_string()).collect()
    }
}

/// Licenses read from a directory, one file per identifier.
#[derive(Debug, Clone)]
pub struct DirectoryLicenses {
    dir: PathBuf,
}

impl DirectoryLicenses {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }
}

impl LicenseStore for DirectoryLicenses {
    fn read_body(&self, id: &str) -> Result<String> {
        let path = self.dir.join(id);
        // Identifiers are file names, never paths.
        if id.is_empty() || id.contains(['/', '\\']) || !path.is_file() {
            return Err(self.unknown(id));
        }
        debug!("Reading license '{}' from {}", id, path.display());
        Ok(fs::read_to_string(path)?)
    }

    fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.dir)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.path().is_file())
                    .filter_map(|entry| entry.file_name().into_string().ok())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_licenses_are_sorted() {
        let available = EmbeddedLicenses.available();
        let mut sorted = available.clone();
        sorted.sort();
        assert_eq!(available, sorted);
    }

    #[test]
    fn test_unknown_embedded_license() {
        match EmbeddedLicenses.read_body("WTFPL") {
            Err(Error::UnknownLicenseError { license, available }) => {
                assert_eq!(license, "WTFPL");
                assert_eq!(available, "BSD2, BSD3, ISC, MIT");
            }
            other => panic!("Expected UnknownLicenseError, got {:?}", other),
        }
    }
}
