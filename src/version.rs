//! Julia version numbers and the version floor written to `REQUIRE`.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A semantic version: `major.minor.patch` with an optional prerelease tag.
///
/// Build metadata is accepted when parsing and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^v?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z.-]+))?(?:\+[0-9A-Za-z.-]+)?$",
        )
        .expect("version pattern is valid")
    })
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch, prerelease: None }
    }

    pub fn with_prerelease<S: Into<String>>(mut self, tag: S) -> Self {
        self.prerelease = Some(tag.into());
        self
    }

    /// `"major.minor"`, dropping patch and prerelease.
    pub fn major_minor(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::VersionParseError { version: s.to_string() };
        let caps = version_regex().captures(s.trim()).ok_or_else(invalid)?;
        let number = |i: usize| -> Result<u64> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().map_err(|_| invalid()),
                None => Ok(0),
            }
        };

        Ok(Self {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            prerelease: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }
}

impl TryFrom<String> for Version {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(tag) = &self.prerelease {
            write!(f, "-{tag}")?;
        }
        Ok(())
    }
}

/// Normalizes a version into the constraint written after `julia` in `REQUIRE`.
///
/// A prerelease of the first patch of a minor series (`1.3.0-beta`) yields
/// `"1.3-"`; everything else yields `"major.minor"`.
pub fn version_floor(version: &Version) -> String {
    if version.prerelease.is_none() || version.patch > 0 {
        version.major_minor()
    } else {
        format!("{}-", version.major_minor())
    }
}
