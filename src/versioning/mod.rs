//! Versioned scene file names and next-version resolution.
//!
//! Scene files follow `{asset}_{task}_v{version}.{subversion}.{ext}` where
//! both numbers are zero-padded to three digits and a published file uses
//! the literal subversion `pub`.

mod resolve;

pub use resolve::{
    plan_save, resolve_versions, CopyForward, ResolvedVersion, SaveMode, SavePlan,
};

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Subversion marker of a published file
pub const PUBLISH_TOKEN: &str = "pub";

/// Width of the zero-padded version fields
pub const VERSION_WIDTH: usize = 3;

/// Highest number that fits the zero-padded fields
pub const MAX_VERSION: u32 = 999;

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("Corrupt version filename '{file_name}': {reason}")]
    CorruptFilename { file_name: String, reason: String },

    #[error("Latest file '{file_name}' is already published")]
    AlreadyPublished { file_name: String },

    #[error("Select an asset and a task before saving")]
    IncompleteEnvironment,

    #[error("Copy-forward target {} already exists", path.display())]
    CopyForwardExists { path: PathBuf },

    #[error("No version left after '{file_name}': versions stop at 999")]
    VersionLimit { file_name: String },
}

/// Second number of a versioned file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubVersion {
    Number(u32),
    Published,
}

impl fmt::Display for SubVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubVersion::Number(n) => f.write_str(&format_version(*n)),
            SubVersion::Published => f.write_str(PUBLISH_TOKEN),
        }
    }
}

/// The numeric parts of a versioned scene file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedFilename {
    pub version: u32,
    pub subversion: SubVersion,
    pub extension: String,
}

impl VersionedFilename {
    /// Parse the version fields out of a file name.
    ///
    /// The name is split on `.`: the last three characters of the first
    /// part are the version, the second-to-last part is the subversion and
    /// the last part is the extension. Anything else is corrupt.
    pub fn parse(file_name: &str) -> Result<Self, VersionError> {
        let corrupt = |reason: &str| VersionError::CorruptFilename {
            file_name: file_name.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = file_name.split('.').collect();
        if parts.len() < 3 {
            return Err(corrupt("expected <name>_v<version>.<subversion>.<ext>"));
        }

        let stem = parts[0];
        let version_digits = stem
            .char_indices()
            .rev()
            .nth(VERSION_WIDTH - 1)
            .map(|(i, _)| &stem[i..])
            .ok_or_else(|| corrupt("version token is too short"))?;
        let version = parse_number(version_digits)
            .ok_or_else(|| corrupt(&format!("'{version_digits}' is not a version number")))?;

        let sub_token = parts[parts.len() - 2];
        let subversion = if sub_token == PUBLISH_TOKEN {
            SubVersion::Published
        } else {
            SubVersion::Number(
                parse_number(sub_token)
                    .ok_or_else(|| corrupt(&format!("'{sub_token}' is not a subversion")))?,
            )
        };

        Ok(Self {
            version,
            subversion,
            extension: parts[parts.len() - 1].to_string(),
        })
    }
}

/// Compose `{asset}_{task}_v{version}.{subversion}.{ext}`
pub fn compose_file_name(
    asset: &str,
    task: &str,
    version: u32,
    subversion: SubVersion,
    extension: &str,
) -> String {
    format!(
        "{asset}_{task}_v{}.{subversion}.{extension}",
        format_version(version)
    )
}

/// Zero-pad a version number to three digits
pub fn format_version(n: u32) -> String {
    format!("{n:0width$}", width = VERSION_WIDTH)
}

/// Exactly three ASCII digits
fn parse_number(token: &str) -> Option<u32> {
    if token.len() != VERSION_WIDTH || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// `n + 1` while it still fits three digits
pub(crate) fn next_number(n: u32) -> Option<u32> {
    n.checked_add(1).filter(|next| *next <= MAX_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_subversion() {
        let parsed = VersionedFilename::parse("Foo_rig_v001.003.ma").unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.subversion, SubVersion::Number(3));
        assert_eq!(parsed.extension, "ma");
    }

    #[test]
    fn test_parse_published() {
        let parsed = VersionedFilename::parse("Foo_rig_v012.pub.mb").unwrap();
        assert_eq!(parsed.version, 12);
        assert_eq!(parsed.subversion, SubVersion::Published);
    }

    #[test]
    fn test_malformed_names_are_corrupt() {
        for name in [
            "notes.txt",
            "Foo_rig_vabc.001.ma",
            "Foo_rig_v001.x01.ma",
            "v1.001.ma",
            "Foo_rig_v001..ma",
            "Foo_rig_v001.1000.ma",
            "Foo_rig_v001.4294967295.ma",
            "Foo_rig_v001.01.ma",
        ] {
            assert!(
                matches!(
                    VersionedFilename::parse(name),
                    Err(VersionError::CorruptFilename { .. })
                ),
                "{name} should be corrupt"
            );
        }
    }

    #[test]
    fn test_compose_file_name() {
        assert_eq!(
            compose_file_name("Foo", "rig", 2, SubVersion::Number(1), "ma"),
            "Foo_rig_v002.001.ma"
        );
        assert_eq!(
            compose_file_name("Foo", "rig", 1, SubVersion::Published, "ma"),
            "Foo_rig_v001.pub.ma"
        );
    }

    #[test]
    fn test_next_number_stops_at_limit() {
        assert_eq!(next_number(1), Some(2));
        assert_eq!(next_number(998), Some(999));
        assert_eq!(next_number(MAX_VERSION), None);
        assert_eq!(next_number(u32::MAX), None);
    }

    #[test]
    fn test_format_version() {
        assert_eq!(format_version(7), "007");
        assert_eq!(format_version(1000), "1000");
    }
}
