//! Runtime detection for Bun

use anyhow::Result;
use semver::Version;
use std::process::Command;

/// Oldest Bun the generated scripts and `bun create nuxt` are known to work with
pub const MIN_BUN_VERSION: &str = "1.1.0";

pub const BUN_INSTALL_URL: &str = "https://bun.sh";

/// Runtime detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

impl RuntimeInfo {
    pub fn found(name: &'static str, version: impl Into<String>) -> Self {
        Self {
            name,
            version: Some(version.into()),
            available: true,
        }
    }

    pub fn missing(name: &'static str) -> Self {
        Self {
            name,
            version: None,
            available: false,
        }
    }

    /// Warning text if the detected version is older than `minimum`
    pub fn version_warning(&self, minimum: &str) -> Option<String> {
        let found = parse_version(self.version.as_deref()?).ok()?;
        let minimum = parse_version(minimum).ok()?;

        (found < minimum).then(|| {
            format!(
                "{} {} is older than the recommended {}. Consider upgrading: bun upgrade",
                self.name, found, minimum
            )
        })
    }
}

fn detect(binary: &str, name: &'static str) -> RuntimeInfo {
    let output = Command::new(binary).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo::found(name, version)
        }
        _ => RuntimeInfo::missing(name),
    }
}

/// Check if Bun is available
pub fn check_bun() -> RuntimeInfo {
    detect("bun", "Bun")
}

/// Parse version string, tolerating a leading `v`
pub fn parse_version(version_str: &str) -> Result<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}
