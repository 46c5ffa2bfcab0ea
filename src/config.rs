use std::{env, path::PathBuf};

use anyhow::{Context, Result};

use crate::error::InstallError;

/// Name of the stored index snapshot inside the installation root.
pub const INDEX_FILE: &str = "Packages.gz";

/// Immutable settings for one installer invocation.
///
/// Built once at startup and passed by reference into every component,
/// so tests can point at a throwaway mirror and root.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the package mirror, without a trailing slash
    pub mirror:       String,
    /// Release (suite) name within the mirror
    pub release:      String,
    /// Debian architecture label for the host
    pub architecture: &'static str,
    /// Installation root owned by the current user
    pub root:         PathBuf,
}

impl Config {
    /// Create a configuration for the default Debian mirror and a root
    /// under the current user's data directory.
    pub fn from_host() -> Result<Self> {
        let root = dirs::data_local_dir()
            .context("could not determine the user data directory")?
            .join("debstow");
        Self::new("https://deb.debian.org/debian", "stable", env::consts::ARCH, root)
    }

    /// Create a configuration for an explicit mirror, release, host
    /// machine type, and installation root.
    pub fn new(mirror: &str, release: &str, machine: &str, root: PathBuf) -> Result<Self> {
        Ok(Self {
            mirror: mirror.trim_end_matches('/').to_string(),
            release: release.to_string(),
            architecture: debian_arch(machine)?,
            root,
        })
    }

    /// URL of the repository's Packages index for this release and
    /// architecture.
    pub fn index_url(&self) -> String {
        format!(
            "{}/dists/{}/main/binary-{}/{}",
            self.mirror, self.release, self.architecture, INDEX_FILE
        )
    }

    /// On-disk path of the stored index snapshot.
    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// URL of a package artifact, from its repository-relative filename.
    pub fn package_url(&self, filename: &str) -> String {
        format!("{}/{}", self.mirror, filename)
    }

    /// Executable directories inside the root, in PATH precedence order.
    pub fn bin_dirs(&self) -> Vec<PathBuf> {
        ["usr/sbin", "sbin", "usr/bin", "bin", "usr/games"]
            .iter()
            .map(|d| self.root.join(d))
            .collect()
    }

    /// Shared library directory inside the root.
    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("usr/lib")
    }
}

/// Map a host machine type to its Debian architecture label.
// TODO: riscv64 and arm64
fn debian_arch(machine: &str) -> Result<&'static str> {
    match machine {
        "x86_64" => Ok("amd64"),
        other => Err(InstallError::UnsupportedPlatform(other.to_string()).into()),
    }
}
