#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]

//! Unprivileged installer for Debian binary packages.
//!
//! Populates a per-user prefix with software pulled from a Debian-style
//! package repository, without requiring root, apt, or dpkg. The prefix
//! mimics a system root (`usr/bin`, `lib`, ...) and installed programs
//! are run with `PATH` and `LD_LIBRARY_PATH` pointed into it.

pub use ar::{ArArchive, ArMember};
pub use config::Config;
pub use error::InstallError;
pub use extract::extract;
pub use index::{sync, SyncOutcome};
pub use install::install;
pub use packages::{enumerate, resolve, Listing};
pub use transport::{HttpTransport, RemoteResponse, Transport};

/// Reader for the ar container wrapping a binary package.
mod ar;
/// Immutable installer configuration.
mod config;
/// Error codes
mod error;
/// Unpacking of downloaded packages into the prefix.
mod extract;
/// Conditional synchronization of the package index.
mod index;
/// Per-package install orchestration.
mod install;
/// Streaming parser for the Packages index.
mod packages;
/// Network access, swappable for tests.
mod transport;
