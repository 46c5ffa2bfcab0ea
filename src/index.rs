use std::{
    fs::{self, DirBuilder},
    io::Write,
    os::unix::fs::DirBuilderExt,
};

use anyhow::Result;
use chrono::{DateTime, Utc};
use filetime::FileTime;
use tracing::{debug, info};

use crate::{
    config::Config,
    transport::{RemoteResponse, Transport},
};

/// HTTP date layout used for If-Modified-Since preconditions.
const HTTP_DATE_FMT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Result of one index synchronization.
#[derive(Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A fresh snapshot was downloaded and stored
    Updated,
    /// The remote copy matched the stored snapshot
    NotModified,
}

/// Refresh the stored Packages snapshot if the remote copy changed.
///
/// Creates the installation root (owner-only) if absent, then performs a
/// conditional fetch keyed on the snapshot's modification time. A fresh
/// snapshot replaces the old one wholesale; its atime/mtime are set to
/// the server-reported Last-Modified value, which becomes the
/// precondition for the next call.
pub fn sync(config: &Config, transport: &dyn Transport) -> Result<SyncOutcome> {
    DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(&config.root)?;

    let snapshot = config.index_path();
    let precondition = match fs::metadata(&snapshot) {
        Ok(meta) => {
            let mtime: DateTime<Utc> = meta.modified()?.into();
            Some(mtime.format(HTTP_DATE_FMT).to_string())
        }
        Err(_) => {
            debug!("no stored index yet, fetching unconditionally");
            None
        }
    };

    match transport.get(&config.index_url(), precondition.as_deref())? {
        RemoteResponse::NotModified => {
            info!("package index already up to date");
            Ok(SyncOutcome::NotModified)
        }
        RemoteResponse::Payload { body, last_modified } => {
            let mut staged = tempfile::NamedTempFile::new_in(&config.root)?;
            staged.write_all(&body)?;
            staged.persist(&snapshot)?;

            if let Some(stamp) = last_modified {
                let served = DateTime::parse_from_rfc2822(&stamp)?;
                let mtime = FileTime::from_unix_time(served.timestamp(), 0);
                filetime::set_file_times(&snapshot, mtime, mtime)?;
            }

            debug!(bytes = body.len(), "stored fresh package index");
            Ok(SyncOutcome::Updated)
        }
    }
}
