use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::Path,
};

use anyhow::Result;
use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::InstallError;

fn open_index(index: &Path) -> Result<Lines<BufReader<GzDecoder<File>>>> {
    Ok(BufReader::new(GzDecoder::new(File::open(index)?)).lines())
}

/// Resolve a package name to its repository-relative filename.
///
/// Streams the gunzipped index stanza by stanza. The first stanza whose
/// `Package:` field is an exact match is authoritative; its `Filename:`
/// field's last whitespace-delimited token is the artifact path.
pub fn resolve(index: &Path, name: &str) -> Result<String> {
    let wanted = format!("Package: {}", name);
    let mut in_record = false;

    for line in open_index(index)? {
        let line = line?;
        if !in_record {
            in_record = line == wanted;
            continue;
        }
        if line.is_empty() {
            // Stanza ended without naming an artifact
            return Err(InstallError::MalformedPackageRecord(name.to_string()).into());
        }
        if let Some(value) = line.strip_prefix("Filename:") {
            let filename = value
                .split_whitespace()
                .last()
                .ok_or_else(|| InstallError::MalformedPackageRecord(name.to_string()))?;
            debug!(package = name, filename, "resolved package");
            return Ok(filename.to_string());
        }
    }

    if in_record {
        Err(InstallError::MalformedPackageRecord(name.to_string()).into())
    } else {
        Err(InstallError::PackageNotFound(name.to_string()).into())
    }
}

/// Lazy (name, description) pairs scanned from the index.
///
/// Not resumable mid-stream; call [`enumerate`] again for a fresh scan.
pub struct Listing {
    lines:   Lines<BufReader<GzDecoder<File>>>,
    pending: Option<String>,
}

/// Enumerate every package in the index with its one-line description.
pub fn enumerate(index: &Path) -> Result<Listing> {
    Ok(Listing {
        lines:   open_index(index)?,
        pending: None,
    })
}

impl Iterator for Listing {
    type Item = Result<(String, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if let Some(name) = line.strip_prefix("Package: ") {
                self.pending = Some(name.to_string());
            } else if let Some(description) = line.strip_prefix("Description: ") {
                if let Some(name) = self.pending.take() {
                    return Some(Ok((name, description.to_string())));
                }
            }
        }
    }
}
