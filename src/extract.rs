use std::{
    fs::File,
    io::Read,
    path::Path,
};

use anyhow::Result;
use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;
use xz2::read::XzDecoder;

use crate::{ar::ArArchive, error::InstallError};

/// Unpack a downloaded binary package into the installation root.
///
/// Lists the outer container's members, requires exactly one
/// `data.tar.*` payload, stages it in a scoped temporary directory, and
/// unpacks the tarball (gzip, xz, or zstd, chosen by the member's own
/// suffix) directly into the root. Existing files are overwritten
/// unconditionally; a failure partway leaves already-written files in
/// place.
pub fn extract(deb: &Path, root: &Path) -> Result<()> {
    let staging = tempfile::tempdir()?;

    let mut outer = ArArchive::new(File::open(deb)?)?;
    let mut payload = None;
    let mut matches = 0;
    while let Some(member) = outer.next_member()? {
        if member.name.starts_with("data.tar.") {
            matches += 1;
            payload = Some(member);
        }
    }
    let member = match (matches, payload) {
        (1, Some(member)) => member,
        (n, _) => return Err(InstallError::UnexpectedPackageLayout(n).into()),
    };

    debug!(member = %member.name, size = member.size, "unpacking data tarball");
    let tarball = staging.path().join(&member.name);
    outer.extract_to(&member, &mut File::create(&tarball)?)?;

    unpack_tarball(&tarball, &member.name, root)
}

fn unpack_tarball(tarball: &Path, member_name: &str, root: &Path) -> Result<()> {
    let file = File::open(tarball)?;
    let suffix = member_name.rsplit('.').next().unwrap_or("");
    let reader: Box<dyn Read> = match suffix {
        "gz" => Box::new(GzDecoder::new(file)),
        "xz" => Box::new(XzDecoder::new(file)),
        "zst" => Box::new(zstd::stream::read::Decoder::new(file)?),
        other => return Err(InstallError::UnsupportedCompression(other.to_string()).into()),
    };

    let mut archive = Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive.unpack(root)?;
    Ok(())
}
