use std::io::{self, Read, Seek, SeekFrom, Write};

use anyhow::Result;

use crate::error::InstallError;

const GLOBAL_MAGIC: &[u8; 8] = b"!<arch>\n";
const HEADER_LEN: usize = 60;

/// One named member of an ar archive.
#[derive(Debug, Clone)]
pub struct ArMember {
    /// Member name, with header padding and any GNU trailing `/` stripped
    pub name: String,
    /// Size of the member data in bytes
    pub size: u64,
    data_offset: u64,
}

/// Sequential reader for the Unix ar format.
///
/// The format is a global `!<arch>\n` magic followed by members, each a
/// fixed 60-byte ASCII header (name 16, mtime 12, uid 6, gid 6, mode 8,
/// size 10, terminator `` `\n ``) and the member data padded to two
/// bytes. This is enough to unwrap a Debian binary package without an
/// external `ar` process.
pub struct ArArchive<R: Read + Seek> {
    inner:       R,
    next_header: u64,
}

impl<R: Read + Seek> ArArchive<R> {
    /// Open an archive, verifying the global magic.
    pub fn new(mut inner: R) -> Result<Self> {
        let mut magic = [0u8; 8];
        inner.seek(SeekFrom::Start(0))?;
        inner
            .read_exact(&mut magic)
            .map_err(|_| InstallError::NotAnArchive)?;
        if &magic != GLOBAL_MAGIC {
            return Err(InstallError::NotAnArchive.into());
        }
        Ok(Self {
            inner,
            next_header: GLOBAL_MAGIC.len() as u64,
        })
    }

    /// Advance to the next member header, or `None` at end of archive.
    ///
    /// Member data is not consumed; read it with [`Self::extract_to`],
    /// or call this again to skip it.
    pub fn next_member(&mut self) -> Result<Option<ArMember>> {
        self.inner.seek(SeekFrom::Start(self.next_header))?;
        let mut header = [0u8; HEADER_LEN];
        match self.inner.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        if &header[58..60] != b"`\n" {
            return Err(InstallError::MalformedArchiveHeader.into());
        }

        let name = field_str(&header[0..16])?;
        let name = name.strip_suffix('/').unwrap_or(name).to_string();
        let size: u64 = field_str(&header[48..58])?
            .parse()
            .map_err(|_| InstallError::MalformedArchiveHeader)?;

        let data_offset = self.next_header + HEADER_LEN as u64;
        // Member data is padded to a two-byte boundary
        self.next_header = data_offset + size + (size & 1);

        Ok(Some(ArMember {
            name,
            size,
            data_offset,
        }))
    }

    /// Copy one member's data into a writer.
    pub fn extract_to<W: Write>(&mut self, member: &ArMember, out: &mut W) -> Result<u64> {
        self.inner.seek(SeekFrom::Start(member.data_offset))?;
        let copied = io::copy(&mut (&mut self.inner).take(member.size), out)?;
        if copied != member.size {
            return Err(InstallError::TruncatedArchive.into());
        }
        Ok(copied)
    }
}

fn field_str(field: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(field).map_err(|_| InstallError::MalformedArchiveHeader)?;
    Ok(text.trim_end_matches(' '))
}
