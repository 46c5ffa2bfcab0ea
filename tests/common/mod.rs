// Not every test binary uses every helper
#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    io::Write,
    path::PathBuf,
};

use debstow::{Config, InstallError, RemoteResponse, Transport};
use flate2::{write::GzEncoder, Compression};
use tempfile::TempDir;

/// Stamp served with every canned file unless overridden.
pub const LAST_MODIFIED: &str = "Wed, 21 Oct 2015 07:28:00 GMT";

struct Remote {
    body:          Vec<u8>,
    last_modified: String,
}

/// In-memory stand-in for the HTTP mirror.
///
/// Serves canned files keyed by URL, honors If-Modified-Since by string
/// comparison against each file's stamp, and records every request so
/// tests can assert on traffic.
pub struct FakeMirror {
    files: RefCell<HashMap<String, Remote>>,
    pub requests: RefCell<Vec<String>>,
    pub bodies_served: Cell<usize>,
}

impl FakeMirror {
    pub fn new() -> Self {
        FakeMirror {
            files: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
            bodies_served: Cell::new(0),
        }
    }

    pub fn put(&self, url: &str, body: Vec<u8>) {
        self.put_with_stamp(url, body, LAST_MODIFIED);
    }

    pub fn put_with_stamp(&self, url: &str, body: Vec<u8>, last_modified: &str) {
        self.files.borrow_mut().insert(
            url.to_string(),
            Remote {
                body,
                last_modified: last_modified.to_string(),
            },
        );
    }
}

impl Transport for FakeMirror {
    fn get(&self, url: &str, if_modified_since: Option<&str>) -> anyhow::Result<RemoteResponse> {
        self.requests.borrow_mut().push(url.to_string());
        let files = self.files.borrow();
        let remote = match files.get(url) {
            Some(remote) => remote,
            None => {
                return Err(InstallError::Network {
                    url:    url.to_string(),
                    status: 404,
                }
                .into())
            }
        };
        if if_modified_since == Some(remote.last_modified.as_str()) {
            return Ok(RemoteResponse::NotModified);
        }
        self.bodies_served.set(self.bodies_served.get() + 1);
        Ok(RemoteResponse::Payload {
            body:          remote.body.clone(),
            last_modified: Some(remote.last_modified.clone()),
        })
    }
}

/// A throwaway installation root plus a fake mirror, wired through one
/// Config.
pub struct Fixture {
    pub config: Config,
    pub mirror: FakeMirror,
    _tempdir:   TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let tempdir = tempfile::tempdir().unwrap();
        let config = Config::new(
            "http://mirror.test/debian",
            "stable",
            "x86_64",
            tempdir.path().join("root"),
        )
        .unwrap();
        Fixture {
            config,
            mirror: FakeMirror::new(),
            _tempdir: tempdir,
        }
    }

    pub fn serve_index(&self, stanzas: &str) {
        self.mirror
            .put(&self.config.index_url(), gzip(stanzas.as_bytes()));
    }

    pub fn serve_package(&self, filename: &str, deb: Vec<u8>) {
        self.mirror.put(&self.config.package_url(filename), deb);
    }
}

/// Write a gzipped index into a temp dir, for parser tests that need no
/// mirror.
pub fn index_file(stanzas: &str) -> (TempDir, PathBuf) {
    let tempdir = tempfile::tempdir().unwrap();
    let path = tempdir.path().join("Packages.gz");
    std::fs::write(&path, gzip(stanzas.as_bytes())).unwrap();
    (tempdir, path)
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn xz(data: &[u8]) -> Vec<u8> {
    let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn zst(data: &[u8]) -> Vec<u8> {
    zstd::stream::encode_all(data, 0).unwrap()
}

pub fn compress(suffix: &str, data: &[u8]) -> Vec<u8> {
    match suffix {
        "gz" => gzip(data),
        "xz" => xz(data),
        "zst" => zst(data),
        other => panic!("unknown compression suffix {}", other),
    }
}

/// Build an uncompressed tar archive of (path, contents, mode) entries.
pub fn tarball(entries: &[(&str, &[u8], u32)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, contents, mode) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(*mode);
        header.set_cksum();
        builder.append_data(&mut header, path, *contents).unwrap();
    }
    builder.into_inner().unwrap()
}

/// Build an ar archive from (name, data) members.
pub fn ar_archive(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut out = b"!<arch>\n".to_vec();
    for (name, data) in members {
        out.extend_from_slice(
            format!(
                "{:<16}{:<12}{:<6}{:<6}{:<8}{:<10}`\n",
                name,
                0,
                0,
                0,
                "100644",
                data.len()
            )
            .as_bytes(),
        );
        out.extend_from_slice(data);
        if data.len() % 2 == 1 {
            out.push(b'\n');
        }
    }
    out
}

/// Build a Debian-style package holding one data tarball member, plus
/// the debian-binary and control members real packages carry.
pub fn deb(data_member: &str, data: &[u8]) -> Vec<u8> {
    ar_archive(&[
        ("debian-binary", b"2.0\n"),
        ("control.tar.gz", &gzip(b"")),
        (data_member, data),
    ])
}
