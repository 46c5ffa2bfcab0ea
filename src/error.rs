use thiserror::Error;

/// An error enum for return from installer methods that may fail
#[derive(Error, Debug)]
pub enum InstallError {
    /// The host machine type has no Debian architecture mapping
    #[error("unsupported platform: no Debian architecture for `{0}`")]
    UnsupportedPlatform(String),
    /// The remote answered with a failure status
    #[error("fetch of {url} failed: HTTP {status}")]
    Network {
        /// The URL that was requested
        url:    String,
        /// The HTTP status the server answered with
        status: u16,
    },
    /// The requested name appears nowhere in the index
    #[error("no such package: {0}")]
    PackageNotFound(String),
    /// The package's stanza ended before a Filename field
    #[error("package record for {0} has no Filename field")]
    MalformedPackageRecord(String),
    /// The outer container did not hold exactly one data tarball
    #[error("expected exactly one data.tar member, found {0}")]
    UnexpectedPackageLayout(usize),
    /// The downloaded file does not start with the ar global magic
    #[error("package is not an ar archive")]
    NotAnArchive,
    /// A member header could not be parsed
    #[error("malformed ar member header")]
    MalformedArchiveHeader,
    /// A member's data ended before its declared size
    #[error("ar member data is truncated")]
    TruncatedArchive,
    /// The data tarball uses a compression we cannot decode
    #[error("unsupported data tarball compression: `{0}`")]
    UnsupportedCompression(String),
}
