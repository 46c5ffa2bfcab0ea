use std::fs;

use anyhow::Result;
use tracing::{debug, info};

use crate::{
    config::Config,
    error::InstallError,
    extract, index, packages,
    transport::{RemoteResponse, Transport},
};

/// Install each named package into the configured root, in order.
///
/// The index is synchronized exactly once, covering every requested
/// name. Names are then processed independently and strictly in order;
/// the first name that fails to resolve, download, or extract aborts
/// the rest.
pub fn install(config: &Config, transport: &dyn Transport, names: &[String]) -> Result<()> {
    index::sync(config, transport)?;
    for name in names {
        install_one(config, transport, name)?;
    }
    Ok(())
}

fn install_one(config: &Config, transport: &dyn Transport, name: &str) -> Result<()> {
    let filename = packages::resolve(&config.index_path(), name)?;
    let url = config.package_url(&filename);
    debug!(package = name, url = %url, "downloading package");

    let body = match transport.get(&url, None)? {
        RemoteResponse::Payload { body, .. } => body,
        // Unconditional fetches have no precondition to hold
        RemoteResponse::NotModified => {
            return Err(InstallError::Network { url, status: 304 }.into())
        }
    };

    let staging = tempfile::tempdir()?;
    let deb = staging.path().join("package.deb");
    fs::write(&deb, &body)?;
    extract::extract(&deb, &config.root)?;

    info!(package = name, "installed");
    Ok(())
}
