use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::resolver::{is_remote, HttpResolver, Resolve};

/// Resolves destinations against a local directory, for documents read from
/// disk. Remote URLs go to the optional HTTP resolver.
#[derive(Debug, Clone)]
pub struct FsResolver {
    base_dir: PathBuf,
    remote: Option<HttpResolver>,
}

impl FsResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            remote: None,
        }
    }

    pub fn with_remote(mut self, remote: HttpResolver) -> Self {
        self.remote = Some(remote);
        self
    }
}

impl Resolve for FsResolver {
    fn resolve(&self, destination: &str) -> Result<Vec<u8>> {
        if is_remote(destination) {
            return match &self.remote {
                Some(remote) => remote.resolve(destination),
                None => bail!("Remote destination '{}' cannot be read from disk", destination),
            };
        }

        let path = self.base_dir.join(destination.trim_start_matches('/'));
        debug!(path = %path.display(), "reading local file");
        fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
    }
}
