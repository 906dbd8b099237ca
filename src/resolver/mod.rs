pub mod fs;
pub mod http;

pub use fs::*;
pub use http::*;

use anyhow::Result;

/// Maps an image destination (URL or relative path) to its raw bytes.
///
/// Implementations decide how relative destinations are anchored and what
/// timeout policy applies; renderers treat every failure the same way.
#[cfg_attr(test, mockall::automock)]
pub trait Resolve {
    fn resolve(&self, destination: &str) -> Result<Vec<u8>>;
}

pub(crate) fn is_remote(destination: &str) -> bool {
    destination.starts_with("http://") || destination.starts_with("https://")
}
