use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::Url;
use tracing::{debug, info};

use crate::error::ReadmeError;
use crate::resolver::get_bytes;

const RAW_CONTENT_ROOT: &str = "https://raw.githubusercontent.com";

pub const DEFAULT_BRANCH: &str = "master";

/// File names tried in order when looking for a README
pub const README_VARIATIONS: [&str; 6] = [
    "README.md",
    "Readme.md",
    "README.txt",
    "Readme.txt",
    "README",
    "Readme",
];

/// A GitHub repository given as `owner/name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl FromStr for Repository {
    type Err = ReadmeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ReadmeError::MissingRepository);
        }

        match s.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Repository {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(ReadmeError::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl Repository {
    /// Root under which the repository's files are served raw. Ends in `/`
    /// so relative paths join beneath it.
    pub fn raw_base_url(&self, branch: &str) -> Result<Url> {
        let url = format!(
            "{}/{}/{}/{}/",
            RAW_CONTENT_ROOT, self.owner, self.name, branch
        );
        Url::parse(&url).with_context(|| format!("Invalid repository URL {}", url))
    }

    pub fn raw_file_url(&self, branch: &str, filename: &str) -> Result<Url> {
        let base = self.raw_base_url(branch)?;
        base.join(filename)
            .with_context(|| format!("Invalid file name {}", filename))
    }
}

/// Fetch the repository's README, trying each known file name.
pub fn fetch_readme(client: &Client, repository: &Repository, branch: &str) -> Result<String> {
    fetch_readme_from(client, repository, branch, &README_VARIATIONS)
}

/// Try `candidates` in order and return the first one that exists.
///
/// Missing files (404) only mean "try the next name". If every candidate is
/// missing the result is [`ReadmeError::ReadmeNotFound`]; any other failure
/// (network, server error) is reported as is.
pub fn fetch_readme_from(
    client: &Client,
    repository: &Repository,
    branch: &str,
    candidates: &[&str],
) -> Result<String> {
    let mut failure = None;

    for filename in candidates {
        let url = repository.raw_file_url(branch, filename)?;
        match get_bytes(client, &url) {
            Ok(bytes) => {
                info!(%url, "found README");
                return Ok(String::from_utf8_lossy(&bytes).into_owned());
            }
            Err(err) => {
                debug!(%url, "README candidate failed: {:#}", err);
                if !is_not_found(&err) {
                    failure = Some(err);
                }
            }
        }
    }

    Err(failure.unwrap_or_else(|| ReadmeError::ReadmeNotFound(repository.to_string()).into()))
}

fn is_not_found(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<ReadmeError>(),
        Some(ReadmeError::HttpStatus { status: 404, .. })
    )
}
