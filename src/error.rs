use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadmeError {
    #[error("missing repository argument")]
    MissingRepository,

    #[error("invalid repository format '{0}', expected owner/repository")]
    InvalidRepository(String),

    #[error("request to {url} failed with status {status}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("cannot resolve relative destination '{0}' without a base location")]
    NoBaseLocation(String),

    #[error("no README found in {0}")]
    ReadmeNotFound(String),
}
