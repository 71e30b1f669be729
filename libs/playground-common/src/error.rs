use std::path::PathBuf;
use thiserror::Error;

/// Errors from editing or exporting the test list
#[derive(Debug, Error)]
pub enum FormError {
    #[error("test index {index} is out of range (list has {len} test(s))")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot remove the last remaining test case")]
    LastTestCase,

    #[error("test {index} is not a JSON object and has no fields to set")]
    NotAnObject { index: usize },

    #[error("failed to serialize test list: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reasons an import was discarded. The existing list is kept in every case.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("expected a JSON array of test cases, found {0}")]
    NotAnArray(&'static str),
}

/// A failed exchange with the evaluator. Status codes are not errors.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("response body is not JSON: {0}")]
    Decode(#[source] serde_json::Error),
}
