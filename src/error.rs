use std::fmt;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Page indices start at 1, got {0}")]
    InvalidPageIndex(usize),

    #[error("Invalid base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Fetch failed for page {page}: {source}")]
    Fetch {
        page: usize,
        #[source]
        source: reqwest::Error,
    },

    #[error("Parse failed for page {page}: {reason}")]
    Parse { page: usize, reason: String },

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Task for page {page} did not complete: {reason}")]
    Task { page: usize, reason: String },

    #[error("{} page(s) failed: {}", .0.len(), FailureList(.0))]
    PagesFailed(Vec<PageFailure>),
}

/// A page whose unit of work did not produce records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub page: usize,
    pub reason: String,
}

impl fmt::Display for PageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} ({})", self.page, self.reason)
    }
}

struct FailureList<'a>(&'a [PageFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}
