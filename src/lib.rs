//! Review scraper: fetches paginated review listings, extracts one row per
//! review and writes the merged, sparse table to a CSV file.

mod config;
mod error;
mod export;
mod macros;
mod parse;
pub mod process;
mod record;
mod request;

pub use config::ScrapeConfig;
pub use error::{Error, PageFailure, Result};
pub use export::{write_csv_file, write_records};
pub use parse::extract_reviews;
pub use record::{FieldValue, ReviewRecord};

const BASE_URL: &str = "https://www.airlinequality.com/airline-reviews/british-airways";
const PAGE_SIZE: usize = 100;
const SORT_ORDER: &str = "post_date:Desc";
const PAGE_COUNT: usize = 38;
const FILE_PATH: &str = "british_airways_reviews.csv";
/// Upper bound on pages being fetched and parsed at the same time.
const WORKER_LIMIT: usize = 8;
