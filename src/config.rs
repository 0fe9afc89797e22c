use std::path::PathBuf;

use reqwest::Url;

use crate::{Error, Result, BASE_URL, FILE_PATH, PAGE_COUNT, PAGE_SIZE, SORT_ORDER, WORKER_LIMIT};

/// Everything a run needs to know. `Default` reproduces the crate constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub page_size: usize,
    pub sort_order: String,
    pub page_count: usize,
    pub workers: usize,
    pub output_path: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.into(),
            page_size: PAGE_SIZE,
            sort_order: SORT_ORDER.into(),
            page_count: PAGE_COUNT,
            workers: WORKER_LIMIT,
            output_path: PathBuf::from(FILE_PATH),
        }
    }
}

impl ScrapeConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_sort_order(mut self, sort_order: impl Into<String>) -> Self {
        self.sort_order = sort_order.into();
        self
    }

    pub fn with_page_count(mut self, page_count: usize) -> Self {
        self.page_count = page_count;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    /// Worker pool capacity, never less than one.
    pub(crate) fn worker_limit(&self) -> usize {
        self.workers.max(1)
    }

    /// Listing URL for a 1-based page index.
    pub fn page_url(&self, page: usize) -> Result<Url> {
        if page == 0 {
            return Err(Error::InvalidPageIndex(page));
        }
        let raw = format!("{}/page/{page}/", self.base_url.trim_end_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| Error::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("sortby", &self.sort_order)
            .append_pair("pagesize", &self.page_size.to_string());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_url_matches_listing_format() {
        let url = ScrapeConfig::default().page_url(3).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.airlinequality.com/airline-reviews/british-airways/page/3/?sortby=post_date%3ADesc&pagesize=100"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let config = ScrapeConfig::default().with_base_url("http://127.0.0.1:3000/");
        assert_eq!(
            config.page_url(1).unwrap().as_str(),
            "http://127.0.0.1:3000/page/1/?sortby=post_date%3ADesc&pagesize=100"
        );
    }

    #[test]
    fn query_values_survive_reserved_characters() {
        let config = ScrapeConfig::default()
            .with_base_url("http://127.0.0.1:3000")
            .with_sort_order("rating#desc+x=y")
            .with_page_size(25);
        let url = config.page_url(1).unwrap();

        assert_eq!(url.path(), "/page/1/");
        assert_eq!(url.fragment(), None);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            [
                ("sortby".to_string(), "rating#desc+x=y".to_string()),
                ("pagesize".to_string(), "25".to_string()),
            ]
        );
    }

    #[test]
    fn unparseable_base_url_is_an_error() {
        let err = ScrapeConfig::default()
            .with_base_url("not a url")
            .page_url(1)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { .. }));
    }

    #[test]
    fn page_zero_is_rejected() {
        let err = ScrapeConfig::default().page_url(0).unwrap_err();
        assert!(matches!(err, Error::InvalidPageIndex(0)));
    }

    #[test]
    fn zero_workers_still_runs_one() {
        assert_eq!(ScrapeConfig::default().with_workers(0).worker_limit(), 1);
    }
}
