//! Booking API ingestion.
//!
//! The booking API serves pages of raw bookings as `{results, total}`.
//! [`fetch_all_bookings`] walks every page of a [`BookingPageSource`];
//! [`HttpBookingSource`] is the network implementation.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

use super::cleaning::RawBooking;

/// Default booking API endpoint.
pub const DEFAULT_BOOKING_API_URL: &str = "http://localhost:5000/api/bookings";

/// Default number of records requested per page.
pub const DEFAULT_PER_PAGE: u32 = 50;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// One page of the booking API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingPage {
    /// Records on this page.
    pub results: Vec<RawBooking>,
    /// Total records across all pages. Required on the first page.
    #[serde(default)]
    pub total: Option<u64>,
}

/// A source of booking pages, numbered from 1.
#[async_trait]
pub trait BookingPageSource: Send + Sync {
    /// Fetches one page.
    async fn fetch_page(&self, page: u32, per_page: u32) -> EngineResult<BookingPage>;
}

/// Number of pages needed to hold `total` records.
pub fn page_count(total: u64, per_page: u32) -> u64 {
    total.div_ceil(u64::from(per_page.max(1)))
}

/// Fetches every page from `source` and concatenates the records in page order.
///
/// # Errors
///
/// Returns [`EngineError::BookingSourceError`] if `per_page` is zero, the
/// first page carries no `total`, or any page fetch fails.
pub async fn fetch_all_bookings<S>(source: &S, per_page: u32) -> EngineResult<Vec<RawBooking>>
where
    S: BookingPageSource + ?Sized,
{
    if per_page == 0 {
        return Err(EngineError::BookingSourceError {
            message: "per_page must be at least 1".to_string(),
        });
    }

    let first = source.fetch_page(1, per_page).await?;
    let total = first.total.ok_or_else(|| EngineError::BookingSourceError {
        message: "'total' missing from the first booking page".to_string(),
    })?;
    let pages = page_count(total, per_page);
    info!(total, pages, "Fetched first booking page");

    let mut records = first.results;
    for page in 2..=pages {
        let page = u32::try_from(page).map_err(|_| EngineError::BookingSourceError {
            message: format!("Page number {} out of range", page),
        })?;
        let next = source.fetch_page(page, per_page).await?;
        debug!(page, records = next.results.len(), "Fetched booking page");
        records.extend(next.results);
    }

    info!(records = records.len(), "Fetched all booking pages");
    Ok(records)
}

/// Fetches booking pages over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBookingSource {
    client: reqwest::Client,
    url: String,
}

impl HttpBookingSource {
    /// Creates a source for the given endpoint.
    pub fn new(url: impl Into<String>) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| EngineError::BookingSourceError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The endpoint this source reads from.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl BookingPageSource for HttpBookingSource {
    async fn fetch_page(&self, page: u32, per_page: u32) -> EngineResult<BookingPage> {
        let source_error = |e: reqwest::Error| EngineError::BookingSourceError {
            message: format!("Page {} from {}: {}", page, self.url, e),
        };

        let response = self
            .client
            .get(&self.url)
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .await
            .map_err(source_error)?
            .error_for_status()
            .map_err(source_error)?;

        response.json::<BookingPage>().await.map_err(source_error)
    }
}

/// The two shapes accepted in a bookings file.
#[derive(Deserialize)]
#[serde(untagged)]
enum BookingsFile {
    Records(Vec<RawBooking>),
    Page(BookingPage),
}

/// Parses bookings from JSON text holding either an array of records or a
/// single page object.
pub fn parse_bookings_json(content: &str) -> Result<Vec<RawBooking>, serde_json::Error> {
    Ok(match serde_json::from_str::<BookingsFile>(content)? {
        BookingsFile::Records(records) => records,
        BookingsFile::Page(page) => page.results,
    })
}

/// Reads bookings from a local JSON file.
///
/// # Errors
///
/// Returns [`EngineError::BookingSourceError`] if the file cannot be read or
/// holds neither an array of bookings nor a page object.
pub fn read_bookings_file(path: &Path) -> EngineResult<Vec<RawBooking>> {
    let content = std::fs::read_to_string(path).map_err(|e| EngineError::BookingSourceError {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;
    let records = parse_bookings_json(&content).map_err(|e| EngineError::BookingSourceError {
        message: format!("Failed to parse {}: {}", path.display(), e),
    })?;
    info!(path = %path.display(), records = records.len(), "Read bookings file");
    Ok(records)
}
