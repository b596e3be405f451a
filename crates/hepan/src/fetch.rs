//! Paginated fetching.
//!
//! Every list-returning operation of the JSON API goes through
//! [`fetch_all`]: fetch page 1, append, and continue while the adapter
//! reports another page and the caller's [`PageLimit`] allows it.
//!
//! Pages are fetched strictly one after another; whether page `n + 1`
//! exists is only known once page `n` has arrived. Nothing is deduplicated:
//! if the thread changes between two page fetches (a reply is deleted, say)
//! the aggregate may skip or repeat records.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::Result;

/// One page of records plus the adapter's "more pages" signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Records in upstream order.
    pub items: Vec<T>,
    /// Whether another page follows this one.
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, has_next: bool) -> Self {
        Self { items, has_next }
    }

    /// A page with no successor.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, false)
    }
}

/// Upper bound on the number of pages [`fetch_all`] requests.
///
/// `PageLimit(0)` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageLimit(pub u32);

impl PageLimit {
    pub const UNLIMITED: PageLimit = PageLimit(0);

    /// Whether `fetched` pages exhaust this limit.
    pub fn reached(self, fetched: u32) -> bool {
        self.0 > 0 && fetched >= self.0
    }
}

impl From<u32> for PageLimit {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A resource that can be fetched one page at a time.
///
/// Pages are numbered from 1.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;

    /// Fetch a single page.
    async fn fetch_page(&self, page: u32) -> Result<Page<Self::Item>>;
}

/// Fetch pages starting at 1 until the source reports no further pages or
/// `limit` pages have been fetched, and return all records in page order.
///
/// The first error aborts the loop; records gathered so far are discarded.
#[instrument(skip(source))]
pub async fn fetch_all<S>(source: &S, limit: PageLimit) -> Result<Vec<S::Item>>
where
    S: PageSource + ?Sized,
{
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        let result = source.fetch_page(page).await?;
        debug!(page, count = result.items.len(), has_next = result.has_next, "Fetched page");
        items.extend(result.items);

        if !result.has_next || limit.reached(page) {
            break;
        }
        page += 1;
    }

    Ok(items)
}
