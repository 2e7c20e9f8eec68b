//! List response envelope.

use crate::pagination::{page_links, PageSlice};
use serde::Serialize;

/// List envelope: `{count, next, previous, results}`.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T: Serialize> Paginated<T> {
    /// `base` is the absolute URL of the listing without its query string.
    pub fn from_slice(slice: PageSlice<T>, base: &str, query: Option<&str>) -> Self {
        let (next, previous) = page_links(base, query, &slice.page);
        Paginated {
            count: slice.count,
            next,
            previous,
            results: slice.items,
        }
    }
}
