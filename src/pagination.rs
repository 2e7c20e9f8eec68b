//! Page-number pagination: `?page=N&page_size=M`, default 10 per page, capped at 100.

use crate::error::AppError;
use std::collections::HashMap;

pub const PAGE_PARAM: &str = "page";
pub const PAGE_SIZE_PARAM: &str = "page_size";
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageNumber {
    Number(u64),
    Last,
}

/// Page requested by the caller, before the row count is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub number: PageNumber,
    pub size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            number: PageNumber::Number(1),
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// A missing, non-numeric or non-positive page size falls back to the default;
    /// larger sizes are capped. A page that is not a positive integer (or `last`) is
    /// rejected as not found.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let size = params
            .get(PAGE_SIZE_PARAM)
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|n| *n > 0)
            .map(|n| n.min(MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let number = match params.get(PAGE_PARAM).map(|s| s.trim()) {
            None | Some("") => PageNumber::Number(1),
            Some("last") => PageNumber::Last,
            Some(s) => match s.parse::<u64>() {
                Ok(n) if n >= 1 => PageNumber::Number(n),
                _ => return Err(AppError::invalid_page()),
            },
        };
        Ok(PageRequest { number, size })
    }

    /// Resolve against the total row count. Page 1 of an empty listing is valid.
    pub fn resolve(&self, count: u64) -> Result<ResolvedPage, AppError> {
        let num_pages = count.div_ceil(self.size).max(1);
        let number = match self.number {
            PageNumber::Number(n) => n,
            PageNumber::Last => num_pages,
        };
        if number > num_pages {
            return Err(AppError::invalid_page());
        }
        Ok(ResolvedPage {
            number,
            size: self.size,
            num_pages,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedPage {
    pub number: u64,
    pub size: u64,
    pub num_pages: u64,
}

impl ResolvedPage {
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.size
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// A resolved page of results together with the total count.
#[derive(Debug)]
pub struct PageSlice<T> {
    pub count: u64,
    pub page: ResolvedPage,
    pub items: Vec<T>,
}

impl<T> PageSlice<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageSlice<U> {
        PageSlice {
            count: self.count,
            page: self.page,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

fn split_query(query: Option<&str>) -> Vec<(String, String)> {
    query
        .unwrap_or("")
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|p| match p.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (p.to_string(), String::new()),
        })
        .collect()
}

fn join_url(base: &str, mut pairs: Vec<(String, String)>) -> String {
    if pairs.is_empty() {
        return base.to_string();
    }
    pairs.sort();
    let query = pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", base, query)
}

/// `base` with `key` set to `value`, other params kept (sorted by key).
pub fn replace_query_param(base: &str, query: Option<&str>, key: &str, value: &str) -> String {
    let mut pairs: Vec<_> = split_query(query).into_iter().filter(|(k, _)| k != key).collect();
    pairs.push((key.to_string(), value.to_string()));
    join_url(base, pairs)
}

/// `base` with `key` removed, other params kept (sorted by key).
pub fn remove_query_param(base: &str, query: Option<&str>, key: &str) -> String {
    let pairs: Vec<_> = split_query(query).into_iter().filter(|(k, _)| k != key).collect();
    join_url(base, pairs)
}

/// Next and previous links for a page. `base` is the absolute URL without query.
pub fn page_links(base: &str, query: Option<&str>, page: &ResolvedPage) -> (Option<String>, Option<String>) {
    let next = page
        .has_next()
        .then(|| replace_query_param(base, query, PAGE_PARAM, &(page.number + 1).to_string()));
    let previous = page.has_previous().then(|| {
        if page.number == 2 {
            remove_query_param(base, query, PAGE_PARAM)
        } else {
            replace_query_param(base, query, PAGE_PARAM, &(page.number - 1).to_string())
        }
    });
    (next, previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn page_size_defaults_and_caps() {
        assert_eq!(PageRequest::from_query(&query(&[])).unwrap().size, 10);
        assert_eq!(PageRequest::from_query(&query(&[("page_size", "25")])).unwrap().size, 25);
        assert_eq!(PageRequest::from_query(&query(&[("page_size", "1000")])).unwrap().size, 100);
        assert_eq!(PageRequest::from_query(&query(&[("page_size", "0")])).unwrap().size, 10);
        assert_eq!(PageRequest::from_query(&query(&[("page_size", "-3")])).unwrap().size, 10);
        assert_eq!(PageRequest::from_query(&query(&[("page_size", "ten")])).unwrap().size, 10);
    }

    #[test]
    fn bad_page_numbers_are_not_found() {
        for bad in ["0", "abc", "-1", "1.5"] {
            let err = PageRequest::from_query(&query(&[("page", bad)])).unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "page={}", bad);
        }
    }

    #[test]
    fn resolve_bounds() {
        let req = PageRequest { number: PageNumber::Number(3), size: 10 };
        let page = req.resolve(25).unwrap();
        assert_eq!(page.num_pages, 3);
        assert_eq!(page.offset(), 20);
        assert!(!page.has_next());
        assert!(req.resolve(20).is_err());

        let empty = PageRequest::default().resolve(0).unwrap();
        assert_eq!(empty.num_pages, 1);
        assert!(!empty.has_next() && !empty.has_previous());

        let last = PageRequest { number: PageNumber::Last, size: 10 }.resolve(101).unwrap();
        assert_eq!(last.number, 11);
    }

    #[test]
    fn links_keep_other_params() {
        let base = "http://shop.test/shop/wine/";
        let page = PageRequest { number: PageNumber::Number(2), size: 10 }.resolve(35).unwrap();
        let (next, previous) = page_links(base, Some("page=2&ordering=-alcohol"), &page);
        assert_eq!(next.unwrap(), "http://shop.test/shop/wine/?ordering=-alcohol&page=3");
        assert_eq!(previous.unwrap(), "http://shop.test/shop/wine/?ordering=-alcohol");

        let first = PageRequest::default().resolve(35).unwrap();
        let (next, previous) = page_links(base, None, &first);
        assert_eq!(next.unwrap(), "http://shop.test/shop/wine/?page=2");
        assert!(previous.is_none());

        let third = PageRequest { number: PageNumber::Number(3), size: 10 }.resolve(35).unwrap();
        let (_, previous) = page_links(base, Some("page=3"), &third);
        assert_eq!(previous.unwrap(), "http://shop.test/shop/wine/?page=2");
    }
}
