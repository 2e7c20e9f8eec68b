//! `search` and `ordering` query parameters.

use crate::sql::OrderTerm;

pub const SEARCH_PARAM: &str = "search";
pub const ORDERING_PARAM: &str = "ordering";

/// Search terms split on whitespace and commas; empty terms dropped.
pub fn search_terms(raw: &str) -> Vec<String> {
    raw.replace('\0', "")
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comma-separated fields, each optionally prefixed with `-` for descending. Fields
/// outside `allowed` are ignored.
pub fn ordering_terms(raw: &str, allowed: &[&'static str]) -> Vec<OrderTerm> {
    raw.split(',')
        .map(str::trim)
        .filter_map(|field| {
            let (descending, name) = match field.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, field),
            };
            allowed
                .iter()
                .find(|a| **a == name)
                .map(|column| OrderTerm { column: *column, descending })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINE_ORDERING: &[&str] = &["vintage_year", "alcohol"];

    #[test]
    fn terms_split_on_whitespace_and_commas() {
        assert_eq!(search_terms("  pinot, noir\tgrand "), vec!["pinot", "noir", "grand"]);
        assert!(search_terms(" , ").is_empty());
    }

    #[test]
    fn ordering_keeps_allowed_fields_in_order() {
        assert_eq!(
            ordering_terms("-alcohol, vintage_year", WINE_ORDERING),
            vec![OrderTerm::desc("alcohol"), OrderTerm::asc("vintage_year")]
        );
        assert_eq!(ordering_terms("price,-name", WINE_ORDERING), vec![]);
        assert_eq!(ordering_terms("vintage_year", WINE_ORDERING), vec![OrderTerm::asc("vintage_year")]);
    }
}
