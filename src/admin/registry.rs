//! Back-office registrations: which row types the administrative interface may edit.

use crate::schema::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdminEntry {
    pub entity: &'static str,
    pub table: &'static str,
}

const fn entry(entity: &'static str, table: &'static str) -> AdminEntry {
    AdminEntry { entity, table }
}

pub const ADMIN_REGISTRY: &[AdminEntry] = &[
    entry("Product", Product::TABLE),
    entry("Wine", Wine::TABLE),
    entry("Mood", Mood::TABLE),
    entry("Glass", Glass::TABLE),
    entry("Corkscrew", Corkscrew::TABLE),
    entry("Country", Country::TABLE),
    entry("Producer", Producer::TABLE),
    entry("Order", Order::TABLE),
];

/// Case-insensitive lookup by entity name.
pub fn admin_entry(entity: &str) -> Option<&'static AdminEntry> {
    ADMIN_REGISTRY
        .iter()
        .find(|e| e.entity.eq_ignore_ascii_case(entity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        assert_eq!(admin_entry("wine").map(|e| e.table), Some("wines"));
        assert_eq!(admin_entry("Order").map(|e| e.table), Some("orders"));
        assert!(admin_entry("OrderItem").is_none());
    }
}
