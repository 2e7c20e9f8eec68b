//! HTTP handlers for the catalog and orders.

pub mod catalog;
pub mod orders;
