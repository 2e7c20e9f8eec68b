//! Catalog reads, order writes and the generic row helpers they share.

pub mod catalog;
mod crud;
pub mod filters;
mod orders;
mod validation;

pub use catalog::CatalogResource;
pub use crud::{related, CrudService};
pub use orders::OrderService;
pub use validation::{ItemInput, OrderValidator, DEFAULT_QUANTITY};
