//! Back-office registry, catalog writes and fixture seeding.

mod registry;
mod seed;
mod writer;

pub use registry::{admin_entry, AdminEntry, ADMIN_REGISTRY};
pub use seed::{seed_catalog, SeedReport};
pub use writer::{CatalogWriter, CreatedProduct};
