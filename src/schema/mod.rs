//! Catalog and order schema: choice enums, row types, product variants.

pub mod choices;
pub mod entities;
pub mod variant;

pub use choices::*;
pub use entities::*;
pub use variant::*;
