//! Static lodging catalog: record model and cached loader.

pub mod loader;
pub mod lodging;

pub use loader::CatalogLoader;
pub use lodging::{Catalog, Lodging};
