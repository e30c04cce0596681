//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod movie_catalog;
mod storage;
mod transport;

pub use movie_catalog::{CatalogError, MovieCatalog};
pub use storage::{ClientStorage, StorageError};
pub use transport::{HttpTransport, TransportError};
