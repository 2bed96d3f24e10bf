pub mod error;
pub mod filter;
pub mod manager;
pub mod repository;

pub use error::StoreError;
pub use filter::{Filter, SortDir, SqlValue};
pub use manager::Db;
pub use repository::{CarModelRepo, ListingOrder, Repository, WriteRecord};
