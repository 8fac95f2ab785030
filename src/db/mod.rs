pub mod connection;
pub mod feedback;
pub mod listings;
pub mod statistics;

pub use connection::{init_db, Database};
pub use listings::ListingFilter;
