pub mod feedback;
pub mod filter;
pub mod listing;
pub mod pagination;
pub mod phone;
pub mod search;
pub mod statistics;
