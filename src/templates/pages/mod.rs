pub mod admin;
pub mod feedback;
pub mod listings;
pub mod login;

pub use admin::{admin_page, AdminVm, ListingFormVm};
pub use feedback::{feedback_page, FeedbackFormVm};
pub use listings::{listings_page, ListingCardVm, ListingsVm};
pub use login::login_page;
