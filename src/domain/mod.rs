pub mod analysis;
pub mod listing;
pub mod session;
