pub mod activation_service;
pub mod scan_cache;

pub use activation_service::ActivationService;
pub use scan_cache::{CachedTicketView, ScanViewCache};
