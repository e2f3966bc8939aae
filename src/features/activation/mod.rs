pub mod clients;
pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod payload;
pub mod routes;
pub mod services;

pub use clients::BookingApiClient;
pub use errors::ActivationError;
pub use services::{ActivationService, ScanViewCache};
