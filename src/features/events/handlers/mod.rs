pub mod event_status_handler;

pub use event_status_handler::*;
