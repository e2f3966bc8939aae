pub mod event_status;

pub use event_status::EventStatus;
