pub mod event_status_dto;

pub use event_status_dto::*;
