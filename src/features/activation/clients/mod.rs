pub mod booking_client;

pub use booking_client::{BookingApiClient, TicketGateway};
