pub mod ticket;

pub use ticket::{ScanOutcome, ScanTransition, Ticket};
