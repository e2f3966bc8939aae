pub mod activation_handler;

pub use activation_handler::*;
