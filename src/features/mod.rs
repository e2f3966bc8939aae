pub mod activation;
pub mod events;
