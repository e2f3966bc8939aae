pub mod activation_dto;

pub use activation_dto::*;
