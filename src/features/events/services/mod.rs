pub mod status_classifier;

pub use status_classifier::classify;
