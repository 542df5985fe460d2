pub mod config;
pub mod error;
pub mod types;

pub use config::TaglessConfig;
pub use error::{TaglessError, TaglessResult};
