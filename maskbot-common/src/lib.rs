// File: maskbot-common/src/lib.rs

pub mod error;
pub mod limits;
pub mod models;
pub mod traits;

pub use error::Error;
