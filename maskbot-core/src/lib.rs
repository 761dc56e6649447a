// src/lib.rs

pub mod config;
pub mod db;
pub mod platforms;
pub mod repositories;
pub mod services;
pub mod test_utils;

pub use db::Database;
pub use maskbot_common::error::Error;
