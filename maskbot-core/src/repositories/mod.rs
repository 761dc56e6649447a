// src/repositories/mod.rs

pub mod postgres;

pub use maskbot_common::traits::repository_traits::{MemberRepository, SystemRepository};
pub use postgres::{PostgresMemberRepository, PostgresSystemRepository};
