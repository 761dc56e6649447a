// File: maskbot-common/src/limits.rs

/// Length limits for user-supplied strings, enforced by the repositories
/// before anything reaches the database.
pub const SYSTEM_NAME_LIMIT: usize = 100;
pub const MEMBER_NAME_LIMIT: usize = 100;
pub const DESCRIPTION_LIMIT: usize = 1000;
