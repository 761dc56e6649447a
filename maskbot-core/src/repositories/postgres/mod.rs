// src/repositories/postgres/mod.rs

pub mod members;
pub mod systems;

pub use members::PostgresMemberRepository;
pub use systems::PostgresSystemRepository;
