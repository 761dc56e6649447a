// File: src/services/mod.rs

pub mod guards;
pub mod proxy_service;

pub use proxy_service::{ProxyMatch, ProxyService, resolve_proxy};
