//! Core data models for the pocket-yacsa backend.
//!
//! Entity structs map to SQLite tables via `sqlx::FromRow`; the `*Res`
//! types are the camelCase JSON projections served to clients. Paging
//! DTOs carry 1-based page numbers.

pub mod detection_log;
pub mod favorite;
pub mod medicine;
pub mod member;
pub mod search_log;
pub mod session;
