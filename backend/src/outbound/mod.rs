//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **security**: Argon2id password hashing and HS256 bearer tokens
//! - **swapi**: HTTP client for the public Star Wars films feed
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business logic.

pub mod persistence;
pub mod security;
pub mod swapi;
