//! services/portal/src/lib.rs
//!
//! The attendance and grades portal: an axum service wiring the core Auth
//! Service and reporting queries to a SQLite store.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
