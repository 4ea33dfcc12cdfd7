//! Relational store surface: entity kinds, conflict policies, and the
//! chunked upsert writer. The connection pool, schema and SQL dialect are
//! owned by the caller; this module only issues batched writes.

pub mod client;
pub mod conflict;
pub mod models;

pub use client::Database;
pub use conflict::Conflict;

use sqlx::query_builder::Separated;
use sqlx::Sqlite;

/// A row kind the writer knows how to upsert.
///
/// The conflict policy is a compile-time constant per kind, consulted once
/// per batch rather than per row.
pub trait Entity: Send + Sync {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    const CONFLICT: Conflict;

    /// Bind this row's values in `COLUMNS` order.
    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>);
}
