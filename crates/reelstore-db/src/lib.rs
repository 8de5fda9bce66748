//! Video record repositories
//!
//! The ingest pipeline treats the record store as a key-value store keyed by
//! video id: it reads a record, mutates one URL field and writes the whole
//! record back. `PgVideoRepository` backs production deployments and
//! `InMemoryVideoRepository` backs local runs without a database and tests.

pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::InMemoryVideoRepository;
pub use postgres::PgVideoRepository;
pub use repository::{DbError, DbResult, VideoRepository};
