//! Database module: row models, schema and the SQLite-backed store.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows plus insert/patch payloads
//! - `schema.rs`: SQL DDL executed at startup
//! - `sqlite.rs`: pool setup and schema init
//! - `identity.rs`, `schools.rs`, `buses.rs`, `students.rs`, `drivers.rs`:
//!   per-table queries on `TrackStorage`

pub mod buses;
pub mod drivers;
pub mod identity;
pub mod models;
pub mod schema;
pub mod schools;
pub mod sqlite;
pub mod students;

pub use models::{Bus, Driver, Identity, Leg, Parent, School, Student};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, TrackStorage};
