//! SQLite storage layer for sealfield.
//!
//! A [`RecordStore`] persists the records of one [`ModelSchema`](sealfield_model::ModelSchema)
//! in one table.
//!
//! # Layout
//!
//! - `id INTEGER PRIMARY KEY AUTOINCREMENT`
//! - one column per field, typed from the field's internal type
//! - encrypted fields are a single `BLOB` column holding the token, or SQL `NULL`
//!
//! Every write goes through `full_clean` and `get_db_prep_value`; every read
//! goes through `from_db_value`. The store never sees plaintext for
//! encrypted fields.

mod error;
mod record_store;
mod sql;

pub use error::{StorageError, StorageResult};
pub use record_store::RecordStore;
pub use sql::sql_type;
