//! Record persistence through the field contract.

use crate::error::{StorageError, StorageResult};
use crate::sql::{self, quote};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use sealfield_model::{Field, ModelSchema, Record, Value};
use std::path::Path;
use tracing::{debug, info};

/// Persistent store for the records of one model, backed by SQLite.
pub struct RecordStore {
    conn: Connection,
    schema: ModelSchema,
    backend: sealfield_model::Connection,
    table: String,
    columns: Vec<String>,
}

impl RecordStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>, schema: ModelSchema) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn, schema)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory(schema: ModelSchema) -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, schema)
    }

    fn init(conn: Connection, schema: ModelSchema) -> StorageResult<Self> {
        let errors: Vec<String> = schema
            .check()
            .into_iter()
            .filter(|c| c.is_serious())
            .map(|c| c.to_string())
            .collect();
        if !errors.is_empty() {
            return Err(StorageError::InvalidSchema(errors.join("; ")));
        }
        if schema.fields().is_empty() {
            return Err(StorageError::InvalidSchema(format!(
                "model '{}' declares no fields",
                schema.name()
            )));
        }

        let mut columns = Vec::with_capacity(schema.fields().len());
        let mut definitions = vec!["\"id\" INTEGER PRIMARY KEY AUTOINCREMENT".to_string()];
        for field in schema.fields() {
            let column = field.column().ok_or_else(|| {
                StorageError::InvalidSchema(format!("unbound field in model '{}'", schema.name()))
            })?;
            let mut definition = format!(
                "{} {}",
                quote(column),
                sql::sql_type(field.internal_type())
            );
            if !field.options().null {
                definition.push_str(" NOT NULL");
            }
            if field.options().unique {
                definition.push_str(" UNIQUE");
            }
            definitions.push(definition);
            columns.push(quote(column));
        }

        let table = quote(schema.name());
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (\n    {}\n);",
            definitions.join(",\n    ")
        ))?;
        info!(model = schema.name(), columns = columns.len(), "record store opened");

        Ok(Self {
            conn,
            schema,
            backend: sealfield_model::Connection::sqlite(),
            table,
            columns,
        })
    }

    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Cleans and stores a new record, returning its id.
    ///
    /// Any `id` already set on `record` is ignored.
    pub fn insert(&mut self, record: &Record) -> StorageResult<i64> {
        let row = self.prepare_row(record)?;
        let placeholders: Vec<String> = (1..=row.len()).map(|i| format!("?{i}")).collect();
        self.conn.execute(
            &format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table,
                self.columns.join(", "),
                placeholders.join(", ")
            ),
            params_from_iter(row),
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(model = self.schema.name(), id, "record inserted");
        Ok(id)
    }

    /// Replaces every column of an existing record.
    pub fn update(&mut self, id: i64, record: &Record) -> StorageResult<()> {
        let mut row = self.prepare_row(record)?;
        let assignments: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ?{}", i + 1))
            .collect();
        let id_param = row.len() + 1;
        row.push(SqlValue::Integer(id));

        let changed = self.conn.execute(
            &format!(
                "UPDATE {} SET {} WHERE \"id\" = ?{id_param}",
                self.table,
                assignments.join(", ")
            ),
            params_from_iter(row),
        )?;
        if changed == 0 {
            return Err(self.not_found(id));
        }
        debug!(model = self.schema.name(), id, "record updated");
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> StorageResult<()> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE \"id\" = ?1", self.table),
            params![id],
        )?;
        if changed == 0 {
            return Err(self.not_found(id));
        }
        debug!(model = self.schema.name(), id, "record deleted");
        Ok(())
    }

    /// Re-encodes every stored value of `field_name` under current key material.
    ///
    /// Runs in one transaction; returns the number of rows rewritten. Fields
    /// that store plaintext rewrite nothing.
    pub fn rotate_keys(&mut self, field_name: &str) -> StorageResult<usize> {
        let Self {
            conn,
            schema,
            table,
            ..
        } = self;
        let field = schema
            .field(field_name)
            .ok_or_else(|| StorageError::UnknownField(field_name.to_string()))?;
        let column = quote(field.column().unwrap_or(field_name));

        let tx = conn.transaction()?;
        let stored: Vec<(i64, SqlValue)> = {
            let mut stmt = tx.prepare(&format!(
                "SELECT \"id\", {column} FROM {table} WHERE {column} IS NOT NULL"
            ))?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let mut rotated = 0;
        for (id, raw) in stored {
            let before = sql::from_sql(raw);
            let after = field.rotate_stored(before.clone())?;
            if after != before {
                tx.execute(
                    &format!("UPDATE {table} SET {column} = ?1 WHERE \"id\" = ?2"),
                    params![sql::to_sql(after), id],
                )?;
                rotated += 1;
            }
        }
        tx.commit()?;

        info!(model = schema.name(), field = field_name, rotated, "rotated stored values");
        Ok(rotated)
    }

    // ── Reads ────────────────────────────────────────────────────

    pub fn get(&self, id: i64) -> StorageResult<Record> {
        let columns = self.columns.len();
        let raw = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE \"id\" = ?1",
                    self.columns.join(", "),
                    self.table
                ),
                params![id],
                |row| read_values(row, 0, columns),
            )
            .optional()?
            .ok_or_else(|| self.not_found(id))?;
        self.hydrate(id, raw)
    }

    /// Every record, ordered by id.
    pub fn all(&self) -> StorageResult<Vec<Record>> {
        let columns = self.columns.len();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT \"id\", {} FROM {} ORDER BY \"id\"",
            self.columns.join(", "),
            self.table
        ))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, read_values(row, 1, columns)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, raw)| self.hydrate(id, raw))
            .collect()
    }

    /// The stored value of one column, exactly as written to disk.
    pub fn raw_column(&self, id: i64, field_name: &str) -> StorageResult<Value> {
        let field = self
            .schema
            .field(field_name)
            .ok_or_else(|| StorageError::UnknownField(field_name.to_string()))?;
        let column = quote(field.column().unwrap_or(field_name));

        let raw: SqlValue = self
            .conn
            .query_row(
                &format!("SELECT {column} FROM {} WHERE \"id\" = ?1", self.table),
                params![id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| self.not_found(id))?;
        Ok(sql::from_sql(raw))
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn prepare_row(&self, record: &Record) -> StorageResult<Vec<SqlValue>> {
        let cleaned = self.schema.full_clean(record)?;
        self.schema
            .fields()
            .iter()
            .map(|field| {
                let value = field
                    .name()
                    .and_then(|name| cleaned.get(name))
                    .cloned()
                    .unwrap_or(Value::Null);
                let prepared = field.get_db_prep_value(value, &self.backend, false)?;
                Ok(sql::to_sql(prepared))
            })
            .collect()
    }

    fn hydrate(&self, id: i64, raw: Vec<SqlValue>) -> StorageResult<Record> {
        let mut record = Record::new();
        record.id = Some(id);
        for (field, raw) in self.schema.fields().iter().zip(raw) {
            let Some(name) = field.name() else { continue };
            let value = field.from_db_value(sql::from_sql(raw), &self.backend)?;
            record.set(name, field.to_python(value)?);
        }
        if let Some(hooks) = self.schema.hooks() {
            hooks.on_after_load(&mut record);
        }
        Ok(record)
    }

    fn not_found(&self, id: i64) -> StorageError {
        StorageError::NotFound(format!("{}#{id}", self.schema.name()))
    }
}

fn read_values(row: &Row<'_>, offset: usize, count: usize) -> rusqlite::Result<Vec<SqlValue>> {
    (offset..offset + count).map(|i| row.get(i)).collect()
}
