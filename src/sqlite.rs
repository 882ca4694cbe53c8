use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{Connection, Row, ToSql};

use crate::error::{Result, StorageContext};

/// Core value types bound into route queries
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Borrowed(ValueRef::Real(*r)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

/// Reads column `idx` as display text; NULL becomes `None`.
pub fn cell_text(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(r) => Some(r.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    })
}

/// Tables the route queries expect. Existing tables are left alone.
pub const SCHEMA: &str = r#"
    PRAGMA foreign_keys = ON;
    CREATE TABLE IF NOT EXISTS destinations (
        id INTEGER PRIMARY KEY,
        name TEXT UNIQUE NOT NULL
    );
    CREATE TABLE IF NOT EXISTS transport_types (
        id INTEGER PRIMARY KEY,
        name TEXT UNIQUE NOT NULL
    );
    CREATE TABLE IF NOT EXISTS routes (
        id INTEGER PRIMARY KEY,
        flight TEXT,
        transport_type_id INTEGER NOT NULL REFERENCES transport_types(id),
        source_id INTEGER NOT NULL REFERENCES destinations(id),
        destination_id INTEGER NOT NULL REFERENCES destinations(id),
        distance REAL,
        departure_time TEXT NOT NULL,
        arrival_time TEXT NOT NULL,
        seats_available INTEGER NOT NULL,
        ticket_price REAL NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_routes_departure ON routes(departure_time);
"#;

/// SQLite configuration for the route database
#[derive(Debug, Clone, PartialEq)]
pub struct SqliteConfig {
    /// Path to the SQLite database file
    pub db_path: PathBuf,
}

impl SqliteConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Opens (creating if needed) the database file and bootstraps the schema.
    pub fn open(&self) -> Result<Connection> {
        ensure_parent_dir(&self.db_path)?;
        log::info!("opening route database at {}", self.db_path.display());
        let conn = Connection::open(&self.db_path).storage("cannot open database")?;
        initialize_schema(&conn)?;
        Ok(conn)
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            log::debug!("creating database directory {}", dir.display());
            fs::create_dir_all(dir)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    log::debug!("initializing route schema");
    conn.execute_batch(SCHEMA)
        .storage("failed to initialize schema")
}

/// In-memory database with the route schema, for tests.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().storage("cannot open database")?;
    initialize_schema(&conn)?;
    Ok(conn)
}
