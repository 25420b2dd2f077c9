//! The capability interface a vendor client library has to provide.
//!
//! Everything below this module is an external collaborator: the Oracle
//! call interface, DB-Library, or the in-memory stand-in from
//! [`memory`](crate::memory). The layer above never sees a vendor type, only
//! these traits, [`NativeValue`]s and numeric [`NativeError`] codes that the
//! backend classifies.

use chrono::NaiveDateTime;
use std::fmt;

/// What a backend hands to the native library to create a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    /// Oracle connect descriptor (`//host:port/service`) or the Sybase
    /// server name.
    pub target: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: crate::config::Hidden<String>,
}

impl SessionParams {
    pub fn password(&self) -> &str {
        &self.password.0
    }
}

/// A failure reported by the native library: its numeric code and message
/// text, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    pub code: i32,
    pub message: String,
}

impl NativeError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for NativeError {}

/// A column value as the native library returns it, before conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeValue {
    Null,
    Integer(i64),
    /// Exact numeric in its textual form, e.g. Oracle `NUMBER`.
    Decimal(String),
    Char(String),
    Binary(Vec<u8>),
    DateTime(NaiveDateTime),
}

/// What sending a statement produced, as reported by the driver.
pub enum NativeOutcome<'a> {
    /// The statement did not open a cursor.
    RowsAffected(u64),
    /// The statement opened a cursor, which borrows the session.
    Cursor(Box<dyn NativeCursor + 'a>),
}

impl fmt::Debug for NativeOutcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeOutcome::RowsAffected(count) => f.debug_tuple("RowsAffected").field(count).finish(),
            NativeOutcome::Cursor(cursor) => f.debug_tuple("Cursor").field(&cursor.columns()).finish(),
        }
    }
}

/// Entry point of a vendor library.
pub trait NativeLibrary: Send + Sync {
    /// Authenticate and create a new session.
    fn create_session(&self, params: &SessionParams) -> Result<Box<dyn NativeSession>, NativeError>;
}

/// One authenticated session with the database server.
pub trait NativeSession: Send {
    fn send_statement(&mut self, sql: &str) -> Result<NativeOutcome<'_>, NativeError>;

    fn commit(&mut self) -> Result<(), NativeError>;

    fn rollback(&mut self) -> Result<(), NativeError>;

    /// Release the session. Consumes it, so it can be freed only once.
    fn close(self: Box<Self>) -> Result<(), NativeError>;
}

/// A forward-only server-side cursor.
pub trait NativeCursor {
    fn columns(&self) -> Vec<String>;

    /// The next row, or `None` at the end of the current result set.
    fn fetch_row(&mut self) -> Result<Option<Vec<NativeValue>>, NativeError>;

    /// Move to the next result set of a procedure call, skipping unread
    /// rows. False once there are no more.
    fn next_result(&mut self) -> Result<bool, NativeError> {
        Ok(false)
    }
}
