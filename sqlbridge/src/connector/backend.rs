use crate::{
    config::{ConnectionConfig, DriverKind},
    error::Error,
    native::{NativeError, NativeSession, NativeValue, SessionParams},
    value::Cell,
};

use super::{oracle::Oracle, sybase::Sybase};

static ORACLE: Oracle = Oracle;
static SYBASE: Sybase = Sybase;

/// The vendor-specific half of a connection: how to address the server,
/// what to run after login, and how to read native codes and values. Chosen
/// once when the connection is opened.
pub(crate) trait Backend: Send + Sync {
    fn kind(&self) -> DriverKind;

    fn session_params(&self, config: &ConnectionConfig) -> SessionParams;

    /// Session setup run right after login.
    fn after_connect(&self, _session: &mut dyn NativeSession) -> Result<(), NativeError> {
        Ok(())
    }

    /// Classify a failure to create or set up a session.
    fn connect_error(&self, config: &ConnectionConfig, err: NativeError) -> Error;

    /// Classify a failure of a statement, fetch, commit or rollback.
    fn statement_error(&self, err: NativeError) -> Error;

    fn convert_value(&self, value: NativeValue) -> Cell {
        convert_common(value)
    }
}

pub(crate) fn for_kind(kind: DriverKind) -> &'static dyn Backend {
    match kind {
        DriverKind::Oracle => &ORACLE,
        DriverKind::Sybase => &SYBASE,
    }
}

pub(crate) fn convert_common(value: NativeValue) -> Cell {
    match value {
        NativeValue::Null => Cell::Null,
        NativeValue::Integer(i) => Cell::Integer(i),
        NativeValue::Decimal(s) => match s.parse::<i64>() {
            Ok(i) => Cell::Integer(i),
            Err(_) => Cell::Text(s),
        },
        NativeValue::Char(s) => Cell::Text(s),
        NativeValue::Binary(bytes) => Cell::Text(hex::encode(bytes)),
        NativeValue::DateTime(dt) => Cell::Date(dt),
    }
}

/// The text between the first pair of parentheses, without quotes.
pub(crate) fn parenthesized(message: &str) -> Option<String> {
    let start = message.find('(')?;
    let end = message[start..].find(')')? + start;
    let inner = message[start + 1..end].replace('"', "");

    (!inner.is_empty()).then_some(inner)
}

/// The last single-quoted name in a message.
pub(crate) fn last_quoted(message: &str) -> Option<String> {
    let mut parts = message.rsplit('\'');
    parts.next()?;
    let name = parts.next()?;

    (!name.is_empty()).then(|| name.to_string())
}
