mod error;

use crate::{
    config::{ConnectionConfig, DriverKind, Hidden},
    error::Error,
    native::{NativeError, NativeSession, NativeValue, SessionParams},
    value::Cell,
};

use super::backend::{convert_common, Backend};

/// Backend for DB-Library. Sessions start in unchained mode where every
/// statement commits on its own, so chained mode is switched on at login to
/// make commit and rollback do what they say.
pub(crate) struct Sybase;

const CHAINED_MODE: &str = "set chained on";

impl Backend for Sybase {
    fn kind(&self) -> DriverKind {
        DriverKind::Sybase
    }

    fn session_params(&self, config: &ConnectionConfig) -> SessionParams {
        SessionParams {
            target: config.service().to_string(),
            host: config.host().to_string(),
            port: config.port(),
            username: config.username().to_string(),
            password: Hidden(config.password().to_string()),
        }
    }

    fn after_connect(&self, session: &mut dyn NativeSession) -> Result<(), NativeError> {
        session.send_statement(CHAINED_MODE)?;
        Ok(())
    }

    fn connect_error(&self, config: &ConnectionConfig, err: NativeError) -> Error {
        error::connect_error(config, err)
    }

    fn statement_error(&self, err: NativeError) -> Error {
        error::statement_error(err)
    }

    fn convert_value(&self, value: NativeValue) -> Cell {
        match value {
            // CHAR(n) columns come back blank-padded.
            NativeValue::Char(s) => Cell::Text(s.trim_end_matches(' ').to_string()),
            value => convert_common(value),
        }
    }
}
