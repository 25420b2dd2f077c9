use std::{collections::HashMap, fmt, sync::Arc};

use super::{backend, metrics, ConnectionHandle};
use crate::{
    config::{ConnectionConfig, DriverKind},
    error::{Error, ErrorKind},
    native::NativeLibrary,
};

/// Opens connections, dispatching on the configured driver kind to the
/// native library registered for it.
///
/// The factory is shared freely between threads. The handles it opens are
/// not: every worker opens its own.
#[derive(Clone, Default)]
pub struct ConnectionFactory {
    libraries: HashMap<DriverKind, Arc<dyn NativeLibrary>>,
}

impl ConnectionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the native library serving `kind`, replacing any previous one.
    pub fn with_library(mut self, kind: DriverKind, library: Arc<dyn NativeLibrary>) -> Self {
        self.libraries.insert(kind, library);
        self
    }

    pub fn supports(&self, kind: DriverKind) -> bool {
        self.libraries.contains_key(&kind)
    }

    /// Validate the configuration, then create and set up a native session.
    ///
    /// No retries. If the setup after login fails, the fresh session is
    /// closed before the error is returned.
    pub fn open(&self, config: ConnectionConfig) -> crate::Result<ConnectionHandle> {
        config.validate()?;

        let kind = config.driver_kind();
        let library = self.libraries.get(&kind).ok_or_else(|| {
            let kind = ErrorKind::config_invalid(format!("no native library registered for {kind}"));
            Error::builder(kind).build()
        })?;

        let backend = backend::for_kind(kind);

        let span = tracing::info_span!(
            "open",
            driver = kind.as_str(),
            host = config.host(),
            user = config.username()
        );
        let _enter = span.enter();

        let params = backend.session_params(&config);
        let mut session = metrics::connect(kind, || library.create_session(&params))
            .map_err(|native| backend.connect_error(&config, native))?;

        if let Err(native) = backend.after_connect(&mut *session) {
            let err = backend.connect_error(&config, native);

            if let Err(close_err) = session.close() {
                tracing::warn!(
                    code = close_err.code,
                    native_message = close_err.message.as_str(),
                    "error closing a session after failed setup"
                );
            }

            return Err(err);
        }

        tracing::info!(server = params.target.as_str(), "connection opened");

        Ok(ConnectionHandle::new(config, session, backend))
    }
}

impl fmt::Debug for ConnectionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionFactory")
            .field("drivers", &self.libraries.keys().collect::<Vec<_>>())
            .finish()
    }
}
