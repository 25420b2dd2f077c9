use std::fmt;

use super::{
    backend::Backend, ExecutionOutcome, StatementExecutor, StatementRequest, StatementSummary, Transaction,
};
use crate::{
    config::{ConnectionConfig, DriverKind},
    error::{Error, ErrorKind},
    native::NativeSession,
};

/// Lifecycle state of a [`ConnectionHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Closed,
    Open,
    /// The session was lost while in use. Only `close` is allowed.
    Failed,
}

impl fmt::Display for HandleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleState::Closed => f.write_str("closed"),
            HandleState::Open => f.write_str("open"),
            HandleState::Failed => f.write_str("failed"),
        }
    }
}

/// Exclusive owner of one native session.
///
/// Obtained from [`ConnectionFactory::open`](super::ConnectionFactory::open).
/// The session is released by [`close`](Self::close), or when the handle is
/// dropped, whichever comes first. Uncommitted work is rolled back before
/// the session is released.
pub struct ConnectionHandle {
    pub(crate) config: ConnectionConfig,
    pub(crate) session: Option<Box<dyn NativeSession>>,
    pub(crate) state: HandleState,
    pub(crate) backend: &'static dyn Backend,
    /// Mutations were sent since the last commit or rollback.
    pub(crate) pending: bool,
}

impl ConnectionHandle {
    pub(crate) fn new(config: ConnectionConfig, session: Box<dyn NativeSession>, backend: &'static dyn Backend) -> Self {
        Self {
            config,
            session: Some(session),
            state: HandleState::Open,
            backend,
            pending: false,
        }
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == HandleState::Open
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn driver_kind(&self) -> DriverKind {
        self.backend.kind()
    }

    /// Send one statement. Only allowed while the handle is open; the
    /// backend is not contacted otherwise.
    pub fn execute(&mut self, request: &StatementRequest) -> crate::Result<ExecutionOutcome<'_>> {
        StatementExecutor::run(self, request)
    }

    /// Make the pending mutations permanent.
    pub fn commit(&mut self) -> crate::Result<()> {
        let session = match (self.state, self.session.as_mut()) {
            (HandleState::Open, Some(session)) => session,
            (state, _) => return Err(Error::builder(ErrorKind::InvalidState { state }).build()),
        };

        match session.commit() {
            Ok(()) => {
                self.pending = false;
                Ok(())
            }
            Err(native) => {
                let err = self.backend.statement_error(native);

                if err.kind() == &ErrorKind::ConnectionLost {
                    self.state = HandleState::Failed;
                }

                Err(err)
            }
        }
    }

    /// Discard the pending mutations. Best-effort: a failure is logged and
    /// dropped, so it can't hide the error that caused the rollback.
    pub fn rollback(&mut self) {
        let session = match self.session.as_mut() {
            Some(session) => session,
            None => {
                tracing::debug!("rollback on a closed connection ignored");
                return;
            }
        };

        self.pending = false;

        if let Err(native) = session.rollback() {
            let err = self.backend.statement_error(native);

            tracing::warn!(
                kind = err.kind().name(),
                code = err.original_code().unwrap_or_default(),
                native_message = err.original_message().unwrap_or_default(),
                "rollback failed"
            );
        }
    }

    /// Release the native session. Calling it again is a no-op. Never fails:
    /// an error from the native library is logged and dropped.
    pub fn close(&mut self) {
        if self.pending && self.session.is_some() {
            self.rollback();
        }

        let session = match self.session.take() {
            Some(session) => session,
            None => return,
        };

        self.state = HandleState::Closed;

        match session.close() {
            Ok(()) => tracing::info!(driver = self.backend.kind().as_str(), "connection closed"),
            Err(native) => tracing::warn!(
                driver = self.backend.kind().as_str(),
                code = native.code,
                native_message = native.message.as_str(),
                "error closing the connection, session released anyway"
            ),
        }
    }

    /// Start a transaction scope. Rolled back when dropped without a commit.
    pub fn transaction(&mut self) -> crate::Result<Transaction<'_>> {
        Transaction::new(self)
    }

    /// Run `f` in a transaction scope. Commits when `f` returns `Ok`. On
    /// `Err` the scope is rolled back and the original error returned.
    pub fn with_transaction<F, T>(&mut self, f: F) -> crate::Result<T>
    where
        F: FnOnce(&mut Transaction<'_>) -> crate::Result<T>,
    {
        let mut tx = self.transaction()?;

        match f(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                tx.rollback();
                Err(err)
            }
        }
    }

    /// Run the statements in order in one transaction scope, fetching the
    /// rows of every query. Stops at the first failure and rolls back.
    pub fn run_script(&mut self, requests: &[StatementRequest]) -> crate::Result<Vec<StatementSummary>> {
        self.with_transaction(|tx| {
            requests
                .iter()
                .map(|request| tx.execute(request)?.into_summary())
                .collect()
        })
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        if self.session.is_some() {
            tracing::warn!(state = %self.state, "connection handle dropped without close, closing it");
            self.close();
        }
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("pending", &self.pending)
            .finish()
    }
}
