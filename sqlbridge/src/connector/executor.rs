use std::time::Instant;

use super::{metrics, ConnectionHandle, ExecutionOutcome, HandleState, ResultSet, StatementRequest};
use crate::{
    error::{Error, ErrorKind},
    native::NativeOutcome,
};

/// Sends statements over an open connection and shapes what comes back.
pub struct StatementExecutor;

impl StatementExecutor {
    /// Send `request` on the handle's session.
    ///
    /// The outcome follows what the driver reports: a cursor becomes a lazy
    /// [`ResultSet`], anything else a row count. Native failures are
    /// classified by the handle's backend; a lost connection leaves the
    /// handle failed.
    pub fn run<'conn>(
        handle: &'conn mut ConnectionHandle,
        request: &StatementRequest,
    ) -> crate::Result<ExecutionOutcome<'conn>> {
        let backend = handle.backend;

        let session = match (handle.state, handle.session.as_mut()) {
            (HandleState::Open, Some(session)) => session,
            (state, _) => return Err(Error::builder(ErrorKind::InvalidState { state }).build()),
        };

        let span = tracing::debug_span!("statement", kind = %request.kind(), sql = request.sql());
        let _enter = span.enter();

        let start = Instant::now();
        let result = session.send_statement(request.sql());
        metrics::statement(backend.kind(), request.sql(), start);

        match result {
            Ok(NativeOutcome::RowsAffected(count)) => {
                handle.pending = true;
                Ok(ExecutionOutcome::RowsAffected(count))
            }
            Ok(NativeOutcome::Cursor(cursor)) => Ok(ExecutionOutcome::Rows(ResultSet::new(
                cursor,
                backend,
                &mut handle.state,
            ))),
            Err(native) => {
                let err = backend.statement_error(native);

                if err.kind() == &ErrorKind::ConnectionLost {
                    handle.state = HandleState::Failed;
                }

                Err(err)
            }
        }
    }
}
