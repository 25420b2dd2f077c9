use std::fmt;

use super::{ConnectionHandle, ExecutionOutcome, HandleState, StatementRequest};
use crate::error::{Error, ErrorKind};

/// A transaction scope on one connection. If not committed, the scope is
/// rolled back when dropped.
///
/// Oracle opens transactions implicitly and Sybase sessions run in chained
/// mode, so starting a scope sends nothing to the server.
pub struct Transaction<'a> {
    handle: &'a mut ConnectionHandle,
    finished: bool,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(handle: &'a mut ConnectionHandle) -> crate::Result<Self> {
        if handle.state != HandleState::Open {
            let kind = ErrorKind::InvalidState { state: handle.state };
            return Err(Error::builder(kind).build());
        }

        tracing::debug!(driver = handle.driver_kind().as_str(), "transaction started");

        Ok(Self {
            handle,
            finished: false,
        })
    }

    pub fn execute(&mut self, request: &StatementRequest) -> crate::Result<ExecutionOutcome<'_>> {
        self.handle.execute(request)
    }

    /// Commit the changes to the database and consume the transaction. If
    /// the commit fails, the scope is rolled back and the commit error
    /// returned.
    pub fn commit(mut self) -> crate::Result<()> {
        self.finished = true;

        match self.handle.commit() {
            Ok(()) => {
                tracing::debug!("transaction committed");
                Ok(())
            }
            Err(err) => {
                self.handle.rollback();
                Err(err)
            }
        }
    }

    /// Rolls back the changes to the database.
    pub fn rollback(mut self) {
        self.finished = true;
        self.handle.rollback();
        tracing::debug!("transaction rolled back");
    }
}

impl fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("driver", &self.handle.driver_kind())
            .field("finished", &self.finished)
            .finish()
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!("transaction dropped without commit, rolling back");
            self.handle.rollback();
        }
    }
}
