mod result_row;

pub use result_row::*;

use std::{fmt, iter::FusedIterator, sync::Arc};

use super::{backend::Backend, HandleState};
use crate::{
    error::{Error, ErrorKind},
    native::{NativeCursor, NativeError},
};

/// The rows of one query, fetched lazily from the open cursor in a single
/// forward pass.
///
/// A `ResultSet` mutably borrows the connection that produced it: no other
/// statement can be sent and the connection can't be closed until it's
/// dropped. Iteration stops after the last row of the current set; a stored
/// procedure may have more sets, see [`ResultSet::next_result_set`]. The
/// first error ends the cursor for good.
pub struct ResultSet<'conn> {
    columns: Arc<Vec<String>>,
    cursor: Box<dyn NativeCursor + 'conn>,
    backend: &'static dyn Backend,
    state: &'conn mut HandleState,
    finished: bool,
    /// No further result sets, or the cursor failed.
    done: bool,
}

impl<'conn> ResultSet<'conn> {
    pub(crate) fn new(
        cursor: Box<dyn NativeCursor + 'conn>,
        backend: &'static dyn Backend,
        state: &'conn mut HandleState,
    ) -> Self {
        Self {
            columns: Arc::new(cursor.columns()),
            cursor,
            backend,
            state,
            finished: false,
            done: false,
        }
    }

    /// The column names, available before the first fetch.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// True once the current set is exhausted or the cursor failed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance to the next result set, skipping unread rows of this one.
    /// Returns `false` when there are no more sets; the columns then stay
    /// those of the last set.
    pub fn next_result_set(&mut self) -> crate::Result<bool> {
        if self.done {
            return Ok(false);
        }

        match self.cursor.next_result() {
            Ok(true) => {
                self.columns = Arc::new(self.cursor.columns());
                self.finished = false;
                Ok(true)
            }
            Ok(false) => {
                self.done = true;
                self.finished = true;
                Ok(false)
            }
            Err(native) => Err(self.fail(native)),
        }
    }

    /// Ends the cursor. A lost connection also fails the handle.
    fn fail(&mut self, native: NativeError) -> Error {
        self.finished = true;
        self.done = true;

        let err = self.backend.statement_error(native);

        if err.kind() == &ErrorKind::ConnectionLost {
            *self.state = HandleState::Failed;
            err.with_kind(ErrorKind::CursorError)
        } else {
            err
        }
    }
}

impl Iterator for ResultSet<'_> {
    type Item = crate::Result<ResultRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.cursor.fetch_row() {
            Ok(Some(values)) => {
                let values = values.into_iter().map(|v| self.backend.convert_value(v)).collect();

                Some(Ok(ResultRow {
                    columns: Arc::clone(&self.columns),
                    values,
                }))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(native) => Some(Err(self.fail(native))),
        }
    }
}

impl FusedIterator for ResultSet<'_> {}

impl fmt::Debug for ResultSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("driver", &self.backend.kind())
            .field("columns", &self.columns)
            .field("finished", &self.finished)
            .field("done", &self.done)
            .finish()
    }
}
