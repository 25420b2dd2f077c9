use std::fmt;

use super::{ResultRow, ResultSet};

/// What the caller expects a statement to be. Only a label: whether a
/// statement produces rows is decided by the driver.
///
/// The handle treats DDL like any other write and rolls it back with the
/// rest of an uncommitted scope. Oracle servers commit around every DDL
/// statement though, so on Oracle a `CREATE TABLE` and everything before it
/// in the scope is durable once it returns, whatever happens to the scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Query,
    Mutation,
    Ddl,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Query => "query",
            StatementKind::Mutation => "mutation",
            StatementKind::Ddl => "ddl",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A SQL text to send to the server, sent as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementRequest {
    sql: String,
    kind: StatementKind,
}

impl StatementRequest {
    pub fn new(sql: impl Into<String>, kind: StatementKind) -> Self {
        Self { sql: sql.into(), kind }
    }

    pub fn query(sql: impl Into<String>) -> Self {
        Self::new(sql, StatementKind::Query)
    }

    pub fn mutation(sql: impl Into<String>) -> Self {
        Self::new(sql, StatementKind::Mutation)
    }

    pub fn ddl(sql: impl Into<String>) -> Self {
        Self::new(sql, StatementKind::Ddl)
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }
}

/// The result of a successful statement.
///
/// Both variants carry the connection lifetime, so even a row count keeps
/// the connection mutably borrowed while the outcome lives. Read the count
/// with [`ExecutionOutcome::rows_affected`] in the same expression, or turn
/// the outcome into a [`StatementSummary`], before the next statement.
#[derive(Debug)]
pub enum ExecutionOutcome<'conn> {
    /// Mutation or DDL. Zero is a valid count.
    RowsAffected(u64),
    /// A query, backed by an open cursor on the connection.
    Rows(ResultSet<'conn>),
}

impl<'conn> ExecutionOutcome<'conn> {
    pub fn rows_affected(&self) -> Option<u64> {
        match self {
            ExecutionOutcome::RowsAffected(count) => Some(*count),
            ExecutionOutcome::Rows(_) => None,
        }
    }

    pub fn into_result_set(self) -> Option<ResultSet<'conn>> {
        match self {
            ExecutionOutcome::Rows(rows) => Some(rows),
            ExecutionOutcome::RowsAffected(_) => None,
        }
    }

    /// Reads the whole cursor, every result set of it, releasing the
    /// connection borrow.
    pub fn into_summary(self) -> crate::Result<StatementSummary> {
        let mut result_set = match self {
            ExecutionOutcome::RowsAffected(count) => return Ok(StatementSummary::RowsAffected(count)),
            ExecutionOutcome::Rows(result_set) => result_set,
        };

        let mut sets = Vec::new();

        loop {
            let columns = result_set.columns().to_vec();
            let rows = result_set.by_ref().collect::<crate::Result<Vec<_>>>()?;

            sets.push(StatementSummary::Rows { columns, rows });

            if !result_set.next_result_set()? {
                break;
            }
        }

        match sets.len() {
            1 => Ok(sets.remove(0)),
            _ => Ok(StatementSummary::ResultSets(sets)),
        }
    }
}

/// An [`ExecutionOutcome`] with its rows already fetched.
#[derive(Debug, PartialEq)]
pub enum StatementSummary {
    RowsAffected(u64),
    Rows { columns: Vec<String>, rows: Vec<ResultRow> },
    /// A procedure call that produced more than one result set, each a
    /// [`StatementSummary::Rows`].
    ResultSets(Vec<StatementSummary>),
}

impl StatementSummary {
    pub fn rows_affected(&self) -> Option<u64> {
        match self {
            StatementSummary::RowsAffected(count) => Some(*count),
            StatementSummary::Rows { .. } | StatementSummary::ResultSets(_) => None,
        }
    }

    /// The rows, of the first set for a multi-set summary.
    pub fn rows(&self) -> &[ResultRow] {
        match self {
            StatementSummary::Rows { rows, .. } => rows,
            StatementSummary::ResultSets(sets) => sets.first().map(StatementSummary::rows).unwrap_or(&[]),
            StatementSummary::RowsAffected(_) => &[],
        }
    }
}
