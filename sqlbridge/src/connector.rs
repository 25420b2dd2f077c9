//! Connections, statements and results.
//!
//! A [`ConnectionFactory`] opens a [`ConnectionHandle`] for a
//! [`ConnectionConfig`](crate::ConnectionConfig). Statements go through the
//! [`StatementExecutor`] and come back as a row count or a lazy
//! [`ResultSet`]. The Oracle and Sybase backends differ only in how they
//! address the server and read native codes; past the factory nothing
//! branches on the driver.

mod backend;
mod executor;
mod factory;
mod handle;
pub(crate) mod metrics;
mod oracle;
mod result_set;
mod statement;
mod sybase;
mod transaction;

pub use executor::StatementExecutor;
pub use factory::ConnectionFactory;
pub use handle::{ConnectionHandle, HandleState};
pub use result_set::*;
pub use statement::*;
pub use transaction::Transaction;
