//! Execution conveniences.
//!
//! The library supplies no connection handling; [`Database`] is the small
//! capability surface a driver wrapper implements so that a composed
//! [`Fragment`] can be run without repeating `(statement, args)` at every
//! call site.

use std::sync::Arc;

use crate::error::Result;
use crate::row::{Row, Rows};
use crate::sql::Fragment;
use crate::value::ToArg;

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: Option<i64>,
}

/// Capability surface required of a database handle.
pub trait Database {
    type Rows: Rows;
    type Row: Row;

    /// Run a statement expected to return a multi-row cursor.
    fn query(&mut self, statement: &str, args: &[Arc<dyn ToArg>]) -> Result<Self::Rows>;

    /// Run a statement expected to return a single row.
    fn query_row(&mut self, statement: &str, args: &[Arc<dyn ToArg>]) -> Result<Self::Row>;

    /// Run a statement that returns no rows.
    fn execute(&mut self, statement: &str, args: &[Arc<dyn ToArg>]) -> Result<ExecResult>;
}

impl Fragment {
    /// Forward the statement and arguments to [`Database::query`].
    pub fn query<D: Database>(&self, db: &mut D) -> Result<D::Rows> {
        self.trace("query");
        db.query(self.statement(), self.args())
    }

    /// Forward the statement and arguments to [`Database::query_row`].
    pub fn query_row<D: Database>(&self, db: &mut D) -> Result<D::Row> {
        self.trace("query_row");
        db.query_row(self.statement(), self.args())
    }

    /// Forward the statement and arguments to [`Database::execute`].
    pub fn execute<D: Database>(&self, db: &mut D) -> Result<ExecResult> {
        self.trace("execute");
        db.execute(self.statement(), self.args())
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn trace(&self, op: &'static str) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlbind.sql",
            op,
            statement = %self.statement(),
            args = self.args().len(),
        );
    }
}
