//! The result of building a statement.

use crate::param::ParamList;
use crate::value::Scalar;
use tokio_postgres::types::ToSql;

/// SQL text plus its arguments in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    sql: String,
    args: ParamList,
}

impl BuiltQuery {
    pub(crate) fn new(sql: String, args: ParamList) -> Self {
        Self { sql, args }
    }

    /// The generated SQL.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Arguments; element `i` binds to `$i+1`. Empty in literal mode unless
    /// the statement has SET assignments.
    pub fn args(&self) -> &[Scalar] {
        self.args.as_slice()
    }

    /// Get parameters as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args.as_refs()
    }

    /// Split into the SQL text and the argument list.
    pub fn into_parts(self) -> (String, Vec<Scalar>) {
        (self.sql, self.args.into_vec())
    }
}
