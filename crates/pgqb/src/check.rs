//! Generated-SQL validation through the PostgreSQL parser.
//!
//! Enabled with the `check` feature. Parsing uses `pg_query` (libpg_query),
//! so a statement that passes here is syntactically valid PostgreSQL. Table
//! and column existence is not checked.
//!
//! # Example
//!
//! ```ignore
//! use pgqb::{Condition, QueryBuilder};
//!
//! let built = QueryBuilder::new()
//!     .from("users")?
//!     .where_and([Condition::in_list("id", vec![1, 2])?])
//!     .to_select_sql();
//! built.check()?;
//! # Ok::<(), pgqb::QbError>(())
//! ```

use crate::builder::BuiltQuery;
use crate::error::{QbError, QbResult};

/// Check whether `sql` parses as PostgreSQL.
///
/// `$n` placeholders are accepted by the parser as parameter references.
pub fn is_valid_sql(sql: &str) -> bool {
    pg_query::parse(sql).is_ok()
}

impl BuiltQuery {
    /// Parse the generated SQL, returning the parser's message on failure.
    ///
    /// An UPDATE built without assignments (`UPDATE "t" SET `) fails here.
    pub fn check(&self) -> QbResult<()> {
        pg_query::parse(self.sql())
            .map(|_| ())
            .map_err(|e| QbError::invalid_sql(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_sql() {
        assert!(is_valid_sql(r#"SELECT * FROM "users" WHERE (age > $1)"#));
        assert!(!is_valid_sql(r#"UPDATE "users" SET "#));
    }
}
