//! # pgqb
//!
//! A fluent SELECT/UPDATE statement assembler for PostgreSQL drivers that use
//! positional `$n` placeholders.
//!
//! ## Features
//!
//! - **Grouped filters**: AND-channel and OR-channel condition groups with a
//!   fixed, predictable parenthesization
//! - **Global numbering**: one placeholder counter per statement, shared by
//!   `SET` and `WHERE`
//! - **Two render modes**: `$n` placeholders (default) or inline literals
//! - **Page + count**: the same builder yields the paged SELECT and its
//!   `COUNT(*)` companion
//! - **Instrumentation**: an optional [`AttributeSink`] receives the table,
//!   operation, SQL text and scalar parameters of every generated statement
//! - **No connection**: the crate only produces SQL text and arguments;
//!   [`BuiltQuery::params_ref`] feeds them to `tokio-postgres`
//!
//! ## Example
//!
//! ```ignore
//! use pgqb::{Assignment, Condition, OrderBy, QueryBuilder};
//!
//! // SELECT with pagination and its count query
//! let qb = QueryBuilder::new()
//!     .from("users")?
//!     .where_and([Condition::gt("age", 18)?])
//!     .where_or([Condition::eq("role", "admin")?])
//!     .order_by(OrderBy::asc("name"))
//!     .paginate(1, 25)?;
//!
//! let page = qb.to_select_sql();
//! // SELECT * FROM "users" WHERE (age > $1) OR (role = $2) ORDER BY name ASC LIMIT 25 OFFSET 0
//! let total = qb.to_select_total_sql();
//! // SELECT COUNT(*) AS total FROM "users" WHERE (age > $1) OR (role = $2)
//!
//! // UPDATE: SET is numbered first, WHERE continues
//! let update = QueryBuilder::new()
//!     .from("users")?
//!     .values([Assignment::new("name", "Mark")?])
//!     .where_and([Condition::eq("id", 1)?])
//!     .to_update_query();
//! // UPDATE "users" SET name = $1 WHERE (id = $2)
//!
//! let rows = client.query(page.sql(), &page.params_ref()).await?;
//! # Ok::<(), pgqb::QbError>(())
//! ```

pub mod builder;
pub mod condition;
pub mod config;
pub mod error;
pub mod ident;
pub mod param;
pub mod render;
pub mod span;
pub mod value;

// Generated-SQL validation via libpg_query
#[cfg(feature = "check")]
pub mod check;

pub use builder::{BuiltQuery, QueryBuilder, StatementKind};
pub use condition::{Assignment, Condition, Join, JoinType, OrderBy};
pub use config::{QbConfig, QbOption, RenderMode};
pub use error::{QbError, QbResult};
pub use ident::{QuotedIdent, TableRef};
pub use param::ParamList;
pub use span::{AttributeSink, NoopSink, RecordingSink};
pub use value::{Scalar, Value};

#[cfg(feature = "tracing")]
pub use span::TracingSink;

#[cfg(feature = "check")]
pub use check::is_valid_sql;
