//! Fluent statement builder.
//!
//! [`QueryBuilder`] accumulates clause fragments through chained calls and
//! assembles them on demand into a SELECT, a SELECT COUNT, or an UPDATE.
//!
//! ## Design
//!
//! - Configuration calls consume and return the builder. Calls that can reject
//!   their input return `QbResult<Self>`, so chains continue with `?`.
//! - Terminal calls take `&self` and are pure: calling them repeatedly, or
//!   from several threads at once, yields identical output.
//! - Placeholders are numbered `$1, $2, ...` across the whole statement.

mod built;

pub use built::BuiltQuery;

use crate::condition::{Assignment, Condition, Join, OrderBy};
use crate::config::{QbConfig, QbOption, RenderMode};
use crate::error::{QbError, QbResult};
use crate::ident::TableRef;
use crate::render::{RenderContext, build_assignments, build_where};
use crate::span::{
    COLLECTION_NAME, OPERATION_NAME, OPERATION_VALUE, QUERY_PARAMETER_PREFIX, QUERY_TEXT,
};
use crate::value::Value;

/// The kind of statement a terminal call produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// `SELECT <cols> FROM ...`
    Select,
    /// `SELECT COUNT(*) AS total FROM ...`
    SelectTotal,
    /// `UPDATE ... SET ...`
    Update,
}

/// Accumulates one statement's clauses.
///
/// # Example
/// ```ignore
/// use pgqb::{Condition, OrderBy, QueryBuilder};
///
/// let qb = QueryBuilder::new()
///     .from("users")?
///     .where_and([Condition::gt("age", 18)?])
///     .order_by(OrderBy::asc("name"))
///     .paginate(2, 10)?;
///
/// let page = qb.to_select_sql();
/// let total = qb.to_select_total_sql();
/// # Ok::<(), pgqb::QbError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct QueryBuilder {
    config: QbConfig,
    /// FROM target (also the UPDATE target)
    from: Option<TableRef>,
    /// SELECT columns (empty renders `*`)
    selects: Vec<String>,
    /// JOIN clauses
    joins: Vec<Join>,
    /// AND-channel condition groups
    where_and: Vec<Vec<Condition>>,
    /// OR-channel condition groups
    where_or: Vec<Vec<Condition>>,
    /// GROUP BY columns
    group_by: Vec<String>,
    /// ORDER BY items
    order_by: Vec<OrderBy>,
    /// LIMIT
    limit: Option<i64>,
    /// OFFSET
    offset: Option<i64>,
    /// UPDATE assignments
    values: Vec<Assignment>,
}

impl QueryBuilder {
    /// Create a builder in placeholder mode with no attribute sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from an explicit configuration.
    pub fn with_config(config: QbConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Create a builder from named options, applied in order.
    pub fn with_options(options: impl IntoIterator<Item = QbOption>) -> Self {
        Self::with_config(options.into_iter().collect())
    }

    /// The configuration this builder was created with.
    pub fn config(&self) -> &QbConfig {
        &self.config
    }

    /// Placeholder or literal rendering for WHERE values.
    pub fn mode(&self) -> RenderMode {
        self.config.mode
    }

    // ==================== FROM ====================

    /// Set the source table: `FROM "<table>"`.
    pub fn from(mut self, table: &str) -> QbResult<Self> {
        self.from = Some(TableRef::new(table)?);
        Ok(self)
    }

    /// Set an aliased source table: `FROM "<table>" AS "<alias>"`.
    pub fn from_as(mut self, table: &str, alias: &str) -> QbResult<Self> {
        self.from = Some(TableRef::aliased(table, alias)?);
        Ok(self)
    }

    /// Set the source table from one or two parts (`table` or `table, alias`).
    ///
    /// Any other number of parts is rejected.
    pub fn from_parts(mut self, parts: &[&str]) -> QbResult<Self> {
        self.from = Some(TableRef::from_parts(parts)?);
        Ok(self)
    }

    // ==================== SELECT columns ====================

    /// Replace the projection list.
    pub fn select<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selects = cols.into_iter().map(Into::into).collect();
        self
    }

    /// Reset the projection list so it renders as `*` again.
    pub fn clear_select(mut self) -> Self {
        self.selects.clear();
        self
    }

    // ==================== JOIN ====================

    /// Append a join; joins render in insertion order.
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    // ==================== WHERE ====================

    /// Append one AND-channel group. Conditions passed together are ANDed
    /// inside a single pair of parentheses.
    pub fn where_and(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        let group: Vec<Condition> = conditions.into_iter().collect();
        if !group.is_empty() {
            self.where_and.push(group);
        }
        self
    }

    /// Append one OR-channel group. The group becomes its own operand of the
    /// top-level OR.
    pub fn where_or(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        let group: Vec<Condition> = conditions.into_iter().collect();
        if !group.is_empty() {
            self.where_or.push(group);
        }
        self
    }

    // ==================== Ordering & Grouping ====================

    /// Append an ORDER BY item.
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    /// Remove all ORDER BY items.
    pub fn clear_order_by(mut self) -> Self {
        self.order_by.clear();
        self
    }

    /// Replace the GROUP BY column list.
    pub fn group_by<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = cols.into_iter().map(Into::into).collect();
        self
    }

    // ==================== Pagination ====================

    /// Set LIMIT.
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, n: i64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Page-based pagination: `LIMIT page_size OFFSET (page - 1) * page_size`.
    ///
    /// `page` is 1-based. `page < 1` and `page_size < 1` are rejected.
    pub fn paginate(mut self, page: i64, page_size: i64) -> QbResult<Self> {
        if page < 1 {
            return Err(QbError::invalid_argument(format!(
                "page must be >= 1, got {page}"
            )));
        }
        if page_size < 1 {
            return Err(QbError::invalid_argument(format!(
                "page size must be >= 1, got {page_size}"
            )));
        }
        let offset = (page - 1).checked_mul(page_size).ok_or_else(|| {
            QbError::invalid_argument(format!("offset overflows for page {page} x {page_size}"))
        })?;
        self.limit = Some(page_size);
        self.offset = Some(offset);
        Ok(self)
    }

    // ==================== UPDATE values ====================

    /// Append SET assignments. Multiple calls accumulate.
    pub fn values(mut self, assignments: impl IntoIterator<Item = Assignment>) -> Self {
        self.values.extend(assignments);
        self
    }

    /// True when at least one assignment has been added.
    ///
    /// Check this before issuing an UPDATE: with no assignments the SET list
    /// is empty and the statement is not valid SQL.
    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    // ==================== Build ====================

    fn write_from(&self, out: &mut String) {
        if let Some(from) = &self.from {
            from.write_sql(out);
        }
    }

    fn write_joins(&self, out: &mut String) {
        for join in &self.joins {
            out.push(' ');
            join.write_sql(out);
        }
    }

    /// Build `SELECT <cols|*> FROM ... [JOIN ...] [WHERE ...] [GROUP BY ...]
    /// [ORDER BY ...] [LIMIT n] [OFFSET n]`.
    pub fn to_select_sql(&self) -> BuiltQuery {
        let mut ctx = RenderContext::new(self.config.mode);
        let mut sql = String::from("SELECT ");

        if self.selects.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.selects.join(", "));
        }

        sql.push_str(" FROM ");
        self.write_from(&mut sql);
        self.write_joins(&mut sql);
        sql.push_str(&build_where(&self.where_and, &self.where_or, &mut ctx));

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                order.write_sql(&mut sql);
            }
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        self.finish(StatementKind::Select, sql, ctx)
    }

    /// Build `SELECT COUNT(*) AS total FROM ... [JOIN ...] [WHERE ...]`.
    ///
    /// Projection, grouping, ordering and pagination are left out, so the
    /// result counts every row the paged SELECT could return.
    pub fn to_select_total_sql(&self) -> BuiltQuery {
        let mut ctx = RenderContext::new(self.config.mode);
        let mut sql = String::from("SELECT COUNT(*) AS total FROM ");

        self.write_from(&mut sql);
        self.write_joins(&mut sql);
        sql.push_str(&build_where(&self.where_and, &self.where_or, &mut ctx));

        self.finish(StatementKind::SelectTotal, sql, ctx)
    }

    /// Build `UPDATE <table> SET a = $1, ... [WHERE ...]`.
    ///
    /// SET placeholders are allocated first and the WHERE clause continues the
    /// same numbering.
    pub fn to_update_query(&self) -> BuiltQuery {
        let mut ctx = RenderContext::new(self.config.mode);
        let mut sql = String::from("UPDATE ");

        self.write_from(&mut sql);
        sql.push_str(" SET ");
        sql.push_str(&build_assignments(&self.values, &mut ctx));
        sql.push_str(&build_where(&self.where_and, &self.where_or, &mut ctx));

        self.finish(StatementKind::Update, sql, ctx)
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn finish(&self, kind: StatementKind, sql: String, ctx: RenderContext) -> BuiltQuery {
        let built = BuiltQuery::new(sql, ctx.into_args());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "pgqb.sql",
            query_type = ?kind,
            param_count = built.args().len(),
            sql = %built.sql(),
        );

        self.report(built.sql());
        built
    }

    /// Report instrumentation attributes for a generated statement.
    ///
    /// The operation name is always `SELECT`, whichever statement was built.
    fn report(&self, sql: &str) {
        let Some(sink) = &self.config.sink else {
            return;
        };

        if let Some(from) = &self.from {
            sink.record_attribute(COLLECTION_NAME, from.table_name());
        }
        sink.record_attribute(OPERATION_NAME, OPERATION_VALUE);
        sink.record_attribute(QUERY_TEXT, sql);

        for cond in self.where_and.iter().chain(&self.where_or).flatten() {
            if let Some(Value::Scalar(value)) = cond.value() {
                let key = format!("{}{}", QUERY_PARAMETER_PREFIX, cond.column());
                sink.record_attribute(&key, &value.to_string());
            }
        }
    }
}
