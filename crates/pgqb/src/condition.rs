//! Statement fragments accumulated by [`QueryBuilder`](crate::QueryBuilder).
//!
//! This module provides [`Condition`] (one WHERE predicate), [`Assignment`]
//! (one UPDATE `SET` pair), [`OrderBy`] and [`Join`]. All input validation
//! happens in the constructors here, so a bad column name or operator is
//! reported at the call that introduced it rather than when SQL is generated.
//!
//! # Example
//! ```ignore
//! use pgqb::{Condition, Scalar};
//!
//! Condition::gt("age", 18)?;
//! Condition::new("name", "ilike", "%mark%")?;
//! Condition::in_list("role", vec!["admin", "user"])?;
//! Condition::new("perm", "in", vec![Scalar::from("admin"), Scalar::from(18)])?;
//! Condition::between("age", 10, 20)?;
//! Condition::is_null("deleted_at")?;
//! # Ok::<(), pgqb::QbError>(())
//! ```

use crate::error::{QbError, QbResult};
use crate::ident::TableRef;
use crate::value::{Scalar, Value};

fn check_column(column: &str) -> QbResult<()> {
    if column.trim().is_empty() {
        return Err(QbError::invalid_argument("Column name cannot be empty"));
    }
    Ok(())
}

/// Non-finite floats have no literal form and would render as `NaN` / `inf`.
fn check_scalar(column: &str, value: &Scalar) -> QbResult<()> {
    match value {
        Scalar::Float(f) if !f.is_finite() => Err(QbError::invalid_argument(format!(
            "Non-finite float {f} for column {column}"
        ))),
        _ => Ok(()),
    }
}

/// A single `column OPERATOR [value]` predicate.
///
/// The operator is an uninterpreted token: it is upper-cased on output but
/// never checked against a fixed list, so dialect-specific operators such as
/// `@>` or `similar to` pass straight through.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    column: String,
    operator: String,
    value: Option<Value>,
}

impl Condition {
    /// Create a condition with a scalar or sequence value.
    pub fn new(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> QbResult<Self> {
        Self::with_value(column, operator, Some(value.into()))
    }

    /// Create a condition for a unary operator such as `is null`.
    pub fn unary(column: impl Into<String>, operator: impl Into<String>) -> QbResult<Self> {
        Self::with_value(column, operator, None)
    }

    /// Create a condition from an optional value.
    ///
    /// `None` renders as a unary predicate (`column OP`).
    pub fn with_value(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: Option<Value>,
    ) -> QbResult<Self> {
        let column = column.into();
        let operator = operator.into();

        check_column(&column)?;
        if operator.trim().is_empty() {
            return Err(QbError::unsupported_operator(operator));
        }
        match &value {
            Some(Value::Scalar(v)) => check_scalar(&column, v)?,
            Some(Value::Sequence(items)) => {
                if items.is_empty() {
                    return Err(QbError::invalid_argument(format!(
                        "Empty value list for {} {}",
                        column,
                        operator.to_uppercase()
                    )));
                }
                for v in items {
                    check_scalar(&column, v)?;
                }
            }
            None => {}
        }

        Ok(Self {
            column,
            operator,
            value,
        })
    }

    /// Column text, copied into the statement verbatim.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Operator token as given.
    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// The attached value, if any.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// True when the operator is `IN` or `NOT IN` (case-insensitive).
    pub fn is_list_operator(&self) -> bool {
        let op = self.operator.trim();
        op.eq_ignore_ascii_case("in") || op.eq_ignore_ascii_case("not in")
    }

    // ==================== Convenience constructors ====================

    /// Create an equality condition: column = value
    pub fn eq(column: impl Into<String>, value: impl Into<Scalar>) -> QbResult<Self> {
        Self::new(column, "=", Value::Scalar(value.into()))
    }

    /// Create an inequality condition: column != value
    pub fn ne(column: impl Into<String>, value: impl Into<Scalar>) -> QbResult<Self> {
        Self::new(column, "!=", Value::Scalar(value.into()))
    }

    /// Create a greater-than condition: column > value
    pub fn gt(column: impl Into<String>, value: impl Into<Scalar>) -> QbResult<Self> {
        Self::new(column, ">", Value::Scalar(value.into()))
    }

    /// Create a greater-than-or-equal condition: column >= value
    pub fn gte(column: impl Into<String>, value: impl Into<Scalar>) -> QbResult<Self> {
        Self::new(column, ">=", Value::Scalar(value.into()))
    }

    /// Create a less-than condition: column < value
    pub fn lt(column: impl Into<String>, value: impl Into<Scalar>) -> QbResult<Self> {
        Self::new(column, "<", Value::Scalar(value.into()))
    }

    /// Create a less-than-or-equal condition: column <= value
    pub fn lte(column: impl Into<String>, value: impl Into<Scalar>) -> QbResult<Self> {
        Self::new(column, "<=", Value::Scalar(value.into()))
    }

    /// Create a LIKE condition: column LIKE pattern
    pub fn like(column: impl Into<String>, pattern: impl Into<Scalar>) -> QbResult<Self> {
        Self::new(column, "LIKE", Value::Scalar(pattern.into()))
    }

    /// Create a case-insensitive ILIKE condition: column ILIKE pattern
    pub fn ilike(column: impl Into<String>, pattern: impl Into<Scalar>) -> QbResult<Self> {
        Self::new(column, "ILIKE", Value::Scalar(pattern.into()))
    }

    /// Create an IS NULL condition: column IS NULL
    pub fn is_null(column: impl Into<String>) -> QbResult<Self> {
        Self::unary(column, "IS NULL")
    }

    /// Create an IS NOT NULL condition: column IS NOT NULL
    pub fn is_not_null(column: impl Into<String>) -> QbResult<Self> {
        Self::unary(column, "IS NOT NULL")
    }

    /// Create an IN condition: column IN (values...)
    pub fn in_list<T, I>(column: impl Into<String>, values: I) -> QbResult<Self>
    where
        T: Into<Scalar>,
        I: IntoIterator<Item = T>,
    {
        Self::new(column, "IN", Value::sequence(values))
    }

    /// Create a NOT IN condition: column NOT IN (values...)
    pub fn not_in<T, I>(column: impl Into<String>, values: I) -> QbResult<Self>
    where
        T: Into<Scalar>,
        I: IntoIterator<Item = T>,
    {
        Self::new(column, "NOT IN", Value::sequence(values))
    }

    /// Create a BETWEEN condition: column BETWEEN from AND to
    pub fn between<T: Into<Scalar>>(column: impl Into<String>, from: T, to: T) -> QbResult<Self> {
        Self::new(column, "BETWEEN", Value::Sequence(vec![from.into(), to.into()]))
    }

    /// Create a NOT BETWEEN condition: column NOT BETWEEN from AND to
    pub fn not_between<T: Into<Scalar>>(
        column: impl Into<String>,
        from: T,
        to: T,
    ) -> QbResult<Self> {
        Self::new(column, "NOT BETWEEN", Value::Sequence(vec![from.into(), to.into()]))
    }
}

/// One `column = value` pair of an UPDATE's SET clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    column: String,
    value: Scalar,
}

impl Assignment {
    /// Create a `column = value` assignment.
    pub fn new(column: impl Into<String>, value: impl Into<Scalar>) -> QbResult<Self> {
        let column = column.into();
        let value = value.into();
        check_column(&column)?;
        check_scalar(&column, &value)?;
        Ok(Self { column, value })
    }

    /// Column text, copied into the SET list verbatim.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The bound value.
    pub fn value(&self) -> &Scalar {
        &self.value
    }
}

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderBy {
    column: String,
    direction: Option<String>,
}

impl OrderBy {
    /// Order by a column with the database's default direction.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: None,
        }
    }

    /// Order by column ASC.
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column).direction("asc")
    }

    /// Order by column DESC.
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column).direction("desc")
    }

    /// Set the direction token; it is upper-cased on output.
    pub fn direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push_str(&self.column);
        match self.direction.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => {
                out.push(' ');
                out.push_str(&dir.to_uppercase());
            }
            _ => {}
        }
    }
}

/// Join kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
        }
    }
}

/// A JOIN clause.
///
/// The ON condition is raw SQL supplied by the caller and is never parsed or
/// parameterized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    target: TableRef,
    on: String,
    join_type: JoinType,
}

impl Join {
    /// `INNER JOIN "<table>" AS "<alias>" ON <on>`
    pub fn new(table: &str, alias: &str, on: impl Into<String>) -> QbResult<Self> {
        Ok(Self {
            target: TableRef::aliased(table, alias)?,
            on: on.into(),
            join_type: JoinType::default(),
        })
    }

    /// `INNER JOIN "<table>" ON <on>`
    pub fn unaliased(table: &str, on: impl Into<String>) -> QbResult<Self> {
        Ok(Self {
            target: TableRef::new(table)?,
            on: on.into(),
            join_type: JoinType::default(),
        })
    }

    /// Override the join kind.
    pub fn join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = join_type;
        self
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push_str(self.join_type.as_sql());
        out.push(' ');
        self.target.write_sql(out);
        out.push_str(" ON ");
        out.push_str(&self.on);
    }
}
