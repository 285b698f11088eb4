//! Clause engine: WHERE and SET rendering with placeholder numbering.
//!
//! All placeholder allocation goes through one [`RenderContext`] per
//! statement. The context is threaded by `&mut` through the SET pass and then
//! the WHERE pass, so `UPDATE t SET a = $1, b = $2 WHERE (c = $3)` comes out
//! numbered correctly without any string rewriting afterwards.
//!
//! WHERE structure is fixed: every AND-channel group becomes one parenthesized
//! fragment, those fragments are ANDed into a single operand, and that operand
//! is ORed with each OR-channel group:
//!
//! ```text
//! (and-group-1) AND (and-group-2) OR (or-group-1) OR (or-group-2)
//! ```
//!
//! No extra parentheses are added around the AND operand, so SQL precedence
//! binds it as `((a1) AND (a2)) OR (o1) OR (o2)`.

use crate::condition::{Assignment, Condition};
use crate::config::RenderMode;
use crate::param::ParamList;
use crate::value::{Scalar, Value};

/// Placeholder cursor and collected arguments for one statement.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    counter: usize,
    args: ParamList,
    mode: RenderMode,
}

impl RenderContext {
    /// Start a statement with the counter at zero.
    pub fn new(mode: RenderMode) -> Self {
        Self {
            counter: 0,
            args: ParamList::new(),
            mode,
        }
    }

    /// Index of the last placeholder handed out (0 before the first).
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Placeholder or literal rendering.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Arguments collected so far, in placeholder order.
    pub fn args(&self) -> &ParamList {
        &self.args
    }

    /// Consume the context, keeping only the arguments.
    pub fn into_args(self) -> ParamList {
        self.args
    }

    /// Allocate the next placeholder for `value` and return `$n`.
    fn placeholder(&mut self, value: &Scalar) -> String {
        self.counter += 1;
        self.args.push(value.clone());
        format!("${}", self.counter)
    }

    /// Render one scalar according to the mode.
    fn scalar(&mut self, value: &Scalar) -> String {
        match self.mode {
            RenderMode::Placeholder => self.placeholder(value),
            RenderMode::Literal => value.to_literal(),
        }
    }
}

/// Render a single condition, e.g. `age > $1`, `id IN ($2, $3)`,
/// `age BETWEEN 10 AND 20`, `deleted_at IS NULL`.
pub fn render_condition(cond: &Condition, ctx: &mut RenderContext) -> String {
    let op = cond.operator().to_uppercase();

    let rendered = match cond.value() {
        None => return format!("{} {}", cond.column(), op),
        Some(Value::Scalar(v)) => ctx.scalar(v),
        Some(Value::Sequence(items)) => {
            let parts: Vec<String> = items.iter().map(|v| ctx.scalar(v)).collect();
            if cond.is_list_operator() {
                format!("({})", parts.join(", "))
            } else {
                parts.join(" AND ")
            }
        }
    };

    format!("{} {} {}", cond.column(), op, rendered)
}

/// Render a group as `(c1 AND c2 ...)`.
pub fn render_group(group: &[Condition], ctx: &mut RenderContext) -> String {
    let parts: Vec<String> = group.iter().map(|c| render_condition(c, ctx)).collect();
    format!("({})", parts.join(" AND "))
}

/// Build the WHERE clause, including the leading `" WHERE "`.
///
/// Returns an empty string when both channels are empty. AND-channel groups
/// are rendered (and numbered) before OR-channel groups.
pub fn build_where(
    and_groups: &[Vec<Condition>],
    or_groups: &[Vec<Condition>],
    ctx: &mut RenderContext,
) -> String {
    if and_groups.is_empty() && or_groups.is_empty() {
        return String::new();
    }

    let mut operands: Vec<String> = Vec::with_capacity(1 + or_groups.len());

    if !and_groups.is_empty() {
        let fragments: Vec<String> = and_groups.iter().map(|g| render_group(g, ctx)).collect();
        operands.push(fragments.join(" AND "));
    }

    for group in or_groups {
        operands.push(render_group(group, ctx));
    }

    format!(" WHERE {}", operands.join(" OR "))
}

/// Build the SET list (`a = $1, b = $2`).
///
/// Assignments are always parameterized, whatever the context's mode.
pub fn build_assignments(assignments: &[Assignment], ctx: &mut RenderContext) -> String {
    assignments
        .iter()
        .map(|a| format!("{} = {}", a.column(), ctx.placeholder(a.value())))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RenderContext {
        RenderContext::new(RenderMode::Placeholder)
    }

    fn literal() -> RenderContext {
        RenderContext::new(RenderMode::Literal)
    }

    #[test]
    fn test_scalar_condition() {
        let mut ctx = ctx();
        let sql = render_condition(&Condition::gt("age", 18).unwrap(), &mut ctx);
        assert_eq!(sql, "age > $1");
        assert_eq!(ctx.counter(), 1);
        assert_eq!(ctx.args().as_slice(), &[Scalar::Int(18)]);
    }

    #[test]
    fn test_operator_is_uppercased() {
        let mut ctx = ctx();
        let sql = render_condition(&Condition::new("name", "ilike", "%Mark%").unwrap(), &mut ctx);
        assert_eq!(sql, "name ILIKE $1");
    }

    #[test]
    fn test_unary_condition() {
        let mut ctx = ctx();
        let sql = render_condition(&Condition::unary("age", "is null").unwrap(), &mut ctx);
        assert_eq!(sql, "age IS NULL");
        assert_eq!(ctx.counter(), 0);
        assert!(ctx.args().is_empty());
    }

    #[test]
    fn test_in_list_parenthesized() {
        let mut ctx = ctx();
        let sql = render_condition(&Condition::in_list("id", vec![1, 2, 3]).unwrap(), &mut ctx);
        assert_eq!(sql, "id IN ($1, $2, $3)");
        assert_eq!(ctx.args().len(), 3);
    }

    #[test]
    fn test_not_in_parenthesized_case_insensitive() {
        let mut ctx = ctx();
        let sql = render_condition(&Condition::new("id", "not in", vec![1, 2]).unwrap(), &mut ctx);
        assert_eq!(sql, "id NOT IN ($1, $2)");
    }

    #[test]
    fn test_between_not_parenthesized() {
        let mut ctx = ctx();
        let sql = render_condition(&Condition::new("age", "between", vec![10, 20]).unwrap(), &mut ctx);
        assert_eq!(sql, "age BETWEEN $1 AND $2");
        assert_eq!(
            ctx.args().as_slice(),
            &[Scalar::Int(10), Scalar::Int(20)]
        );
    }

    #[test]
    fn test_literal_mode_does_not_touch_counter() {
        let mut ctx = literal();
        let cond = Condition::new(
            "permission",
            "in",
            vec![
                Scalar::from("admin"),
                Scalar::from("user"),
                Scalar::from(18),
                Scalar::from(false),
            ],
        )
        .unwrap();
        let sql = render_condition(&cond, &mut ctx);
        assert_eq!(sql, "permission IN ('admin', 'user', 18, false)");
        assert_eq!(ctx.counter(), 0);
        assert!(ctx.args().is_empty());
    }

    #[test]
    fn test_literal_between() {
        let mut ctx = literal();
        let sql = render_condition(&Condition::between("distance", 0, 100).unwrap(), &mut ctx);
        assert_eq!(sql, "distance BETWEEN 0 AND 100");
    }

    #[test]
    fn test_build_where_empty() {
        let mut ctx = ctx();
        assert_eq!(build_where(&[], &[], &mut ctx), "");
        assert!(ctx.args().is_empty());
    }

    #[test]
    fn test_build_where_and_groups_collapse_into_one_operand() {
        let mut ctx = ctx();
        let and_groups = vec![
            vec![Condition::eq("name", "Mark").unwrap()],
            vec![Condition::lte("age", 18).unwrap()],
        ];
        let or_groups = vec![
            vec![Condition::eq("role", "admin").unwrap()],
            vec![Condition::eq("role", "owner").unwrap()],
        ];
        let sql = build_where(&and_groups, &or_groups, &mut ctx);
        assert_eq!(
            sql,
            " WHERE (name = $1) AND (age <= $2) OR (role = $3) OR (role = $4)"
        );
    }

    #[test]
    fn test_build_where_only_or_groups() {
        let mut ctx = ctx();
        let or_groups = vec![
            vec![Condition::eq("a", 1).unwrap(), Condition::eq("b", 2).unwrap()],
            vec![Condition::eq("c", 3).unwrap()],
        ];
        let sql = build_where(&[], &or_groups, &mut ctx);
        assert_eq!(sql, " WHERE (a = $1 AND b = $2) OR (c = $3)");
    }

    #[test]
    fn test_counter_carries_from_set_into_where() {
        let mut ctx = ctx();
        let set = build_assignments(
            &[
                Assignment::new("name", "Mark").unwrap(),
                Assignment::new("age", 18).unwrap(),
            ],
            &mut ctx,
        );
        let where_sql = build_where(&[vec![Condition::eq("id", 1).unwrap()]], &[], &mut ctx);

        assert_eq!(set, "name = $1, age = $2");
        assert_eq!(where_sql, " WHERE (id = $3)");
        assert_eq!(
            ctx.into_args().into_vec(),
            vec![Scalar::from("Mark"), Scalar::from(18), Scalar::from(1)]
        );
    }

    #[test]
    fn test_assignments_parameterized_in_literal_mode() {
        let mut ctx = literal();
        let set = build_assignments(&[Assignment::new("name", "Mark").unwrap()], &mut ctx);
        let where_sql = build_where(&[vec![Condition::eq("id", 7).unwrap()]], &[], &mut ctx);
        assert_eq!(set, "name = $1");
        assert_eq!(where_sql, " WHERE (id = 7)");
        assert_eq!(ctx.args().len(), 1);
    }
}
