//! Generated statements parse as PostgreSQL.
//!
//! Run with `--features check`.

#![cfg(feature = "check")]

use pgqb::{Assignment, Condition, Join, OrderBy, QbOption, QbResult, QueryBuilder, is_valid_sql};

fn sample() -> QbResult<QueryBuilder> {
    Ok(QueryBuilder::new()
        .from_as("users", "u")?
        .select(["u.id", "u.name"])
        .join(Join::new("event", "e", r#""u"."id_event" = "e"."id_event""#)?)
        .where_and([
            Condition::eq("u.name", "Mark")?,
            Condition::in_list("u.role", vec!["admin", "user"])?,
        ])
        .where_and([Condition::between("u.age", 18, 65)?])
        .where_or([Condition::is_null("u.deleted_at")?])
        .group_by(["u.id", "u.name"])
        .order_by(OrderBy::desc("u.id"))
        .paginate(2, 25)?)
}

#[test]
fn select_and_total_parse() -> QbResult<()> {
    let qb = sample()?;
    qb.to_select_sql().check()?;
    qb.to_select_total_sql().check()?;
    Ok(())
}

#[test]
fn literal_mode_parses() -> QbResult<()> {
    let built = QueryBuilder::with_options([QbOption::ParseWhere(false)])
        .from("users")?
        .where_and([
            Condition::eq("name", "Mark")?,
            Condition::eq("salary", 15000.5)?,
            Condition::eq("active", true)?,
            Condition::not_in("id", vec![1, 2, 3])?,
        ])
        .to_select_sql();
    built.check()?;
    Ok(())
}

#[test]
fn update_parses() -> QbResult<()> {
    let built = QueryBuilder::new()
        .from("users")?
        .values([Assignment::new("name", "Mark")?, Assignment::new("age", 18)?])
        .where_and([Condition::eq("id", 1)?])
        .to_update_query();
    built.check()?;
    Ok(())
}

#[test]
fn update_without_values_fails_to_parse() -> QbResult<()> {
    let qb = QueryBuilder::new().from("users")?;
    assert!(!qb.has_values());

    let err = qb.to_update_query().check().unwrap_err();
    assert!(matches!(err, pgqb::QbError::InvalidSql(_)));
    assert!(!is_valid_sql(qb.to_update_query().sql()));
    Ok(())
}
