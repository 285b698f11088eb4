//! Example: a filtered, paged user listing with its count query, plus an
//! UPDATE built from the same filters.
//!
//! Run with:
//!   cargo run --example list_users -p pgqb

use pgqb::{
    Assignment, Condition, OrderBy, QbOption, QbResult, QueryBuilder, RecordingSink,
};
use std::sync::Arc;

#[derive(Debug)]
struct Filters {
    status: Option<String>,
    search: Option<String>,
    roles_any_of: Vec<String>,
    include_deleted: bool,
    page: i64,
    per_page: i64,
}

fn list_users(filters: &Filters, qb: QueryBuilder) -> QbResult<QueryBuilder> {
    let mut required = Vec::new();

    if let Some(status) = &filters.status {
        required.push(Condition::eq("status", status.as_str())?);
    }
    if let Some(search) = &filters.search {
        required.push(Condition::ilike("name", format!("%{search}%"))?);
    }
    if !filters.roles_any_of.is_empty() {
        required.push(Condition::in_list("role", filters.roles_any_of.iter())?);
    }
    if !filters.include_deleted {
        required.push(Condition::is_null("deleted_at")?);
    }

    qb.from("users")?
        .select(["id", "name", "status", "role", "created_at"])
        .where_and(required)
        .order_by(OrderBy::desc("created_at"))
        .paginate(filters.page, filters.per_page)
}

fn main() -> QbResult<()> {
    let filters = Filters {
        status: Some("active".to_string()),
        search: Some("mar".to_string()),
        roles_any_of: vec!["admin".to_string(), "owner".to_string()],
        include_deleted: false,
        page: 2,
        per_page: 20,
    };
    println!("filters: {filters:?}\n");

    let sink = Arc::new(RecordingSink::new());
    let qb = list_users(
        &filters,
        QueryBuilder::with_options([QbOption::Sink(sink.clone())]),
    )?;

    let page = qb.to_select_sql();
    println!("page:  {}", page.sql());
    println!("args:  {:?}\n", page.args());

    let total = qb.to_select_total_sql();
    println!("total: {}", total.sql());
    println!("args:  {:?}\n", total.args());

    let literal = list_users(
        &filters,
        QueryBuilder::with_options([QbOption::ParseWhere(false)]),
    )?;
    println!("inline: {}\n", literal.to_select_sql().sql());

    let deactivate = qb
        .values([
            Assignment::new("status", "inactive")?,
            Assignment::new("updated_at", "now")?,
        ])
        .to_update_query();
    println!("update: {}", deactivate.sql());
    println!("args:   {:?}\n", deactivate.args());

    println!("recorded attributes:");
    for (key, value) in sink.attributes() {
        println!("  {key} = {value}");
    }

    Ok(())
}
