//! Quoted SQL identifiers for table and alias names.
//!
//! Table and alias names are always emitted inside double quotes, with any
//! embedded `"` escaped as `""`. The name is quoted as a whole: `public.users`
//! becomes `"public.users"`, not `"public"."users"`.
//!
//! Column names and operator tokens are not routed through here; they are
//! trusted input and copied into the statement verbatim.

use crate::error::{QbError, QbResult};
use std::fmt;

/// A validated, quoted SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedIdent {
    name: String,
}

impl QuotedIdent {
    /// Validate a raw identifier.
    ///
    /// Rejects empty names and names containing NUL.
    pub fn new(name: &str) -> QbResult<Self> {
        if name.is_empty() {
            return Err(QbError::invalid_argument("Identifier cannot be empty"));
        }
        if name.contains('\0') {
            return Err(QbError::invalid_argument(
                "Identifier cannot contain NUL character",
            ));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// The raw, unquoted name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + 2);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push('"');
        for ch in self.name.chars() {
            if ch == '"' {
                out.push('"');
                out.push('"');
            } else {
                out.push(ch);
            }
        }
        out.push('"');
    }
}

impl fmt::Display for QuotedIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// A `FROM` target: a table with an optional alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    table: QuotedIdent,
    alias: Option<QuotedIdent>,
}

impl TableRef {
    /// A bare table.
    pub fn new(table: &str) -> QbResult<Self> {
        Ok(Self {
            table: QuotedIdent::new(table)?,
            alias: None,
        })
    }

    /// A table with an alias.
    pub fn aliased(table: &str, alias: &str) -> QbResult<Self> {
        Ok(Self {
            table: QuotedIdent::new(table)?,
            alias: Some(QuotedIdent::new(alias)?),
        })
    }

    /// Build from one (`table`) or two (`table`, `alias`) parts.
    pub fn from_parts(parts: &[&str]) -> QbResult<Self> {
        match parts {
            [table] => Self::new(table),
            [table, alias] => Self::aliased(table, alias),
            _ => Err(QbError::invalid_argument(format!(
                "FROM takes a table name and an optional alias, got {} parts",
                parts.len()
            ))),
        }
    }

    /// The raw table name.
    pub fn table_name(&self) -> &str {
        self.table.name()
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        self.table.write_sql(out);
        if let Some(alias) = &self.alias {
            out.push_str(" AS ");
            alias.write_sql(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        let ident = QuotedIdent::new("users").unwrap();
        assert_eq!(ident.to_sql(), r#""users""#);
    }

    #[test]
    fn ident_dotted_is_quoted_whole() {
        let ident = QuotedIdent::new("public.users").unwrap();
        assert_eq!(ident.to_sql(), r#""public.users""#);
    }

    #[test]
    fn ident_escapes_quote() {
        let ident = QuotedIdent::new(r#"has"quote"#).unwrap();
        assert_eq!(ident.to_sql(), r#""has""quote""#);
    }

    #[test]
    fn ident_rejects_empty() {
        assert!(QuotedIdent::new("").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn ident_rejects_nul() {
        assert!(QuotedIdent::new("us\0ers").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn table_ref_alias() {
        let t = TableRef::aliased("users", "u").unwrap();
        let mut out = String::new();
        t.write_sql(&mut out);
        assert_eq!(out, r#""users" AS "u""#);
        assert_eq!(t.table_name(), "users");
    }

    #[test]
    fn table_ref_from_parts_arity() {
        assert!(TableRef::from_parts(&["users"]).is_ok());
        assert!(TableRef::from_parts(&["users", "u"]).is_ok());
        assert!(TableRef::from_parts(&[]).unwrap_err().is_invalid_argument());
        assert!(
            TableRef::from_parts(&["a", "b", "c"])
                .unwrap_err()
                .is_invalid_argument()
        );
    }
}
